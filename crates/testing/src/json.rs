// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use rowflow_core::{GenericKey, Row};
use rowflow_stream::{
	QueryContext, StreamError,
	codec::{FormatInfo, KeyFormat, KeySerde, PhysicalSchema, RowSerde, SerdeFactory, SerdeFeature, SerdeFeatures},
};
use rowflow_type::{Result, Value};

pub const JSON_FORMAT: &str = "JSON";

/// Serdes writing rows and keys as JSON arrays of values, one element per
/// column of the physical schema. A single-column payload is written as the
/// bare value when its features enable [`SerdeFeature::UnwrapSingles`].
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSerdeFactory;

impl SerdeFactory for JsonSerdeFactory {
	fn key_serde(
		&self,
		format: &KeyFormat,
		schema: &PhysicalSchema,
		context: &QueryContext,
	) -> Result<Arc<dyn KeySerde>> {
		check_format(format.format())?;
		let width = schema.key_columns().len();
		Ok(Arc::new(JsonKeySerde {
			context: context.op_name(),
			width,
			unwrapped: unwrap_single(schema.key_features(), width),
		}))
	}

	fn value_serde(
		&self,
		format: &FormatInfo,
		schema: &PhysicalSchema,
		context: &QueryContext,
	) -> Result<Arc<dyn RowSerde>> {
		check_format(format)?;
		let width = schema.value_columns().len();
		Ok(Arc::new(JsonRowSerde {
			context: context.op_name(),
			width,
			unwrapped: unwrap_single(schema.value_features(), width),
		}))
	}
}

fn check_format(format: &FormatInfo) -> Result<()> {
	if format.format != JSON_FORMAT {
		return Err(StreamError::UnsupportedFormat {
			format: format.format.clone(),
		}
		.into());
	}
	Ok(())
}

fn unwrap_single(features: &SerdeFeatures, width: usize) -> bool {
	width == 1 && features.enabled(SerdeFeature::UnwrapSingles) && !features.enabled(SerdeFeature::WrapSingles)
}

#[derive(Debug, Clone)]
pub struct JsonRowSerde {
	context: String,
	width: usize,
	unwrapped: bool,
}

impl RowSerde for JsonRowSerde {
	fn serialize(&self, row: &Row) -> Result<Vec<u8>> {
		check_width(&self.context, self.width, row.len())?;
		encode(&self.context, self.unwrapped, row.values())
	}

	fn deserialize(&self, bytes: &[u8]) -> Result<Row> {
		let values = decode(&self.context, self.unwrapped, bytes)?;
		check_width(&self.context, self.width, values.len())?;
		Ok(Row::from(values))
	}
}

#[derive(Debug, Clone)]
pub struct JsonKeySerde {
	context: String,
	width: usize,
	unwrapped: bool,
}

impl KeySerde for JsonKeySerde {
	fn serialize(&self, key: &GenericKey) -> Result<Vec<u8>> {
		check_width(&self.context, self.width, key.len())?;
		encode(&self.context, self.unwrapped, key.values())
	}

	fn deserialize(&self, bytes: &[u8]) -> Result<GenericKey> {
		let values = decode(&self.context, self.unwrapped, bytes)?;
		check_width(&self.context, self.width, values.len())?;
		Ok(GenericKey::new(values))
	}
}

fn check_width(context: &str, expected: usize, actual: usize) -> Result<()> {
	if expected != actual {
		return Err(StreamError::SerdeMismatch {
			context: context.to_string(),
			expected,
			actual,
		}
		.into());
	}
	Ok(())
}

fn encode(context: &str, unwrapped: bool, values: &[Value]) -> Result<Vec<u8>> {
	let encoded = match values {
		[value] if unwrapped => serde_json::to_vec(value),
		_ => serde_json::to_vec(values),
	};
	encoded.map_err(|err| {
		StreamError::Serialization {
			context: context.to_string(),
			message: err.to_string(),
		}
		.into()
	})
}

fn decode(context: &str, unwrapped: bool, bytes: &[u8]) -> Result<Vec<Value>> {
	let decoded = if unwrapped {
		serde_json::from_slice::<Value>(bytes).map(|value| vec![value])
	} else {
		serde_json::from_slice::<Vec<Value>>(bytes)
	};
	decoded.map_err(|err| {
		StreamError::Serialization {
			context: context.to_string(),
			message: err.to_string(),
		}
		.into()
	})
}
