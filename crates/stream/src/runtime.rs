// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Capabilities of the event-stream runtime that executes a topology.
//!
//! The runtime delivers records per partition on a single thread, together
//! with the [`RecordMetadata`] of the record being processed. Stages
//! interposed through [`TableHandle::transform_values`] run synchronously
//! inside that context and must not block.

use std::sync::Arc;

use rowflow_core::{
	GenericKey, Row,
	schema::system::{ROWOFFSET_NAME, ROWPARTITION_NAME, ROWTIME_NAME, WINDOWEND_NAME, WINDOWSTART_NAME},
};
use rowflow_type::{Error, Result, Value, internal_error};

use crate::{
	StreamError,
	codec::{KeySerde, RowSerde},
};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct WindowBounds {
	pub start: i64,
	pub end: i64,
}

/// What the runtime knows about the record currently being processed
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RecordMetadata {
	/// Milliseconds since the epoch
	pub timestamp: i64,
	pub partition: i32,
	/// Strictly increasing within a partition
	pub offset: i64,
	/// Present for records of windowed tables only
	pub window: Option<WindowBounds>,
}

impl RecordMetadata {
	pub fn new(timestamp: i64, partition: i32, offset: i64) -> Self {
		Self {
			timestamp,
			partition,
			offset,
			window: None,
		}
	}

	pub fn with_window(mut self, start: i64, end: i64) -> Self {
		self.window = Some(WindowBounds {
			start,
			end,
		});
		self
	}

	/// The value a system column takes for this record
	pub fn pseudo_column_value(&self, name: &str) -> Result<Value> {
		match name {
			ROWTIME_NAME => Ok(Value::Bigint(self.timestamp)),
			ROWPARTITION_NAME => Ok(Value::Integer(self.partition)),
			ROWOFFSET_NAME => Ok(Value::Bigint(self.offset)),
			WINDOWSTART_NAME => Ok(Value::Bigint(self.window_bounds(name)?.start)),
			WINDOWEND_NAME => Ok(Value::Bigint(self.window_bounds(name)?.end)),
			_ => Err(Error(internal_error!("{} is not a system column", name))),
		}
	}

	fn window_bounds(&self, column: &str) -> Result<WindowBounds> {
		self.window.ok_or_else(|| {
			StreamError::MissingWindowBounds {
				column: column.into(),
			}
			.into()
		})
	}
}

/// A per-record stage over the values of a table.
///
/// `None` is a tombstone and passes through every stage untouched.
pub trait ValueTransform: Send + Sync {
	fn name(&self) -> &'static str;

	fn transform(&self, key: &GenericKey, row: Option<Row>, metadata: &RecordMetadata) -> Result<Option<Row>>;
}

pub type BoxedValueTransform = Arc<dyn ValueTransform>;

/// Serdes a topic is read with
#[derive(Clone)]
pub struct Consumed {
	pub key_serde: Arc<dyn KeySerde>,
	pub value_serde: Arc<dyn RowSerde>,
}

/// A state store a table or stage writes through
#[derive(Clone)]
pub struct Materialized {
	pub store_name: String,
	pub key_serde: Arc<dyn KeySerde>,
	pub value_serde: Arc<dyn RowSerde>,
}

pub trait StreamsBuilder {
	type Table: TableHandle;

	/// Reads `topic` as a table. With `materialized` the table is written to
	/// that store as consumed.
	fn table(&mut self, topic: &str, consumed: Consumed, materialized: Option<Materialized>) -> Result<Self::Table>;
}

pub trait TableHandle: Sized {
	/// Interposes `transform` on every record of the table. With
	/// `materialized` the output of the stage is written to, and read back
	/// from, a state store before it flows on.
	fn transform_values(self, transform: BoxedValueTransform, materialized: Option<Materialized>) -> Result<Self>;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_pseudo_column_values() {
		let metadata = RecordMetadata::new(1_000, 3, 42);
		assert_eq!(metadata.pseudo_column_value("ROWTIME").unwrap(), Value::Bigint(1_000));
		assert_eq!(metadata.pseudo_column_value("ROWPARTITION").unwrap(), Value::Integer(3));
		assert_eq!(metadata.pseudo_column_value("ROWOFFSET").unwrap(), Value::Bigint(42));
	}

	#[test]
	fn test_window_bounds() {
		let metadata = RecordMetadata::new(1_000, 0, 0).with_window(0, 60_000);
		assert_eq!(metadata.pseudo_column_value("WINDOWSTART").unwrap(), Value::Bigint(0));
		assert_eq!(metadata.pseudo_column_value("WINDOWEND").unwrap(), Value::Bigint(60_000));

		let err = RecordMetadata::new(1_000, 0, 0).pseudo_column_value("WINDOWEND").unwrap_err();
		assert_eq!(err.code(), "STREAM_001");
	}

	#[test]
	fn test_unknown_column_is_internal() {
		let err = RecordMetadata::new(0, 0, 0).pseudo_column_value("name").unwrap_err();
		assert!(err.is_internal());
	}
}
