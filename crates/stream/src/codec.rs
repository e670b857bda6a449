// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Formats and the key/value codec capability.

use std::{
	collections::BTreeSet,
	fmt::{Display, Formatter},
	sync::Arc,
};

use rowflow_core::{Column, GenericKey, LogicalSchema, Row};
use rowflow_type::Result;
use serde::{Deserialize, Serialize};

use crate::QueryContext;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormatInfo {
	pub format: String,
}

impl FormatInfo {
	pub fn of(format: impl Into<String>) -> Self {
		Self {
			format: format.into(),
		}
	}
}

impl Display for FormatInfo {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.format)
	}
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SerdeFeature {
	/// Single-column payloads are written as an anonymous value
	UnwrapSingles,
	/// Single-column payloads are written inside an envelope
	WrapSingles,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerdeFeatures(BTreeSet<SerdeFeature>);

impl SerdeFeatures {
	pub fn of(features: impl IntoIterator<Item = SerdeFeature>) -> Self {
		Self(features.into_iter().collect())
	}

	pub fn enabled(&self, feature: SerdeFeature) -> bool {
		self.0.contains(&feature)
	}
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowType {
	Tumbling,
	Hopping,
	Session,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowInfo {
	pub r#type: WindowType,
	/// Window size in milliseconds, absent for session windows
	pub size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyFormat {
	NonWindowed {
		format: FormatInfo,
		features: SerdeFeatures,
	},
	Windowed {
		format: FormatInfo,
		features: SerdeFeatures,
		window: WindowInfo,
	},
}

impl KeyFormat {
	pub fn non_windowed(format: FormatInfo, features: SerdeFeatures) -> Self {
		KeyFormat::NonWindowed {
			format,
			features,
		}
	}

	pub fn windowed(format: FormatInfo, features: SerdeFeatures, window: WindowInfo) -> Self {
		KeyFormat::Windowed {
			format,
			features,
			window,
		}
	}

	pub fn format(&self) -> &FormatInfo {
		match self {
			KeyFormat::NonWindowed {
				format,
				..
			}
			| KeyFormat::Windowed {
				format,
				..
			} => format,
		}
	}

	pub fn features(&self) -> &SerdeFeatures {
		match self {
			KeyFormat::NonWindowed {
				features,
				..
			}
			| KeyFormat::Windowed {
				features,
				..
			} => features,
		}
	}

	pub fn window(&self) -> Option<&WindowInfo> {
		match self {
			KeyFormat::NonWindowed {
				..
			} => None,
			KeyFormat::Windowed {
				window,
				..
			} => Some(window),
		}
	}
}

/// Key and value formats of a source topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formats {
	pub key_format: FormatInfo,
	pub value_format: FormatInfo,
	pub key_features: SerdeFeatures,
	pub value_features: SerdeFeatures,
}

impl Formats {
	pub fn of(key_format: FormatInfo, value_format: FormatInfo) -> Self {
		Self {
			key_format,
			value_format,
			key_features: SerdeFeatures::default(),
			value_features: SerdeFeatures::default(),
		}
	}
}

/// A logical schema bound to the serde features its key and value are
/// written with. The KEY namespace is the key payload, the VALUE namespace
/// the value payload, both in index order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalSchema {
	logical: LogicalSchema,
	key_features: SerdeFeatures,
	value_features: SerdeFeatures,
}

impl PhysicalSchema {
	pub fn from(logical: LogicalSchema, key_features: SerdeFeatures, value_features: SerdeFeatures) -> Self {
		Self {
			logical,
			key_features,
			value_features,
		}
	}

	pub fn key_columns(&self) -> &[Column] {
		self.logical.key()
	}

	pub fn value_columns(&self) -> &[Column] {
		self.logical.value()
	}

	pub fn key_features(&self) -> &SerdeFeatures {
		&self.key_features
	}

	pub fn value_features(&self) -> &SerdeFeatures {
		&self.value_features
	}
}

pub trait RowSerde: Send + Sync {
	fn serialize(&self, row: &Row) -> Result<Vec<u8>>;

	fn deserialize(&self, bytes: &[u8]) -> Result<Row>;
}

pub trait KeySerde: Send + Sync {
	fn serialize(&self, key: &GenericKey) -> Result<Vec<u8>>;

	/// Decomposes a serialized key into the values of its key columns
	fn deserialize(&self, bytes: &[u8]) -> Result<GenericKey>;
}

/// Builds serdes for a physical schema
pub trait SerdeFactory: Send + Sync {
	fn key_serde(&self, format: &KeyFormat, schema: &PhysicalSchema, context: &QueryContext)
	-> Result<Arc<dyn KeySerde>>;

	fn value_serde(
		&self,
		format: &FormatInfo,
		schema: &PhysicalSchema,
		context: &QueryContext,
	) -> Result<Arc<dyn RowSerde>>;
}
