// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use rowflow_type::Value;
use serde::{Deserialize, Serialize};

/// A record key decomposed into the values of the KEY columns, in KEY order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GenericKey(Vec<Value>);

impl GenericKey {
	pub fn new(values: Vec<Value>) -> Self {
		Self(values)
	}

	pub fn values(&self) -> &[Value] {
		&self.0
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl From<Vec<Value>> for GenericKey {
	fn from(values: Vec<Value>) -> Self {
		Self(values)
	}
}

impl Display for GenericKey {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str("(")?;
		for (i, value) in self.0.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			Display::fmt(value, f)?;
		}
		f.write_str(")")
	}
}
