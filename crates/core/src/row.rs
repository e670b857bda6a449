// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	ops::Deref,
	sync::Arc,
};

use rowflow_type::Value;
use serde::{Deserialize, Serialize};

/// The value cells of one record, in schema column order.
///
/// A row is written once through a [`RowBuilder`] and then frozen; clones
/// share the cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row(Arc<[Value]>);

impl Row {
	pub fn empty() -> Self {
		Self(Arc::from(Vec::new()))
	}

	pub fn values(&self) -> &[Value] {
		&self.0
	}
}

impl Deref for Row {
	type Target = [Value];

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl From<Vec<Value>> for Row {
	fn from(values: Vec<Value>) -> Self {
		Self(Arc::from(values))
	}
}

impl Display for Row {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str("[")?;
		for (i, value) in self.0.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			Display::fmt(value, f)?;
		}
		f.write_str("]")
	}
}

/// Append-only buffer for a single output row
#[derive(Debug)]
pub struct RowBuilder {
	values: Vec<Value>,
}

impl RowBuilder {
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			values: Vec::with_capacity(capacity),
		}
	}

	pub fn push(&mut self, value: impl Into<Value>) {
		self.values.push(value.into());
	}

	pub fn extend<'a>(&mut self, values: impl IntoIterator<Item = &'a Value>) {
		self.values.extend(values.into_iter().cloned());
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	pub fn build(self) -> Row {
		Row::from(self.values)
	}
}

/// Builds a [`Row`] from anything convertible into [`Value`]s
#[macro_export]
macro_rules! row {
	() => {
		$crate::Row::empty()
	};
	($($value:expr),+ $(,)?) => {
		$crate::Row::from(vec![$($crate::Value::from($value)),+])
	};
}
