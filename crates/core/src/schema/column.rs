// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	borrow::Borrow,
	fmt::{Display, Formatter},
	ops::Deref,
};

use rowflow_type::SqlType;
use serde::{Deserialize, Serialize};

#[repr(transparent)]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnName(String);

impl ColumnName {
	pub fn new(name: impl Into<String>) -> Self {
		Self(name.into())
	}

	pub fn as_str(&self) -> &str {
		self.0.as_str()
	}
}

impl Deref for ColumnName {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		self.0.as_str()
	}
}

impl Borrow<str> for ColumnName {
	fn borrow(&self) -> &str {
		self.0.as_str()
	}
}

impl PartialEq<str> for ColumnName {
	fn eq(&self, other: &str) -> bool {
		self.0 == other
	}
}

impl PartialEq<&str> for ColumnName {
	fn eq(&self, other: &&str) -> bool {
		self.0 == *other
	}
}

impl From<&str> for ColumnName {
	fn from(value: &str) -> Self {
		Self(value.to_string())
	}
}

impl From<String> for ColumnName {
	fn from(value: String) -> Self {
		Self(value)
	}
}

impl From<&ColumnName> for ColumnName {
	fn from(value: &ColumnName) -> Self {
		value.clone()
	}
}

impl Display for ColumnName {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

/// The part of a physical record a column serializes into. The declaration
/// order is the lookup precedence: a KEY column shadows a VALUE column of
/// the same name.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Namespace {
	Key,
	Value,
}

impl Display for Namespace {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Namespace::Key => f.write_str("KEY"),
			Namespace::Value => f.write_str("VALUE"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
	pub name: ColumnName,
	pub r#type: SqlType,
	pub namespace: Namespace,
	/// Position within the namespace, defines serialization order
	pub index: usize,
}

impl Column {
	pub fn new(name: impl Into<ColumnName>, r#type: SqlType, namespace: Namespace, index: usize) -> Self {
		Self {
			name: name.into(),
			r#type,
			namespace,
			index,
		}
	}

	/// Same name and namespace, regardless of type and position
	pub fn equals_ignore_type(&self, other: &Column) -> bool {
		self.name == other.name && self.namespace == other.namespace
	}

	pub fn can_implicitly_cast(&self, to: &SqlType) -> bool {
		self.r#type.can_implicitly_cast(to)
	}
}

impl Display for Column {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "`{}` {}", self.name, self.r#type)?;
		if self.namespace == Namespace::Key {
			f.write_str(" KEY")?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_equals_ignore_type() {
		let a = Column::new("id", SqlType::Integer, Namespace::Key, 0);
		let b = Column::new("id", SqlType::Bigint, Namespace::Key, 0);
		let c = Column::new("id", SqlType::Integer, Namespace::Value, 0);

		assert!(a.equals_ignore_type(&b));
		assert_ne!(a, b);
		assert!(!a.equals_ignore_type(&c));
	}

	#[test]
	fn test_can_implicitly_cast() {
		let column = Column::new("v", SqlType::Integer, Namespace::Value, 0);
		assert!(column.can_implicitly_cast(&SqlType::Bigint));
		assert!(!column.can_implicitly_cast(&SqlType::String));
	}

	#[test]
	fn test_display() {
		assert_eq!(Column::new("id", SqlType::Integer, Namespace::Key, 0).to_string(), "`id` INTEGER KEY");
		assert_eq!(Column::new("name", SqlType::String, Namespace::Value, 0).to_string(), "`name` STRING");
	}

	#[test]
	fn test_namespace_precedence() {
		assert!(Namespace::Key < Namespace::Value);
	}
}
