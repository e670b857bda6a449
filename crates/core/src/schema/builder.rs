// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use rowflow_type::{Result, SqlType};

use super::{Column, ColumnName, LogicalSchema, Namespace, SchemaError};

/// Accumulates key and value columns, assigning dense indexes per namespace
/// in append order.
#[derive(Debug, Clone, Default)]
pub struct LogicalSchemaBuilder {
	key: Vec<Column>,
	value: Vec<Column>,
}

impl LogicalSchemaBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn key_column(mut self, name: impl Into<ColumnName>, r#type: SqlType) -> Result<Self> {
		self.add(Namespace::Key, name.into(), r#type)?;
		Ok(self)
	}

	pub fn value_column(mut self, name: impl Into<ColumnName>, r#type: SqlType) -> Result<Self> {
		self.add(Namespace::Value, name.into(), r#type)?;
		Ok(self)
	}

	/// Adds every column to the KEY namespace, keeping name and type only
	pub fn key_columns<'a>(mut self, columns: impl IntoIterator<Item = &'a Column>) -> Result<Self> {
		for column in columns {
			self.add(Namespace::Key, column.name.clone(), column.r#type.clone())?;
		}
		Ok(self)
	}

	/// Adds every column to the VALUE namespace, keeping name and type only
	pub fn value_columns<'a>(mut self, columns: impl IntoIterator<Item = &'a Column>) -> Result<Self> {
		for column in columns {
			self.add(Namespace::Value, column.name.clone(), column.r#type.clone())?;
		}
		Ok(self)
	}

	pub fn build(self) -> LogicalSchema {
		LogicalSchema::from_namespaces(self.key, self.value)
	}

	fn add(&mut self, namespace: Namespace, name: ColumnName, r#type: SqlType) -> Result<()> {
		let columns = self.namespace_mut(namespace);
		if columns.iter().any(|c| c.name == name) {
			return Err(SchemaError::DuplicateColumn {
				namespace,
				name,
				r#type,
			}
			.into());
		}
		let index = columns.len();
		columns.push(Column::new(name, r#type, namespace, index));
		Ok(())
	}

	/// Appends without the duplicate check, for rebuilds whose inputs are
	/// already known to be unique.
	pub(crate) fn push(&mut self, namespace: Namespace, name: ColumnName, r#type: SqlType) {
		let columns = self.namespace_mut(namespace);
		let index = columns.len();
		columns.push(Column::new(name, r#type, namespace, index));
	}

	fn namespace_mut(&mut self, namespace: Namespace) -> &mut Vec<Column> {
		match namespace {
			Namespace::Key => &mut self.key,
			Namespace::Value => &mut self.value,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_assigns_dense_indexes_per_namespace() {
		let schema = LogicalSchemaBuilder::new()
			.key_column("k0", SqlType::Integer)
			.unwrap()
			.value_column("v0", SqlType::String)
			.unwrap()
			.key_column("k1", SqlType::Bigint)
			.unwrap()
			.value_column("v1", SqlType::Double)
			.unwrap()
			.build();

		let key: Vec<_> = schema.key().iter().map(|c| (c.name.as_str(), c.index)).collect();
		let value: Vec<_> = schema.value().iter().map(|c| (c.name.as_str(), c.index)).collect();
		assert_eq!(key, vec![("k0", 0), ("k1", 1)]);
		assert_eq!(value, vec![("v0", 0), ("v1", 1)]);
	}

	#[test]
	fn test_duplicate_in_same_namespace_fails() {
		let err = LogicalSchemaBuilder::new()
			.value_column("a", SqlType::String)
			.unwrap()
			.value_column("a", SqlType::Integer)
			.unwrap_err();
		assert_eq!(err.code(), "SCHEMA_001");

		let err = LogicalSchemaBuilder::new()
			.key_column("a", SqlType::String)
			.unwrap()
			.key_column("a", SqlType::String)
			.unwrap_err();
		assert_eq!(err.code(), "SCHEMA_001");
	}

	#[test]
	fn test_same_name_in_both_namespaces() {
		let schema = LogicalSchemaBuilder::new()
			.key_column("a", SqlType::String)
			.unwrap()
			.value_column("a", SqlType::String)
			.unwrap()
			.build();
		assert_eq!(schema.columns().len(), 2);
	}

	#[test]
	fn test_bulk_add_rejects_duplicates() {
		let columns = vec![
			Column::new("a", SqlType::String, Namespace::Value, 0),
			Column::new("a", SqlType::Integer, Namespace::Key, 0),
		];
		assert!(LogicalSchemaBuilder::new().value_columns(&columns).is_err());
	}
}
