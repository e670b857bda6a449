// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	sync::Arc,
};

use indexmap::IndexSet;
use rowflow_type::{Error, Result, SqlType, internal_error};
use serde::{Deserialize, Serialize};

use super::{
	Column, ColumnName, LogicalSchemaBuilder, Namespace,
	system::{self, PseudoColumnVersion, WINDOWBOUND_TYPE},
};

/// An immutable, ordered list of columns: all KEY columns followed by all
/// VALUE columns, each namespace indexed densely from zero.
///
/// Clones share the underlying column list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Column>", into = "Vec<Column>")]
pub struct LogicalSchema(Arc<Inner>);

#[derive(Debug, PartialEq, Eq)]
struct Inner {
	columns: Vec<Column>,
	key_count: usize,
}

impl LogicalSchema {
	pub fn builder() -> LogicalSchemaBuilder {
		LogicalSchemaBuilder::new()
	}

	pub(crate) fn from_namespaces(mut key: Vec<Column>, value: Vec<Column>) -> Self {
		let key_count = key.len();
		key.extend(value);
		Self(Arc::new(Inner {
			columns: key,
			key_count,
		}))
	}

	/// A builder holding this schema's columns, to extend it
	pub fn as_builder(&self) -> LogicalSchemaBuilder {
		let mut builder = LogicalSchemaBuilder::new();
		for column in self.columns() {
			builder.push(column.namespace, column.name.clone(), column.r#type.clone());
		}
		builder
	}

	/// KEY columns then VALUE columns
	pub fn columns(&self) -> &[Column] {
		&self.0.columns
	}

	pub fn key(&self) -> &[Column] {
		&self.0.columns[..self.0.key_count]
	}

	pub fn value(&self) -> &[Column] {
		&self.0.columns[self.0.key_count..]
	}

	/// Looks a column up by name. A KEY column shadows a VALUE column of the
	/// same name.
	pub fn find_column(&self, name: &str) -> Option<&Column> {
		self.columns().iter().find(|c| c.name == name)
	}

	pub fn find_value_column(&self, name: &str) -> Option<&Column> {
		self.value().iter().find(|c| c.name == name)
	}

	pub fn is_key_column(&self, name: &str) -> bool {
		self.key().iter().any(|c| c.name == name)
	}

	pub fn value_contains_any(&self, names: &IndexSet<ColumnName>) -> bool {
		self.value().iter().any(|c| names.contains(&c.name))
	}

	/// Whether `other` can stand in for this schema: same columns by name and
	/// namespace in the same positions, with every type of `other` implicitly
	/// castable to the type of the matching column here.
	pub fn compatible_with(&self, other: &LogicalSchema) -> bool {
		self.columns().len() == other.columns().len()
			&& self.columns().iter().zip(other.columns()).all(|(this, that)| {
				this.equals_ignore_type(that) && that.can_implicitly_cast(&this.r#type)
			})
	}

	/// Replaces the VALUE namespace with a copy of every KEY column
	pub fn with_key_cols_only(&self) -> LogicalSchema {
		let mut builder = LogicalSchemaBuilder::new();
		for column in self.key() {
			builder.push(Namespace::Key, column.name.clone(), column.r#type.clone());
		}
		for column in self.key() {
			builder.push(Namespace::Value, column.name.clone(), column.r#type.clone());
		}
		builder.build()
	}

	/// The layout rows of this schema take after every pseudocolumn of
	/// `version`, the key columns and, for windowed sources, the window bounds
	/// were added to the value:
	///
	/// `genuine values, pseudocolumns, key columns, [WINDOWSTART, WINDOWEND]`
	///
	/// This order is the storage format of materialized rows.
	///
	/// Fails when a key column shares its name with a column appended to the
	/// value.
	pub fn with_pseudo_and_key_cols_in_value(
		&self,
		windowed: bool,
		version: PseudoColumnVersion,
	) -> Result<LogicalSchema> {
		let mut builder = self.genuine_columns(version);

		for name in system::pseudo_columns(version) {
			builder = builder.value_column(name.clone(), pseudo_column_type(name)?)?;
		}

		builder = builder.value_columns(self.key())?;

		if windowed {
			for name in system::window_bounds_column_names() {
				builder = builder.value_column(name.clone(), WINDOWBOUND_TYPE)?;
			}
		}

		Ok(builder.build())
	}

	/// Inverse of [`Self::with_pseudo_and_key_cols_in_value`]: drops every
	/// system column of `version` and every copy of a key column from the
	/// value.
	pub fn without_pseudo_and_key_cols_in_value(&self, version: PseudoColumnVersion) -> LogicalSchema {
		self.genuine_columns(version).build()
	}

	/// The genuine value columns followed by the pseudocolumns of `version`
	/// that are written to a materialized store.
	pub fn with_pseudo_columns_to_materialize(&self, version: PseudoColumnVersion) -> Result<LogicalSchema> {
		let mut builder = self.genuine_columns(version);
		for name in system::pseudo_columns_to_materialize(version) {
			builder.push(Namespace::Value, name.clone(), pseudo_column_type(name)?);
		}
		Ok(builder.build())
	}

	fn genuine_columns(&self, version: PseudoColumnVersion) -> LogicalSchemaBuilder {
		let mut builder = LogicalSchemaBuilder::new();
		for column in self.key() {
			builder.push(Namespace::Key, column.name.clone(), column.r#type.clone());
		}
		for column in self.value() {
			if system::is_system_column(&column.name, version) || self.is_key_column(&column.name) {
				continue;
			}
			builder.push(Namespace::Value, column.name.clone(), column.r#type.clone());
		}
		builder
	}
}

fn pseudo_column_type(name: &ColumnName) -> Result<SqlType> {
	match system::system_column_type(name) {
		Some(r#type) => Ok(r#type),
		None => Err(Error(internal_error!("pseudocolumn {} has no registered type", name))),
	}
}

impl Display for LogicalSchema {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		for (i, column) in self.columns().iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			Display::fmt(column, f)?;
		}
		Ok(())
	}
}

impl From<LogicalSchema> for Vec<Column> {
	fn from(schema: LogicalSchema) -> Self {
		schema.columns().to_vec()
	}
}

impl TryFrom<Vec<Column>> for LogicalSchema {
	type Error = Error;

	fn try_from(columns: Vec<Column>) -> Result<Self> {
		let mut builder = LogicalSchemaBuilder::new();
		let mut in_value = false;
		for column in &columns {
			match column.namespace {
				Namespace::Key if in_value => {
					return Err(Error(internal_error!("key column {} follows value columns", column.name)));
				}
				Namespace::Key => builder = builder.key_column(column.name.clone(), column.r#type.clone())?,
				Namespace::Value => {
					in_value = true;
					builder = builder.value_column(column.name.clone(), column.r#type.clone())?
				}
			}
		}

		let schema = builder.build();
		if schema.columns() != columns.as_slice() {
			return Err(Error(internal_error!("column indexes of schema {} are not dense", schema)));
		}
		Ok(schema)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn schema() -> LogicalSchema {
		LogicalSchema::builder()
			.key_column("id", SqlType::Integer)
			.unwrap()
			.value_column("name", SqlType::String)
			.unwrap()
			.value_column("score", SqlType::Double)
			.unwrap()
			.build()
	}

	fn names(columns: &[Column]) -> Vec<&str> {
		columns.iter().map(|c| c.name.as_str()).collect()
	}

	#[test]
	fn test_namespaces() {
		let schema = schema();
		assert_eq!(names(schema.key()), vec!["id"]);
		assert_eq!(names(schema.value()), vec!["name", "score"]);
		assert_eq!(names(schema.columns()), vec!["id", "name", "score"]);
	}

	#[test]
	fn test_find_column_prefers_key() {
		let schema = LogicalSchema::builder()
			.value_column("id", SqlType::String)
			.unwrap()
			.key_column("id", SqlType::Integer)
			.unwrap()
			.build();

		let column = schema.find_column("id").unwrap();
		assert_eq!(column.namespace, Namespace::Key);
		assert_eq!(column.r#type, SqlType::Integer);

		let column = schema.find_value_column("id").unwrap();
		assert_eq!(column.namespace, Namespace::Value);
		assert!(schema.find_column("missing").is_none());
	}

	#[test]
	fn test_is_key_column() {
		let schema = schema();
		assert!(schema.is_key_column("id"));
		assert!(!schema.is_key_column("name"));
	}

	#[test]
	fn test_value_contains_any() {
		let schema = schema();
		let names: IndexSet<ColumnName> = ["x", "score"].into_iter().map(ColumnName::from).collect();
		assert!(schema.value_contains_any(&names));

		let names: IndexSet<ColumnName> = ["id"].into_iter().map(ColumnName::from).collect();
		assert!(!schema.value_contains_any(&names));
		assert!(!schema.value_contains_any(&IndexSet::new()));
	}

	#[test]
	fn test_with_key_cols_only() {
		let schema = schema().with_key_cols_only();
		assert_eq!(names(schema.key()), vec!["id"]);
		assert_eq!(names(schema.value()), vec!["id"]);
		assert_eq!(schema.value()[0].r#type, SqlType::Integer);
	}

	#[test]
	fn test_compatible_with_widening() {
		let narrow = LogicalSchema::builder()
			.key_column("id", SqlType::Integer)
			.unwrap()
			.value_column("v", SqlType::Integer)
			.unwrap()
			.build();
		let wide = LogicalSchema::builder()
			.key_column("id", SqlType::Integer)
			.unwrap()
			.value_column("v", SqlType::Bigint)
			.unwrap()
			.build();

		assert!(wide.compatible_with(&narrow));
		assert!(!narrow.compatible_with(&wide));
		assert!(narrow.compatible_with(&narrow));
	}

	#[test]
	fn test_compatible_with_requires_same_shape() {
		let schema = schema();
		let renamed = LogicalSchema::builder()
			.key_column("id", SqlType::Integer)
			.unwrap()
			.value_column("title", SqlType::String)
			.unwrap()
			.value_column("score", SqlType::Double)
			.unwrap()
			.build();
		let shorter = LogicalSchema::builder()
			.key_column("id", SqlType::Integer)
			.unwrap()
			.value_column("name", SqlType::String)
			.unwrap()
			.build();

		assert!(!schema.compatible_with(&renamed));
		assert!(!schema.compatible_with(&shorter));
		assert!(!shorter.compatible_with(&schema));
	}

	#[test]
	fn test_rebuild_legacy() {
		let schema = schema().with_pseudo_and_key_cols_in_value(false, PseudoColumnVersion::LEGACY).unwrap();
		assert_eq!(names(schema.value()), vec!["name", "score", "ROWTIME", "id"]);
		assert_eq!(schema.find_value_column("ROWTIME").unwrap().r#type, SqlType::Bigint);
		assert_eq!(schema.find_value_column("id").unwrap().index, 3);
	}

	#[test]
	fn test_rebuild_is_idempotent() {
		let once = schema().with_pseudo_and_key_cols_in_value(true, PseudoColumnVersion::CURRENT).unwrap();
		let twice = once.with_pseudo_and_key_cols_in_value(true, PseudoColumnVersion::CURRENT).unwrap();
		assert_eq!(once, twice);
	}

	#[test]
	fn test_rebuild_rejects_key_named_like_pseudo_column() {
		let schema = LogicalSchema::builder().key_column("ROWTIME", SqlType::Bigint).unwrap().build();
		let err = schema.with_pseudo_and_key_cols_in_value(false, PseudoColumnVersion::CURRENT).unwrap_err();
		assert_eq!(err.code(), "SCHEMA_001");
	}

	#[test]
	fn test_without_pseudo_and_key_cols_in_value() {
		let full = schema().with_pseudo_and_key_cols_in_value(true, PseudoColumnVersion::CURRENT).unwrap();
		let stripped = full.without_pseudo_and_key_cols_in_value(PseudoColumnVersion::CURRENT);
		assert_eq!(stripped, schema());
	}

	#[test]
	fn test_without_keeps_columns_unknown_to_older_version() {
		let schema = LogicalSchema::builder()
			.key_column("id", SqlType::Integer)
			.unwrap()
			.value_column("ROWOFFSET", SqlType::Bigint)
			.unwrap()
			.value_column("ROWTIME", SqlType::Bigint)
			.unwrap()
			.build();

		let stripped = schema.without_pseudo_and_key_cols_in_value(PseudoColumnVersion::LEGACY);
		assert_eq!(names(stripped.value()), vec!["ROWOFFSET"]);
		assert_eq!(stripped.value()[0].index, 0);
	}

	#[test]
	fn test_with_pseudo_columns_to_materialize() {
		let legacy = schema().with_pseudo_columns_to_materialize(PseudoColumnVersion::LEGACY).unwrap();
		assert_eq!(names(legacy.value()), vec!["name", "score"]);

		let current = schema().with_pseudo_columns_to_materialize(PseudoColumnVersion::CURRENT).unwrap();
		assert_eq!(names(current.value()), vec!["name", "score", "ROWPARTITION", "ROWOFFSET"]);
		assert_eq!(current.find_value_column("ROWPARTITION").unwrap().r#type, SqlType::Integer);
		assert_eq!(names(current.key()), vec!["id"]);
	}

	#[test]
	fn test_as_builder_extends() {
		let extended = schema().as_builder().value_column("extra", SqlType::Boolean).unwrap().build();
		assert_eq!(names(extended.value()), vec!["name", "score", "extra"]);
		assert_eq!(extended.value()[2].index, 2);

		assert!(schema().as_builder().value_column("name", SqlType::String).is_err());
	}

	#[test]
	fn test_display() {
		assert_eq!(schema().to_string(), "`id` INTEGER KEY, `name` STRING, `score` DOUBLE");
	}

	#[test]
	fn test_serde_round_trip() {
		let schema = schema().with_pseudo_and_key_cols_in_value(true, PseudoColumnVersion::CURRENT).unwrap();
		let json = serde_json::to_string(&schema).unwrap();
		let decoded: LogicalSchema = serde_json::from_str(&json).unwrap();
		assert_eq!(decoded, schema);
	}

	#[test]
	fn test_serde_rejects_invalid_layout() {
		let duplicate = vec![
			Column::new("a", SqlType::String, Namespace::Value, 0),
			Column::new("a", SqlType::String, Namespace::Value, 1),
		];
		let json = serde_json::to_string(&duplicate).unwrap();
		assert!(serde_json::from_str::<LogicalSchema>(&json).is_err());

		let gap = vec![Column::new("a", SqlType::String, Namespace::Value, 1)];
		let json = serde_json::to_string(&gap).unwrap();
		assert!(serde_json::from_str::<LogicalSchema>(&json).is_err());

		let key_after_value = vec![
			Column::new("a", SqlType::String, Namespace::Value, 0),
			Column::new("k", SqlType::String, Namespace::Key, 0),
		];
		let json = serde_json::to_string(&key_after_value).unwrap();
		assert!(serde_json::from_str::<LogicalSchema>(&json).is_err());
	}

	#[test]
	fn test_clones_share_columns() {
		let a = schema();
		let b = a.clone();
		assert!(std::ptr::eq(a.columns().as_ptr(), b.columns().as_ptr()));
	}
}
