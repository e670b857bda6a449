// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use rowflow_core::{
	ColumnName, GenericKey, PseudoColumnVersion, Row, RowBuilder, schema::system::pseudo_columns_to_materialize,
};
use rowflow_type::Result;
use tracing::instrument;

use crate::runtime::{RecordMetadata, ValueTransform};

/// Appends the pseudocolumns that cannot be recovered when the row is read
/// back from the store. ROWTIME is never written.
pub struct AddPseudoColumnsToMaterialize {
	columns: Vec<ColumnName>,
}

impl AddPseudoColumnsToMaterialize {
	pub fn new(version: PseudoColumnVersion) -> Self {
		Self {
			columns: pseudo_columns_to_materialize(version).cloned().collect(),
		}
	}

	pub fn columns(&self) -> &[ColumnName] {
		&self.columns
	}
}

impl ValueTransform for AddPseudoColumnsToMaterialize {
	fn name(&self) -> &'static str {
		"add_pseudo_columns_to_materialize"
	}

	#[instrument(name = "stream::source::materialize", level = "trace", skip_all, fields(
		partition = metadata.partition,
		offset = metadata.offset
	))]
	fn transform(&self, _key: &GenericKey, row: Option<Row>, metadata: &RecordMetadata) -> Result<Option<Row>> {
		let Some(row) = row else {
			return Ok(None);
		};

		if self.columns.is_empty() {
			return Ok(Some(row));
		}

		let mut out = RowBuilder::with_capacity(row.len() + self.columns.len());
		out.extend(row.iter());
		for name in &self.columns {
			out.push(metadata.pseudo_column_value(name)?);
		}
		Ok(Some(out.build()))
	}
}

#[cfg(test)]
mod tests {
	use rowflow_core::row;
	use rowflow_type::Value;

	use super::*;

	#[test]
	fn test_legacy_appends_nothing() {
		let stage = AddPseudoColumnsToMaterialize::new(PseudoColumnVersion::LEGACY);
		let metadata = RecordMetadata::new(5_000, 2, 17);

		let out = stage.transform(&GenericKey::default(), Some(row!["a"]), &metadata).unwrap();
		assert_eq!(out, Some(row!["a"]));
	}

	#[test]
	fn test_current_appends_partition_and_offset() {
		let stage = AddPseudoColumnsToMaterialize::new(PseudoColumnVersion::CURRENT);
		let metadata = RecordMetadata::new(5_000, 2, 17);

		let out = stage.transform(&GenericKey::default(), Some(row!["a", 1.5]), &metadata).unwrap().unwrap();
		assert_eq!(out.values(), &[Value::from("a"), Value::Double(1.5), Value::Integer(2), Value::Bigint(17)]);
	}

	#[test]
	fn test_never_stores_rowtime() {
		let stage = AddPseudoColumnsToMaterialize::new(PseudoColumnVersion::CURRENT);
		assert!(stage.columns().iter().all(|c| c != "ROWTIME"));
	}

	#[test]
	fn test_tombstone_passes_through() {
		let stage = AddPseudoColumnsToMaterialize::new(PseudoColumnVersion::CURRENT);
		let out = stage.transform(&GenericKey::default(), None, &RecordMetadata::new(0, 0, 0)).unwrap();
		assert_eq!(out, None);
	}
}
