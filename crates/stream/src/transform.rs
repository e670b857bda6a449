// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use rowflow_core::{GenericKey, LogicalSchema, PseudoColumnVersion, Row, RowBuilder};
use rowflow_type::Result;

use crate::{
	StreamError,
	runtime::{RecordMetadata, ValueTransform},
};

/// Passes every row through unchanged. Interposed with a materialization to
/// force a genuine state-store step after the stage before it.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityTransform;

impl ValueTransform for IdentityTransform {
	fn name(&self) -> &'static str {
		"identity"
	}

	fn transform(&self, _key: &GenericKey, row: Option<Row>, _metadata: &RecordMetadata) -> Result<Option<Row>> {
		Ok(row)
	}
}

/// Keeps the genuine value columns of a consumed row, dropping copies of
/// key columns and system columns carried in the source value.
#[derive(Debug, Clone)]
pub struct ProjectGenuineValueColumns {
	width: usize,
	positions: Vec<usize>,
}

impl ProjectGenuineValueColumns {
	/// `None` when every value column of `schema` is genuine under `version`
	pub fn of(schema: &LogicalSchema, version: PseudoColumnVersion) -> Option<Self> {
		let genuine = schema.without_pseudo_and_key_cols_in_value(version);
		let positions: Vec<usize> = schema
			.value()
			.iter()
			.enumerate()
			.filter(|(_, column)| genuine.find_value_column(&column.name).is_some())
			.map(|(position, _)| position)
			.collect();

		if positions.len() == schema.value().len() {
			return None;
		}

		Some(Self {
			width: schema.value().len(),
			positions,
		})
	}

	pub fn positions(&self) -> &[usize] {
		&self.positions
	}
}

impl ValueTransform for ProjectGenuineValueColumns {
	fn name(&self) -> &'static str {
		"project_genuine_value_columns"
	}

	fn transform(&self, _key: &GenericKey, row: Option<Row>, _metadata: &RecordMetadata) -> Result<Option<Row>> {
		let Some(row) = row else {
			return Ok(None);
		};

		if row.len() != self.width {
			return Err(StreamError::SerdeMismatch {
				context: self.name().to_string(),
				expected: self.width,
				actual: row.len(),
			}
			.into());
		}

		let mut out = RowBuilder::with_capacity(self.positions.len());
		out.extend(self.positions.iter().map(|&position| &row[position]));
		Ok(Some(out.build()))
	}
}
