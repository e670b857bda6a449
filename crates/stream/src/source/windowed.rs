// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use rowflow_core::{
	ColumnName, GenericKey, PseudoColumnVersion, Row, RowBuilder,
	schema::system::{pseudo_columns, window_bounds_column_names},
};
use rowflow_type::Result;
use tracing::instrument;

use crate::runtime::{RecordMetadata, ValueTransform};

/// Completes rows of a windowed table. Nothing but the source value is
/// stored, so every pseudocolumn comes from the record metadata:
///
/// `user columns, pseudocolumns, key columns, WINDOWSTART, WINDOWEND`
pub struct AddKeyAndPseudoColumns {
	pseudo_columns: Vec<ColumnName>,
	window_bounds: Vec<ColumnName>,
}

impl AddKeyAndPseudoColumns {
	pub fn new(version: PseudoColumnVersion) -> Self {
		Self {
			pseudo_columns: pseudo_columns(version).iter().cloned().collect(),
			window_bounds: window_bounds_column_names().iter().cloned().collect(),
		}
	}
}

impl ValueTransform for AddKeyAndPseudoColumns {
	fn name(&self) -> &'static str {
		"add_key_and_pseudo_columns"
	}

	#[instrument(name = "stream::source::windowed", level = "trace", skip_all, fields(
		timestamp = metadata.timestamp
	))]
	fn transform(&self, key: &GenericKey, row: Option<Row>, metadata: &RecordMetadata) -> Result<Option<Row>> {
		let Some(row) = row else {
			return Ok(None);
		};

		let mut out = RowBuilder::with_capacity(
			row.len() + self.pseudo_columns.len() + key.len() + self.window_bounds.len(),
		);
		out.extend(row.iter());
		for name in &self.pseudo_columns {
			out.push(metadata.pseudo_column_value(name)?);
		}
		out.extend(key.values());
		for name in &self.window_bounds {
			out.push(metadata.pseudo_column_value(name)?);
		}
		Ok(Some(out.build()))
	}
}
