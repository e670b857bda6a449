// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use rowflow_core::{
	ColumnName, GenericKey, PseudoColumnVersion, Row, RowBuilder,
	schema::system::{pseudo_columns, pseudo_columns_to_materialize},
};
use rowflow_type::{Result, return_internal_error};
use tracing::{debug, instrument};

use crate::{
	StreamError,
	runtime::{RecordMetadata, ValueTransform},
};

/// Which pseudocolumns a stored row carries and which the served row must
/// present, both in canonical order.
#[derive(Debug, Clone, PartialEq)]
pub struct PseudoColumnLayout {
	stored: Vec<ColumnName>,
	target: Vec<ColumnName>,
}

impl PseudoColumnLayout {
	/// Layout of rows materialized under `recorded`, served under `current`.
	/// Fails when the stored pseudocolumns are not an ordered subsequence of
	/// the current ones.
	pub fn new(recorded: PseudoColumnVersion, current: PseudoColumnVersion) -> Result<Self> {
		let stored: Vec<ColumnName> = pseudo_columns_to_materialize(recorded).cloned().collect();
		let target: Vec<ColumnName> = pseudo_columns(current).iter().cloned().collect();

		let mut remaining = target.iter();
		for name in &stored {
			if !remaining.any(|t| t == name) {
				return_internal_error!(
					"pseudocolumn {} stored under version {} is out of order in version {}",
					name,
					recorded,
					current
				);
			}
		}

		Ok(Self {
			stored,
			target,
		})
	}

	/// Number of pseudocolumns written at materialization time
	pub fn pseudo_stored_count(&self) -> usize {
		self.stored.len()
	}

	/// Number of pseudocolumns of the served row
	pub fn pseudo_total_count(&self) -> usize {
		self.target.len()
	}

	/// Number of pseudocolumns synthesized from record metadata
	pub fn pseudo_to_add(&self) -> usize {
		self.pseudo_total_count() - self.pseudo_stored_count()
	}
}

/// Restores the serving layout of a row read back from a materialized store:
///
/// `user columns, pseudocolumns of the current version, key columns`
///
/// Stored pseudocolumns keep their persisted values and relative order. The
/// pseudocolumns that were never stored, ROWTIME and any introduced after the
/// recorded version, are taken from the record metadata.
pub struct AddRemainingPseudoAndKeyColumns {
	layout: PseudoColumnLayout,
}

impl AddRemainingPseudoAndKeyColumns {
	pub fn new(recorded: PseudoColumnVersion) -> Result<Self> {
		let layout = PseudoColumnLayout::new(recorded, PseudoColumnVersion::CURRENT)?;
		debug!(
			recorded = %recorded,
			stored = layout.pseudo_stored_count(),
			total = layout.pseudo_total_count(),
			"serving pseudocolumn layout"
		);
		Ok(Self {
			layout,
		})
	}

	pub fn layout(&self) -> &PseudoColumnLayout {
		&self.layout
	}
}

impl ValueTransform for AddRemainingPseudoAndKeyColumns {
	fn name(&self) -> &'static str {
		"add_remaining_pseudo_and_key_columns"
	}

	#[instrument(name = "stream::source::serve", level = "trace", skip_all, fields(
		timestamp = metadata.timestamp
	))]
	fn transform(&self, key: &GenericKey, row: Option<Row>, metadata: &RecordMetadata) -> Result<Option<Row>> {
		let Some(row) = row else {
			return Ok(None);
		};

		let layout = &self.layout;
		let stored_count = layout.pseudo_stored_count();
		if row.len() < stored_count {
			return Err(StreamError::MalformedStoredRow {
				expected: stored_count,
				actual: row.len(),
			}
			.into());
		}

		let num_user_columns = row.len() - stored_count;
		let mut out = RowBuilder::with_capacity(row.len() + layout.pseudo_to_add() + key.len());
		out.extend(&row[..num_user_columns]);

		let mut stored = layout.stored.iter().zip(&row[num_user_columns..]).peekable();
		for name in &layout.target {
			match stored.next_if(|(stored_name, _)| *stored_name == name) {
				Some((_, value)) => out.push(value.clone()),
				None => out.push(metadata.pseudo_column_value(name)?),
			}
		}

		out.extend(key.values());
		Ok(Some(out.build()))
	}
}
