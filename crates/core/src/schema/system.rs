// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Engine-injected system columns and the pseudocolumn version registry.
//!
//! Every materialized source records the pseudocolumn version it was built
//! with. The version fixes which pseudocolumns exist and in which order they
//! appear in stored rows, so the table below may only ever grow by appending
//! a new version whose set extends the previous one. Existing rows are never
//! edited or reordered.

use std::fmt::{Display, Formatter};

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use rowflow_type::{Error, Result, SqlType, internal_error};
use serde::{Deserialize, Serialize};

use super::ColumnName;

pub const ROWTIME_NAME: &str = "ROWTIME";
pub const ROWTIME_TYPE: SqlType = SqlType::Bigint;

pub const ROWPARTITION_NAME: &str = "ROWPARTITION";
pub const ROWPARTITION_TYPE: SqlType = SqlType::Integer;

pub const ROWOFFSET_NAME: &str = "ROWOFFSET";
pub const ROWOFFSET_TYPE: SqlType = SqlType::Bigint;

pub const WINDOWSTART_NAME: &str = "WINDOWSTART";
pub const WINDOWEND_NAME: &str = "WINDOWEND";
pub const WINDOWBOUND_TYPE: SqlType = SqlType::Bigint;

/// Pseudocolumns per version, in canonical order. Append only.
const VERSIONED_PSEUDO_COLUMNS: &[&[&str]] = &[
	// version 0
	&[ROWTIME_NAME],
	// version 1
	&[ROWTIME_NAME, ROWPARTITION_NAME, ROWOFFSET_NAME],
];

const WINDOW_BOUNDS_COLUMN_NAMES: &[&str] = &[WINDOWSTART_NAME, WINDOWEND_NAME];

/// Pseudocolumns whose value is cheaply available from record metadata at
/// read time and therefore never written to a materialized store.
const READ_TIME_PSEUDO_COLUMNS: &[&str] = &[ROWTIME_NAME];

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct PseudoColumnVersion(u32);

impl PseudoColumnVersion {
	pub const LEGACY: PseudoColumnVersion = PseudoColumnVersion(0);
	pub const ROWTIME: PseudoColumnVersion = PseudoColumnVersion(0);
	pub const ROWPARTITION_ROWOFFSET: PseudoColumnVersion = PseudoColumnVersion(1);
	pub const CURRENT: PseudoColumnVersion = PseudoColumnVersion(1);

	/// Fails with an internal error for versions the registry does not know.
	pub fn from_number(number: u32) -> Result<Self> {
		if (number as usize) < VERSIONED_PSEUDO_COLUMNS.len() {
			Ok(PseudoColumnVersion(number))
		} else {
			Err(Error(internal_error!("unknown pseudocolumn version: {}", number)))
		}
	}

	pub fn number(&self) -> u32 {
		self.0
	}

	/// Every registered version, oldest first
	pub fn all() -> impl Iterator<Item = PseudoColumnVersion> {
		(0..VERSIONED_PSEUDO_COLUMNS.len() as u32).map(PseudoColumnVersion)
	}
}

impl TryFrom<i64> for PseudoColumnVersion {
	type Error = Error;

	fn try_from(value: i64) -> Result<Self> {
		match u32::try_from(value) {
			Ok(number) => PseudoColumnVersion::from_number(number),
			Err(_) => Err(Error(internal_error!("unknown pseudocolumn version: {}", value))),
		}
	}
}

impl From<PseudoColumnVersion> for i64 {
	fn from(value: PseudoColumnVersion) -> Self {
		value.0 as i64
	}
}

impl Display for PseudoColumnVersion {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		Display::fmt(&self.0, f)
	}
}

struct Registry {
	pseudo_columns: Vec<IndexSet<ColumnName>>,
	system_columns: Vec<IndexSet<ColumnName>>,
	window_bounds: IndexSet<ColumnName>,
}

impl Registry {
	fn build() -> Self {
		let window_bounds: IndexSet<ColumnName> =
			WINDOW_BOUNDS_COLUMN_NAMES.iter().map(|name| ColumnName::from(*name)).collect();

		let mut pseudo_columns: Vec<IndexSet<ColumnName>> = Vec::with_capacity(VERSIONED_PSEUDO_COLUMNS.len());
		for names in VERSIONED_PSEUDO_COLUMNS {
			let set: IndexSet<ColumnName> = names.iter().map(|name| ColumnName::from(*name)).collect();
			if let Some(previous) = pseudo_columns.last() {
				assert!(
					set.len() >= previous.len() && previous.iter().zip(set.iter()).all(|(a, b)| a == b),
					"pseudocolumn versions must only append columns"
				);
			}
			pseudo_columns.push(set);
		}

		let system_columns = pseudo_columns
			.iter()
			.map(|pseudo| pseudo.iter().chain(window_bounds.iter()).cloned().collect())
			.collect();

		Self {
			pseudo_columns,
			system_columns,
			window_bounds,
		}
	}
}

static REGISTRY: Lazy<Registry> = Lazy::new(Registry::build);

/// The pseudocolumns of `version`, in canonical order
pub fn pseudo_columns(version: PseudoColumnVersion) -> &'static IndexSet<ColumnName> {
	&REGISTRY.pseudo_columns[version.0 as usize]
}

/// Same as [`pseudo_columns`] for a raw version number as found in persisted
/// source metadata.
pub fn pseudo_columns_for(number: i64) -> Result<&'static IndexSet<ColumnName>> {
	Ok(pseudo_columns(PseudoColumnVersion::try_from(number)?))
}

/// The pseudocolumns of `version` written into a materialized store, in
/// canonical order.
pub fn pseudo_columns_to_materialize(version: PseudoColumnVersion) -> impl Iterator<Item = &'static ColumnName> {
	pseudo_columns(version).iter().filter(|name| !READ_TIME_PSEUDO_COLUMNS.contains(&name.as_str()))
}

pub fn window_bounds_column_names() -> &'static IndexSet<ColumnName> {
	&REGISTRY.window_bounds
}

/// Pseudocolumns of `version` followed by the window bounds
pub fn system_column_names(version: PseudoColumnVersion) -> &'static IndexSet<ColumnName> {
	&REGISTRY.system_columns[version.0 as usize]
}

pub fn is_pseudo_column(name: &str, version: PseudoColumnVersion) -> bool {
	pseudo_columns(version).contains(name)
}

pub fn is_window_bound(name: &str) -> bool {
	window_bounds_column_names().contains(name)
}

pub fn is_system_column(name: &str, version: PseudoColumnVersion) -> bool {
	system_column_names(version).contains(name)
}

pub fn system_column_type(name: &str) -> Option<SqlType> {
	match name {
		ROWTIME_NAME => Some(ROWTIME_TYPE),
		ROWPARTITION_NAME => Some(ROWPARTITION_TYPE),
		ROWOFFSET_NAME => Some(ROWOFFSET_TYPE),
		WINDOWSTART_NAME | WINDOWEND_NAME => Some(WINDOWBOUND_TYPE),
		_ => None,
	}
}
