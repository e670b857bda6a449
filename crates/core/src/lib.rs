// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod key;
pub mod row;
pub mod schema;

pub use key::GenericKey;
pub use row::{Row, RowBuilder};
pub use rowflow_type::{Error, Result, Value};
pub use schema::{
	Column, ColumnName, LogicalSchema, LogicalSchemaBuilder, Namespace, SchemaError,
	system::PseudoColumnVersion,
};
