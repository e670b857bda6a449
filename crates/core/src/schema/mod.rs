// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Logical schemas of streaming sources.
//!
//! A [`LogicalSchema`] is an immutable, ordered list of [`Column`]s split into
//! a KEY and a VALUE namespace. The order of the VALUE namespace after
//! [`LogicalSchema::with_pseudo_and_key_cols_in_value`] is the column order
//! of materialized rows and therefore part of the storage format.

mod builder;
mod column;
mod error;
mod logical;
pub mod system;

pub use builder::LogicalSchemaBuilder;
pub use column::{Column, ColumnName, Namespace};
pub use error::SchemaError;
pub use logical::LogicalSchema;
