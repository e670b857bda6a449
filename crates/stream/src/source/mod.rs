// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Table sources and their materialization.
//!
//! A non-windowed table is built as
//!
//! ```text
//! table(topic)
//!   -> ProjectGenuineValueColumns     (only if the value copies key columns)
//!   -> AddPseudoColumnsToMaterialize
//!   -> IdentityTransform             (materialized unless repartitioned later)
//!   -> AddRemainingPseudoAndKeyColumns
//! ```
//!
//! so that the store only holds the user columns plus the pseudocolumns that
//! cannot be recovered at read time. A windowed table is materialized as
//! consumed and completed by [`AddKeyAndPseudoColumns`].
//!
//! Rows leaving either pipeline follow
//! [`LogicalSchema::with_pseudo_and_key_cols_in_value`] for the current
//! pseudocolumn version, whatever version the source was recorded with.

mod materialize;
mod serve;
mod windowed;

use std::sync::Arc;

use indexmap::IndexSet;
pub use materialize::AddPseudoColumnsToMaterialize;
use rowflow_core::{LogicalSchema, PseudoColumnVersion};
use rowflow_type::Result;
use serde::{Deserialize, Serialize};
pub use serve::{AddRemainingPseudoAndKeyColumns, PseudoColumnLayout};
use tracing::{debug, instrument};
pub use windowed::AddKeyAndPseudoColumns;

use crate::{
	QueryContext, StreamConfig,
	codec::{Formats, KeyFormat, PhysicalSchema, SerdeFactory, WindowInfo},
	runtime::{Consumed, Materialized, StreamsBuilder, TableHandle},
	transform::{IdentityTransform, ProjectGenuineValueColumns},
};

/// A table read from a topic, as persisted with the query plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSource {
	pub topic: String,
	pub formats: Formats,
	/// User key and value columns, no pseudocolumns
	pub source_schema: LogicalSchema,
	/// Fixed when the source is first materialized
	pub pseudo_column_version: PseudoColumnVersion,
	/// Present for windowed tables
	pub window: Option<WindowInfo>,
	pub context: QueryContext,
}

impl TableSource {
	pub fn is_windowed(&self) -> bool {
		self.window.is_some()
	}

	pub fn key_format(&self) -> KeyFormat {
		let format = self.formats.key_format.clone();
		let features = self.formats.key_features.clone();
		match &self.window {
			Some(window) => KeyFormat::windowed(format, features, window.clone()),
			None => KeyFormat::non_windowed(format, features),
		}
	}

	/// Schema of the rows the built table emits
	pub fn schema(&self) -> Result<LogicalSchema> {
		self.source_schema.with_pseudo_and_key_cols_in_value(self.is_windowed(), PseudoColumnVersion::CURRENT)
	}

	fn physical_schema(&self, logical: LogicalSchema) -> PhysicalSchema {
		PhysicalSchema::from(logical, self.formats.key_features.clone(), self.formats.value_features.clone())
	}
}

/// What the planner knows about the plan a source is part of
#[derive(Debug, Clone, Default)]
pub struct PlanInfo {
	repartitioned: IndexSet<String>,
}

impl PlanInfo {
	pub fn new() -> Self {
		Self::default()
	}

	/// Marks the source reading `topic` as repartitioned further down the plan
	pub fn with_repartitioned(mut self, topic: impl Into<String>) -> Self {
		self.repartitioned.insert(topic.into());
		self
	}

	pub fn is_repartitioned_in_plan(&self, source: &TableSource) -> bool {
		self.repartitioned.contains(&source.topic)
	}
}

pub struct RuntimeBuildContext<'a, B: StreamsBuilder> {
	pub streams: &'a mut B,
	pub serde_factory: &'a dyn SerdeFactory,
	pub config: &'a StreamConfig,
}

/// A built table together with what downstream steps need to know about it
pub struct TableHolder<T> {
	pub table: T,
	pub schema: LogicalSchema,
	pub state_store_name: String,
	pub changelog_topic: String,
	/// Whether a state store was forced right after the source
	pub forced_materialization: bool,
}

pub struct SourceBuilder;

impl SourceBuilder {
	#[instrument(name = "stream::source::build_table", level = "debug", skip_all, fields(
		topic = %source.topic,
		version = %source.pseudo_column_version,
		windowed = source.is_windowed()
	))]
	pub fn build_table<B: StreamsBuilder>(
		source: &TableSource,
		ctx: &mut RuntimeBuildContext<'_, B>,
		plan_info: &PlanInfo,
	) -> Result<TableHolder<B::Table>> {
		let recorded = source.pseudo_column_version;
		let key_format = source.key_format();

		let source_physical = source.physical_schema(source.source_schema.clone());
		let consumed = Consumed {
			key_serde: ctx.serde_factory.key_serde(&key_format, &source_physical, &source.context)?,
			value_serde: ctx.serde_factory.value_serde(
				&source.formats.value_format,
				&source_physical,
				&source.context,
			)?,
		};

		let state_store_name = format!("{}-Reduce", source.context.op_name());
		let changelog_topic = ctx.config.changelog_topic(&state_store_name);

		let (table, forced_materialization) = if source.is_windowed() {
			let materialized =
				Self::materialized(ctx, source, &key_format, source.source_schema.clone(), &state_store_name)?;
			let mut table = ctx.streams.table(&source.topic, consumed, Some(materialized))?;
			if let Some(project) = ProjectGenuineValueColumns::of(&source.source_schema, PseudoColumnVersion::CURRENT) {
				table = table.transform_values(Arc::new(project), None)?;
			}
			let table = table.transform_values(Arc::new(AddKeyAndPseudoColumns::new(PseudoColumnVersion::CURRENT)), None)?;
			(table, true)
		} else {
			let forced = !plan_info.is_repartitioned_in_plan(source);
			debug!(forced, "source materialization");

			let materialized = if forced {
				let stored_schema = source.source_schema.with_pseudo_columns_to_materialize(recorded)?;
				Some(Self::materialized(ctx, source, &key_format, stored_schema, &state_store_name)?)
			} else {
				None
			};

			let mut table = ctx.streams.table(&source.topic, consumed, None)?;
			if let Some(project) = ProjectGenuineValueColumns::of(&source.source_schema, recorded) {
				table = table.transform_values(Arc::new(project), None)?;
			}
			let table = table.transform_values(Arc::new(AddPseudoColumnsToMaterialize::new(recorded)), None)?;
			let table = table.transform_values(Arc::new(IdentityTransform), materialized)?;
			let table = table.transform_values(Arc::new(AddRemainingPseudoAndKeyColumns::new(recorded)?), None)?;
			(table, forced)
		};

		Ok(TableHolder {
			table,
			schema: source.schema()?,
			state_store_name,
			changelog_topic,
			forced_materialization,
		})
	}

	fn materialized<B: StreamsBuilder>(
		ctx: &RuntimeBuildContext<'_, B>,
		source: &TableSource,
		key_format: &KeyFormat,
		stored_schema: LogicalSchema,
		store_name: &str,
	) -> Result<Materialized> {
		let physical = source.physical_schema(stored_schema);
		let context = source.context.push("Materialize");

		Ok(Materialized {
			store_name: store_name.to_string(),
			key_serde: ctx.serde_factory.key_serde(key_format, &physical, &context)?,
			value_serde: ctx.serde_factory.value_serde(&source.formats.value_format, &physical, &context)?,
		})
	}
}
