// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Builder pattern for configuring how sources are built

use rowflow_core::PseudoColumnVersion;
use serde::Deserialize;

const DEFAULT_APPLICATION_ID: &str = "rowflow";

/// Configuration for building stream topologies
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
	/// Prefix of every changelog topic created for a state store
	pub application_id: String,
	/// Whether new sources record ROWPARTITION and ROWOFFSET
	pub rowpartition_rowoffset_enabled: bool,
}

impl Default for StreamConfig {
	fn default() -> Self {
		Self {
			application_id: DEFAULT_APPLICATION_ID.to_string(),
			rowpartition_rowoffset_enabled: true,
		}
	}
}

impl StreamConfig {
	pub fn builder() -> StreamConfigBuilder {
		StreamConfigBuilder::new()
	}

	/// The pseudocolumn version to record on a source materialized for the
	/// first time. Existing sources keep the version they were recorded with.
	pub fn pseudo_column_version_for_new_source(&self) -> PseudoColumnVersion {
		if self.rowpartition_rowoffset_enabled {
			PseudoColumnVersion::CURRENT
		} else {
			PseudoColumnVersion::LEGACY
		}
	}

	/// Name of the topic backing `store`
	pub fn changelog_topic(&self, store: &str) -> String {
		format!("{}-{}-changelog", self.application_id, store)
	}
}

pub struct StreamConfigBuilder {
	application_id: Option<String>,
	rowpartition_rowoffset_enabled: Option<bool>,
}

impl Default for StreamConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl StreamConfigBuilder {
	/// Create a new StreamConfigBuilder with default settings
	pub fn new() -> Self {
		Self {
			application_id: None,
			rowpartition_rowoffset_enabled: None,
		}
	}

	/// Set the application id changelog topics are prefixed with.
	/// Defaults to `rowflow` if not set.
	pub fn application_id(mut self, id: impl Into<String>) -> Self {
		self.application_id = Some(id.into());
		self
	}

	/// Enable or disable ROWPARTITION and ROWOFFSET for new sources.
	/// Enabled if not set.
	pub fn rowpartition_rowoffset_enabled(mut self, enabled: bool) -> Self {
		self.rowpartition_rowoffset_enabled = Some(enabled);
		self
	}

	pub fn build(self) -> StreamConfig {
		let defaults = StreamConfig::default();
		StreamConfig {
			application_id: self.application_id.unwrap_or(defaults.application_id),
			rowpartition_rowoffset_enabled: self
				.rowpartition_rowoffset_enabled
				.unwrap_or(defaults.rowpartition_rowoffset_enabled),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let config = StreamConfig::builder().build();
		assert_eq!(config, StreamConfig::default());
		assert_eq!(config.application_id, "rowflow");
		assert_eq!(config.pseudo_column_version_for_new_source(), PseudoColumnVersion::CURRENT);
	}

	#[test]
	fn test_disabled_rowpartition_rowoffset_records_legacy() {
		let config = StreamConfig::builder().rowpartition_rowoffset_enabled(false).build();
		assert_eq!(config.pseudo_column_version_for_new_source(), PseudoColumnVersion::LEGACY);
	}

	#[test]
	fn test_changelog_topic() {
		let config = StreamConfig::builder().application_id("app").build();
		assert_eq!(config.changelog_topic("Orders-Reduce"), "app-Orders-Reduce-changelog");
	}

	#[test]
	fn test_deserialize_with_defaults() {
		let config: StreamConfig = serde_json::from_str(r#"{"application_id": "pipeline"}"#).unwrap();
		assert_eq!(config.application_id, "pipeline");
		assert!(config.rowpartition_rowoffset_enabled);
	}
}
