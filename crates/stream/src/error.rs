// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use rowflow_core::ColumnName;
use rowflow_type::{Diagnostic, Error, IntoDiagnostic};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StreamError {
	#[error("Record of a windowed source carries no window bounds for {column}")]
	MissingWindowBounds {
		column: ColumnName,
	},

	#[error("Stored row has {actual} columns, fewer than the {expected} materialized pseudocolumns")]
	MalformedStoredRow {
		expected: usize,
		actual: usize,
	},

	#[error("{context}: expected {expected} columns, found {actual}")]
	SerdeMismatch {
		context: String,
		expected: usize,
		actual: usize,
	},

	#[error("{context}: {message}")]
	Serialization {
		context: String,
		message: String,
	},

	#[error("Unsupported format {format}")]
	UnsupportedFormat {
		format: String,
	},
}

impl IntoDiagnostic for StreamError {
	fn into_diagnostic(self) -> Diagnostic {
		match self {
			StreamError::MissingWindowBounds {
				column,
			} => Diagnostic {
				code: "STREAM_001".to_string(),
				statement: None,
				message: format!("Cannot resolve {} without window bounds", column),
				column: None,
				label: Some("record metadata has no window".to_string()),
				help: Some("Windowed tables must be consumed with a windowed key format".to_string()),
				notes: vec![],
				cause: None,
			},

			StreamError::MalformedStoredRow {
				expected,
				actual,
			} => Diagnostic {
				code: "STREAM_002".to_string(),
				statement: None,
				message: format!(
					"Stored row has {} columns, fewer than the {} materialized pseudocolumns",
					actual, expected
				),
				column: None,
				label: Some("row read back from the state store is too short".to_string()),
				help: None,
				notes: vec![
					"The pseudocolumn version recorded on the source does not match the stored data".to_string(),
				],
				cause: None,
			},

			StreamError::SerdeMismatch {
				context,
				expected,
				actual,
			} => Diagnostic {
				code: "STREAM_003".to_string(),
				statement: None,
				message: format!("{}: expected {} columns, found {}", context, expected, actual),
				column: None,
				label: Some("row width does not match the physical schema".to_string()),
				help: None,
				notes: vec![],
				cause: None,
			},

			StreamError::Serialization {
				context,
				message,
			} => Diagnostic {
				code: "STREAM_004".to_string(),
				statement: None,
				message: format!("{}: {}", context, message),
				column: None,
				label: None,
				help: None,
				notes: vec![],
				cause: None,
			},

			StreamError::UnsupportedFormat {
				format,
			} => Diagnostic {
				code: "STREAM_005".to_string(),
				statement: None,
				message: format!("Unsupported format {}", format),
				column: None,
				label: None,
				help: Some("Use a format the configured serde factory supports".to_string()),
				notes: vec![],
				cause: None,
			},
		}
	}
}

impl From<StreamError> for Error {
	fn from(err: StreamError) -> Self {
		Error(err.into_diagnostic())
	}
}
