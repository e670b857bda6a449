// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use rowflow_type::{Diagnostic, DiagnosticColumn, Error, IntoDiagnostic, SqlType};

use super::{ColumnName, Namespace};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
	#[error("Duplicate {namespace} column `{name}`")]
	DuplicateColumn {
		namespace: Namespace,
		name: ColumnName,
		r#type: SqlType,
	},
}

impl IntoDiagnostic for SchemaError {
	fn into_diagnostic(self) -> Diagnostic {
		match self {
			SchemaError::DuplicateColumn {
				namespace,
				name,
				r#type,
			} => Diagnostic {
				code: "SCHEMA_001".to_string(),
				statement: None,
				message: format!("Duplicate {} column `{}`", namespace, name),
				column: Some(DiagnosticColumn {
					name: name.to_string(),
					r#type,
				}),
				label: Some(format!("column `{}` is already declared in the {} namespace", name, namespace)),
				help: Some("Rename or remove one of the columns".to_string()),
				notes: vec![
					"Column names must be unique within the KEY and within the VALUE namespace".to_string(),
					"The same name may appear once as a KEY and once as a VALUE column".to_string(),
				],
				cause: None,
			},
		}
	}
}

impl From<SchemaError> for Error {
	fn from(err: SchemaError) -> Self {
		Error(err.into_diagnostic())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_duplicate_column_display() {
		let err = SchemaError::DuplicateColumn {
			namespace: Namespace::Value,
			name: ColumnName::from("name"),
			r#type: SqlType::String,
		};
		assert_eq!(err.to_string(), "Duplicate VALUE column `name`");
	}

	#[test]
	fn test_duplicate_column_diagnostic() {
		let err: Error = SchemaError::DuplicateColumn {
			namespace: Namespace::Key,
			name: ColumnName::from("id"),
			r#type: SqlType::Integer,
		}
		.into();

		assert_eq!(err.code(), "SCHEMA_001");
		assert!(!err.is_internal());
		assert_eq!(err.message, "Duplicate KEY column `id`");
		assert_eq!(err.column.as_ref().unwrap().name, "id");
		assert_eq!(err.column.as_ref().unwrap().r#type, SqlType::Integer);
	}
}
