// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use super::Diagnostic;

pub const INTERNAL_ERROR_CODE: &str = "INTERNAL_ERROR";

/// Creates a detailed internal error diagnostic with source location and
/// context
pub fn internal_with_context(
	reason: impl Into<String>,
	file: &str,
	line: u32,
	column: u32,
	function: &str,
	module_path: &str,
) -> Diagnostic {
	let reason = reason.into();

	let error_id = format!("ERR-{}:{}", file.split('/').last().unwrap_or(file).replace(".rs", ""), line);

	let detailed_message = format!("Internal error [{}]: {}", error_id, reason);

	let location_info =
		format!("Location: {}:{}:{}\nFunction: {}\nModule: {}", file, line, column, function, module_path);

	let help_message = format!(
		"This is an internal error that should never occur in normal operation.\n\n\
         Include the following information in a bug report:\n\
         Error ID: {}\n\
         {}\n\
         Version: {}\n\
         Platform: {} {}",
		error_id,
		location_info,
		env!("CARGO_PKG_VERSION"),
		std::env::consts::OS,
		std::env::consts::ARCH
	);

	Diagnostic {
		code: INTERNAL_ERROR_CODE.to_string(),
		statement: None,
		message: detailed_message,
		column: None,
		label: Some(format!("Internal invariant violated at {}:{}:{}", file, line, column)),
		help: Some(help_message),
		notes: vec![
			format!("Error occurred in function: {}", function),
			"This error indicates an inconsistency between persisted source metadata and the engine."
				.to_string(),
			"The affected query must be stopped; retrying will fail the same way.".to_string(),
		],
		cause: None,
	}
}

/// Simplified internal error without detailed context
pub fn internal(reason: impl Into<String>) -> Diagnostic {
	internal_with_context(reason, "unknown", 0, 0, "unknown", "unknown")
}

/// Macro to create an internal error with automatic source location capture
#[macro_export]
macro_rules! internal_error {
    ($reason:expr) => {
        $crate::error::internal::internal_with_context(
            $reason,
            file!(),
            line!(),
            column!(),
            {
                fn f() {}
                fn type_name_of<T>(_: T) -> &'static str {
                    std::any::type_name::<T>()
                }
                let name = type_name_of(f);
                &name[..name.len() - 3]
            },
            module_path!()
        )
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::internal::internal_with_context(
            format!($fmt, $($arg)*),
            file!(),
            line!(),
            column!(),
            {
                fn f() {}
                fn type_name_of<T>(_: T) -> &'static str {
                    std::any::type_name::<T>()
                }
                let name = type_name_of(f);
                &name[..name.len() - 3]
            },
            module_path!()
        )
    };
}

/// Macro to create an internal error result with automatic source location
/// capture
#[macro_export]
macro_rules! internal_err {
    ($reason:expr) => {
        Err($crate::error::Error($crate::internal_error!($reason)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        Err($crate::error::Error($crate::internal_error!($fmt, $($arg)*)))
    };
}

/// Macro to return an internal error with automatic source location capture
#[macro_export]
macro_rules! return_internal_error {
    ($reason:expr) => {
        return Err($crate::error::Error($crate::internal_error!($reason)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::error::Error($crate::internal_error!($fmt, $($arg)*)))
    };
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_internal_error_literal_string() {
		let diagnostic = internal_error!("simple error message");

		assert_eq!(diagnostic.code, "INTERNAL_ERROR");
		assert!(diagnostic.message.contains("simple error message"));
		assert!(diagnostic.help.as_ref().unwrap().contains("bug report"));
		assert!(!diagnostic.notes.is_empty());
	}

	#[test]
	fn test_internal_error_with_format() {
		let version = 7;
		let diagnostic = internal_error!("unknown pseudocolumn version: {}", version);

		assert_eq!(diagnostic.code, "INTERNAL_ERROR");
		assert!(diagnostic.message.contains("unknown pseudocolumn version: 7"));
		assert!(diagnostic.label.as_ref().unwrap().contains("Internal invariant violated"));
	}

	#[test]
	fn test_internal_err_is_internal() {
		let result: crate::Result<()> = internal_err!("test error");

		let error = result.unwrap_err();
		assert!(error.is_internal());
		assert!(error.message.contains("test error"));
	}

	#[test]
	fn test_return_internal_error_in_function() {
		fn fails(val: u32) -> crate::Result<()> {
			return_internal_error!("Invalid value: {:#04x}", val);
		}

		let error = fails(255).unwrap_err();
		assert_eq!(error.code(), "INTERNAL_ERROR");
		assert!(error.message.contains("Invalid value: 0xff"));
	}

	#[test]
	fn test_internal_with_context_function() {
		let diagnostic =
			internal_with_context("context error", "test.rs", 100, 20, "test_function", "test::module");

		assert!(diagnostic.label.as_ref().unwrap().contains("test.rs:100:20"));
		assert!(diagnostic.notes.iter().any(|n| n.contains("test_function")));
		let help = diagnostic.help.as_ref().unwrap();
		assert!(help.contains("test.rs:100:20"));
		assert!(help.contains("test::module"));
	}

	#[test]
	fn test_internal_function() {
		let diagnostic = internal("basic internal error");
		assert!(diagnostic.label.as_ref().unwrap().contains("unknown:0:0"));
	}
}
