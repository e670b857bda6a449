// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

/// Wraps anything implementing `IntoDiagnostic` into an `Error`
#[macro_export]
macro_rules! error {
	($diagnostic:expr) => {
		$crate::error::Error($crate::error::IntoDiagnostic::into_diagnostic($diagnostic))
	};
}

/// Wraps anything implementing `IntoDiagnostic` into an `Err(Error)`
#[macro_export]
macro_rules! err {
	($diagnostic:expr) => {
		Err($crate::error!($diagnostic))
	};
}

/// Returns early with an `Err(Error)` built from the given diagnostic
#[macro_export]
macro_rules! return_error {
	($diagnostic:expr) => {
		return $crate::err!($diagnostic)
	};
}
