// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Path of a step within a query plan, used to derive operator, store and
/// changelog names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryContext(Vec<String>);

impl QueryContext {
	pub fn of<I, S>(path: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self(path.into_iter().map(Into::into).collect())
	}

	/// A child context one level below this one
	pub fn push(&self, name: impl Into<String>) -> Self {
		let mut path = self.0.clone();
		path.push(name.into());
		Self(path)
	}

	pub fn path(&self) -> &[String] {
		&self.0
	}

	/// Operator name: the path joined with `-`
	pub fn op_name(&self) -> String {
		self.0.join("-")
	}
}

impl Display for QueryContext {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0.join("/"))
	}
}
