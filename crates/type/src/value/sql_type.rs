// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{Diagnostic, Error};

/// Number of integer digits an INTEGER occupies when widened to a DECIMAL
const INTEGER_DIGITS: u8 = 10;
/// Number of integer digits a BIGINT occupies when widened to a DECIMAL
const BIGINT_DIGITS: u8 = 19;

/// All SQL column types
#[derive(Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum SqlType {
	/// A boolean: true or false.
	Boolean,
	/// A 4-byte signed integer
	Integer,
	/// An 8-byte signed integer
	Bigint,
	/// A fixed precision decimal
	Decimal {
		precision: u8,
		scale: u8,
	},
	/// An 8-byte floating point
	Double,
	/// A UTF-8 encoded text.
	String,
	/// Raw bytes
	Bytes,
	/// Days since the epoch
	Date,
	/// Milliseconds since midnight
	Time,
	/// Milliseconds since the epoch
	Timestamp,
	Array(Box<SqlType>),
	Map(Box<SqlType>, Box<SqlType>),
	Struct(Vec<StructField>),
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructField {
	pub name: String,
	pub r#type: SqlType,
}

/// The fieldless discriminant of a [`SqlType`]. The declaration order of the
/// numeric variants is their widening order.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SqlBaseType {
	Boolean,
	Integer,
	Bigint,
	Decimal,
	Double,
	String,
	Bytes,
	Date,
	Time,
	Timestamp,
	Array,
	Map,
	Struct,
}

impl SqlBaseType {
	pub fn is_number(&self) -> bool {
		matches!(self, SqlBaseType::Integer | SqlBaseType::Bigint | SqlBaseType::Decimal | SqlBaseType::Double)
	}
}

impl SqlType {
	pub fn decimal(precision: u8, scale: u8) -> Self {
		debug_assert!(precision > 0 && scale <= precision, "invalid decimal({}, {})", precision, scale);
		SqlType::Decimal {
			precision,
			scale,
		}
	}

	pub fn array(element: SqlType) -> Self {
		SqlType::Array(Box::new(element))
	}

	pub fn map(key: SqlType, value: SqlType) -> Self {
		SqlType::Map(Box::new(key), Box::new(value))
	}

	pub fn base_type(&self) -> SqlBaseType {
		match self {
			SqlType::Boolean => SqlBaseType::Boolean,
			SqlType::Integer => SqlBaseType::Integer,
			SqlType::Bigint => SqlBaseType::Bigint,
			SqlType::Decimal {
				..
			} => SqlBaseType::Decimal,
			SqlType::Double => SqlBaseType::Double,
			SqlType::String => SqlBaseType::String,
			SqlType::Bytes => SqlBaseType::Bytes,
			SqlType::Date => SqlBaseType::Date,
			SqlType::Time => SqlBaseType::Time,
			SqlType::Timestamp => SqlBaseType::Timestamp,
			SqlType::Array(_) => SqlBaseType::Array,
			SqlType::Map(_, _) => SqlBaseType::Map,
			SqlType::Struct(_) => SqlBaseType::Struct,
		}
	}

	pub fn is_number(&self) -> bool {
		self.base_type().is_number()
	}

	/// Returns true if a value of this type can be used where `to` is
	/// expected without an explicit cast. Only widening conversions qualify.
	pub fn can_implicitly_cast(&self, to: &SqlType) -> bool {
		if self == to {
			return true;
		}

		match (self, to) {
			(
				SqlType::Decimal {
					precision,
					scale,
				},
				SqlType::Decimal {
					precision: to_precision,
					scale: to_scale,
				},
			) => to_precision.saturating_sub(*to_scale) >= precision.saturating_sub(*scale) && to_scale >= scale,
			(
				SqlType::Integer,
				SqlType::Decimal {
					precision,
					scale,
				},
			) => precision.saturating_sub(*scale) >= INTEGER_DIGITS,
			(
				SqlType::Bigint,
				SqlType::Decimal {
					precision,
					scale,
				},
			) => precision.saturating_sub(*scale) >= BIGINT_DIGITS,
			(SqlType::Array(from), SqlType::Array(to)) => from.can_implicitly_cast(to),
			(SqlType::Map(from_key, from_value), SqlType::Map(to_key, to_value)) => {
				from_key.can_implicitly_cast(to_key) && from_value.can_implicitly_cast(to_value)
			}
			(SqlType::Struct(from), SqlType::Struct(to)) => {
				from.len() == to.len()
					&& from.iter()
						.zip(to.iter())
						.all(|(f, t)| f.name == t.name && f.r#type.can_implicitly_cast(&t.r#type))
			}
			_ => {
				let from = self.base_type();
				let to = to.base_type();
				from.is_number() && to.is_number() && from <= to
			}
		}
	}
}

impl Display for SqlType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			SqlType::Boolean => f.write_str("BOOLEAN"),
			SqlType::Integer => f.write_str("INTEGER"),
			SqlType::Bigint => f.write_str("BIGINT"),
			SqlType::Decimal {
				precision,
				scale,
			} => write!(f, "DECIMAL({}, {})", precision, scale),
			SqlType::Double => f.write_str("DOUBLE"),
			SqlType::String => f.write_str("STRING"),
			SqlType::Bytes => f.write_str("BYTES"),
			SqlType::Date => f.write_str("DATE"),
			SqlType::Time => f.write_str("TIME"),
			SqlType::Timestamp => f.write_str("TIMESTAMP"),
			SqlType::Array(element) => write!(f, "ARRAY<{}>", element),
			SqlType::Map(key, value) => write!(f, "MAP<{}, {}>", key, value),
			SqlType::Struct(fields) => {
				f.write_str("STRUCT<")?;
				for (i, field) in fields.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "`{}` {}", field.name, field.r#type)?;
				}
				f.write_str(">")
			}
		}
	}
}

impl FromStr for SqlType {
	type Err = Error;

	/// Parses the primitive type names; compound types are built with the
	/// constructors instead.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let upper = s.trim().to_uppercase();
		let parsed = match upper.as_str() {
			"BOOLEAN" | "BOOL" => Some(SqlType::Boolean),
			"INTEGER" | "INT" => Some(SqlType::Integer),
			"BIGINT" => Some(SqlType::Bigint),
			"DOUBLE" => Some(SqlType::Double),
			"STRING" | "VARCHAR" => Some(SqlType::String),
			"BYTES" => Some(SqlType::Bytes),
			"DATE" => Some(SqlType::Date),
			"TIME" => Some(SqlType::Time),
			"TIMESTAMP" => Some(SqlType::Timestamp),
			other => parse_decimal(other),
		};

		parsed.ok_or_else(|| Error(unknown_type(s)))
	}
}

fn parse_decimal(s: &str) -> Option<SqlType> {
	let args = s.strip_prefix("DECIMAL(")?.strip_suffix(')')?;
	let (precision, scale) = args.split_once(',')?;
	let precision: u8 = precision.trim().parse().ok()?;
	let scale: u8 = scale.trim().parse().ok()?;
	if precision == 0 || scale > precision {
		return None;
	}
	Some(SqlType::decimal(precision, scale))
}

fn unknown_type(name: &str) -> Diagnostic {
	Diagnostic {
		code: "TYPE_001".to_string(),
		statement: None,
		message: format!("unknown type `{}`", name),
		column: None,
		label: Some("not a primitive SQL type".to_string()),
		help: Some(
			"use one of BOOLEAN, INTEGER, BIGINT, DECIMAL(p, s), DOUBLE, STRING, BYTES, DATE, TIME, TIMESTAMP"
				.to_string(),
		),
		notes: vec![],
		cause: None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_identical_types_cast() {
		for ty in [SqlType::Boolean, SqlType::String, SqlType::Bytes, SqlType::Timestamp, SqlType::decimal(4, 2)]
		{
			assert!(ty.can_implicitly_cast(&ty.clone()), "{}", ty);
		}
	}

	#[test]
	fn test_numeric_widening_only() {
		assert!(SqlType::Integer.can_implicitly_cast(&SqlType::Bigint));
		assert!(SqlType::Integer.can_implicitly_cast(&SqlType::Double));
		assert!(SqlType::Bigint.can_implicitly_cast(&SqlType::Double));
		assert!(SqlType::decimal(10, 2).can_implicitly_cast(&SqlType::Double));

		assert!(!SqlType::Bigint.can_implicitly_cast(&SqlType::Integer));
		assert!(!SqlType::Double.can_implicitly_cast(&SqlType::Bigint));
		assert!(!SqlType::Double.can_implicitly_cast(&SqlType::decimal(38, 2)));
	}

	#[test]
	fn test_integer_to_decimal_needs_room() {
		assert!(SqlType::Integer.can_implicitly_cast(&SqlType::decimal(10, 0)));
		assert!(SqlType::Integer.can_implicitly_cast(&SqlType::decimal(12, 2)));
		assert!(!SqlType::Integer.can_implicitly_cast(&SqlType::decimal(9, 0)));
		assert!(SqlType::Bigint.can_implicitly_cast(&SqlType::decimal(19, 0)));
		assert!(!SqlType::Bigint.can_implicitly_cast(&SqlType::decimal(19, 1)));
	}

	#[test]
	fn test_decimal_to_decimal() {
		assert!(SqlType::decimal(5, 2).can_implicitly_cast(&SqlType::decimal(6, 3)));
		assert!(!SqlType::decimal(5, 2).can_implicitly_cast(&SqlType::decimal(5, 3)));
		assert!(!SqlType::decimal(5, 2).can_implicitly_cast(&SqlType::decimal(4, 1)));
	}

	#[test]
	fn test_no_string_numeric_coercion() {
		assert!(!SqlType::String.can_implicitly_cast(&SqlType::Integer));
		assert!(!SqlType::Integer.can_implicitly_cast(&SqlType::String));
		assert!(!SqlType::Boolean.can_implicitly_cast(&SqlType::Integer));
	}

	#[test]
	fn test_compound_types_recurse() {
		assert!(SqlType::array(SqlType::Integer).can_implicitly_cast(&SqlType::array(SqlType::Bigint)));
		assert!(!SqlType::array(SqlType::Bigint).can_implicitly_cast(&SqlType::array(SqlType::Integer)));
		assert!(SqlType::map(SqlType::String, SqlType::Integer)
			.can_implicitly_cast(&SqlType::map(SqlType::String, SqlType::Double)));

		let from = SqlType::Struct(vec![StructField {
			name: "A".to_string(),
			r#type: SqlType::Integer,
		}]);
		let to = SqlType::Struct(vec![StructField {
			name: "A".to_string(),
			r#type: SqlType::Bigint,
		}]);
		let renamed = SqlType::Struct(vec![StructField {
			name: "B".to_string(),
			r#type: SqlType::Bigint,
		}]);
		assert!(from.can_implicitly_cast(&to));
		assert!(!from.can_implicitly_cast(&renamed));
	}

	#[test]
	fn test_display() {
		assert_eq!(SqlType::decimal(10, 2).to_string(), "DECIMAL(10, 2)");
		assert_eq!(SqlType::map(SqlType::String, SqlType::array(SqlType::Bigint)).to_string(), "MAP<STRING, ARRAY<BIGINT>>");
		let st = SqlType::Struct(vec![StructField {
			name: "A".to_string(),
			r#type: SqlType::Integer,
		}]);
		assert_eq!(st.to_string(), "STRUCT<`A` INTEGER>");
	}

	#[test]
	fn test_from_str() {
		assert_eq!("int".parse::<SqlType>().unwrap(), SqlType::Integer);
		assert_eq!("VARCHAR".parse::<SqlType>().unwrap(), SqlType::String);
		assert_eq!("DECIMAL(10, 2)".parse::<SqlType>().unwrap(), SqlType::decimal(10, 2));
		assert_eq!("DECIMAL(2, 3)".parse::<SqlType>().unwrap_err().code(), "TYPE_001");
		assert_eq!("WIDGET".parse::<SqlType>().unwrap_err().code(), "TYPE_001");
	}
}
