// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

pub mod sql_type;

use sql_type::SqlBaseType;

/// A single cell of a row
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
	/// Absent value
	Null,
	Boolean(bool),
	Integer(i32),
	Bigint(i64),
	Decimal(BigDecimal),
	Double(f64),
	String(String),
	Bytes(Vec<u8>),
	/// Days since the epoch
	Date(i32),
	/// Milliseconds since midnight
	Time(i64),
	/// Milliseconds since the epoch
	Timestamp(i64),
	Array(Vec<Value>),
	Map(Vec<(Value, Value)>),
	Struct(Vec<(String, Value)>),
}

impl Value {
	/// The base type of a non-null value
	pub fn base_type(&self) -> Option<SqlBaseType> {
		match self {
			Value::Null => None,
			Value::Boolean(_) => Some(SqlBaseType::Boolean),
			Value::Integer(_) => Some(SqlBaseType::Integer),
			Value::Bigint(_) => Some(SqlBaseType::Bigint),
			Value::Decimal(_) => Some(SqlBaseType::Decimal),
			Value::Double(_) => Some(SqlBaseType::Double),
			Value::String(_) => Some(SqlBaseType::String),
			Value::Bytes(_) => Some(SqlBaseType::Bytes),
			Value::Date(_) => Some(SqlBaseType::Date),
			Value::Time(_) => Some(SqlBaseType::Time),
			Value::Timestamp(_) => Some(SqlBaseType::Timestamp),
			Value::Array(_) => Some(SqlBaseType::Array),
			Value::Map(_) => Some(SqlBaseType::Map),
			Value::Struct(_) => Some(SqlBaseType::Struct),
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Value::Null => f.write_str("NULL"),
			Value::Boolean(value) => Display::fmt(value, f),
			Value::Integer(value) => Display::fmt(value, f),
			Value::Bigint(value) => Display::fmt(value, f),
			Value::Decimal(value) => Display::fmt(value, f),
			Value::Double(value) => Display::fmt(value, f),
			Value::String(value) => write!(f, "'{}'", value),
			Value::Bytes(value) => {
				f.write_str("0x")?;
				for byte in value {
					write!(f, "{:02x}", byte)?;
				}
				Ok(())
			}
			Value::Date(value) => write!(f, "DATE({})", value),
			Value::Time(value) => write!(f, "TIME({})", value),
			Value::Timestamp(value) => write!(f, "TIMESTAMP({})", value),
			Value::Array(values) => {
				f.write_str("[")?;
				for (i, value) in values.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					Display::fmt(value, f)?;
				}
				f.write_str("]")
			}
			Value::Map(entries) => {
				f.write_str("{")?;
				for (i, (key, value)) in entries.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{}: {}", key, value)?;
				}
				f.write_str("}")
			}
			Value::Struct(fields) => {
				f.write_str("{")?;
				for (i, (name, value)) in fields.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "`{}`: {}", name, value)?;
				}
				f.write_str("}")
			}
		}
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Value::Boolean(value)
	}
}

impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Value::Integer(value)
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Value::Bigint(value)
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Value::Double(value)
	}
}

impl From<BigDecimal> for Value {
	fn from(value: BigDecimal) -> Self {
		Value::Decimal(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Value::String(value.to_string())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Value::String(value)
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(value: Option<T>) -> Self {
		value.map(Into::into).unwrap_or(Value::Null)
	}
}

#[cfg(test)]
mod tests {
	use std::str::FromStr;

	use super::*;

	#[test]
	fn test_display() {
		assert_eq!(Value::Null.to_string(), "NULL");
		assert_eq!(Value::from("a").to_string(), "'a'");
		assert_eq!(Value::Bytes(vec![0x0a, 0xff]).to_string(), "0x0aff");
		assert_eq!(Value::Array(vec![Value::from(1), Value::from(2i64)]).to_string(), "[1, 2]");
		assert_eq!(Value::Struct(vec![("A".to_string(), Value::from(true))]).to_string(), "{`A`: true}");
	}

	#[test]
	fn test_option_into_value() {
		assert_eq!(Value::from(None::<i32>), Value::Null);
		assert_eq!(Value::from(Some(5i64)), Value::Bigint(5));
	}

	#[test]
	fn test_serde_json() {
		let value = Value::Array(vec![
			Value::from(1),
			Value::Decimal(BigDecimal::from_str("12.50").unwrap()),
			Value::Null,
			Value::Timestamp(1_700_000_000_000),
		]);

		let json = serde_json::to_string(&value).unwrap();
		let decoded: Value = serde_json::from_str(&json).unwrap();
		assert_eq!(decoded, value);
	}

	#[test]
	fn test_base_type() {
		assert_eq!(Value::Null.base_type(), None);
		assert_eq!(Value::from(1).base_type(), Some(SqlBaseType::Integer));
		assert_eq!(Value::Timestamp(0).base_type(), Some(SqlBaseType::Timestamp));
	}
}
