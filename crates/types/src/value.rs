//! Typed parameter values supplied by callers.
//!
//! Callers hand over loosely typed data (JSON, command line strings). The
//! value kind is decided once, here, so the validators can switch on an
//! explicit tag instead of inspecting runtime types.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A caller-supplied parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<ParamValue>),
}

/// Raised when a JSON value has no `ParamValue` counterpart.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnsupportedValue {
    /// A JSON kind outside str, int, float and list (e.g., `boolean`).
    #[error("input type not supported - only str, int, float, or list (got {0})")]
    Kind(&'static str),

    /// An integer above `i64::MAX`; `int` values are signed 64-bit.
    #[error("integer {0} is out of range - int values must fit in a signed 64-bit integer")]
    IntegerOutOfRange(u64),
}

impl ParamValue {
    /// Converts a JSON value, rejecting booleans, nulls and objects.
    ///
    /// Integers above `i64::MAX` are rejected rather than turned into
    /// floats, so an `int` parameter never sees them as "not an int".
    pub fn from_json(value: &Value) -> Result<Self, UnsupportedValue> {
        match value {
            Value::String(text) => Ok(Self::Text(text.clone())),
            Value::Number(number) => match (number.as_i64(), number.as_u64()) {
                (Some(int), _) => Ok(Self::Int(int)),
                (None, Some(big)) => Err(UnsupportedValue::IntegerOutOfRange(big)),
                (None, None) => number
                    .as_f64()
                    .map(Self::Float)
                    .ok_or(UnsupportedValue::Kind("number")),
            },
            Value::Array(items) => items.iter().map(Self::from_json).collect::<Result<Vec<_>, _>>().map(Self::List),
            Value::Bool(_) => Err(UnsupportedValue::Kind("boolean")),
            Value::Null => Err(UnsupportedValue::Kind("null")),
            Value::Object(_) => Err(UnsupportedValue::Kind("object")),
        }
    }

    /// Parses a command line value: JSON scalars and lists when the text is
    /// valid JSON, plain text otherwise.
    pub fn parse_cli(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::from_json(&value).unwrap_or_else(|_| Self::Text(raw.to_string())),
            Err(_) => Self::Text(raw.to_string()),
        }
    }

    /// Returns `true` for values that do not count as supplied: empty text
    /// and empty lists.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Int(_) | Self::Float(_) => false,
        }
    }

    /// Numeric reading of the value used for bound checks.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(int) => Some(*int as f64),
            Self::Float(float) => Some(*float),
            Self::Text(text) => text.trim().parse::<f64>().ok().filter(|number| !number.is_nan()),
            Self::List(_) => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "str",
            Self::List(_) => "list",
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(int) => write!(f, "{}", int),
            Self::Float(float) => write!(f, "{:?}", float),
            Self::Text(text) => f.write_str(text),
            Self::List(items) => {
                f.write_str("[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}
