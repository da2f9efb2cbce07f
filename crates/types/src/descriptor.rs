use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic type a parameter value is checked against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ParamType {
    Text,
    Int,
    Float,
    /// Any other declared field type (e.g., `dropdown`, `textarea`), kept as
    /// written. These are checked like text.
    Other(String),
}

impl ParamType {
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "text" => Self::Text,
            "int" => Self::Int,
            "float" => Self::Float,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Int => "int",
            Self::Float => "float",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ParamType {
    fn from(value: String) -> Self {
        Self::from_raw(&value)
    }
}

impl From<ParamType> for String {
    fn from(value: ParamType) -> Self {
        value.as_str().to_string()
    }
}

/// Inclusive numeric bound declared through `min_*`/`max_*` text options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericBound {
    Int(i64),
    Float(f64),
}

impl NumericBound {
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Int(int) => *int as f64,
            Self::Float(float) => *float,
        }
    }
}

impl fmt::Display for NumericBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(int) => write!(f, "{}", int),
            Self::Float(float) => write!(f, "{:?}", float),
        }
    }
}

/// Canonical validation rules for one declared parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    /// Parameter identifier, unique within its specification
    pub id: String,
    /// Whether callers may omit the parameter
    pub optional: bool,
    /// Semantic type, possibly overridden by `validate_as`
    pub r#type: ParamType,
    /// Whether the value names an object to be created by the job
    pub is_output: bool,
    /// Literal values permitted for dropdown parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<String>>,
    /// Object type patterns a referenced input object must match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_val: Option<NumericBound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_val: Option<NumericBound>,
    /// Patterns every value must match; never empty when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex_constraint: Option<Vec<String>>,
    /// Whether a list of values may be supplied
    pub allow_multiple: bool,
    pub short_hint: String,
    pub description: String,
}

impl ParameterDescriptor {
    /// Whether values for this parameter name existing objects that must be
    /// looked up before a job can use them.
    pub fn requires_lookup(&self) -> bool {
        self.allowed_types.is_some() && !self.is_output
    }
}
