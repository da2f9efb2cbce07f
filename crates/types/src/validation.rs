//! Validation outcome types.
//!
//! A validation run never stops at the first problem. Every failed check
//! becomes one [`ValidationError`] and the run as a whole is summarised in a
//! [`ValidationReport`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of a failed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// A required parameter was absent or empty
    Missing,
    /// A supplied argument matches no declared parameter
    Unknown,
    /// A supplied value failed a type, range, membership or lookup check
    InvalidValue,
}

/// One failed check against one parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub parameter_id: String,
    pub kind: ValidationErrorKind,
    pub message: String,
}

impl ValidationError {
    pub fn missing(parameter_id: impl Into<String>) -> Self {
        Self {
            parameter_id: parameter_id.into(),
            kind: ValidationErrorKind::Missing,
            message: "required parameter is missing".to_string(),
        }
    }

    pub fn unknown(parameter_id: impl Into<String>) -> Self {
        Self {
            parameter_id: parameter_id.into(),
            kind: ValidationErrorKind::Unknown,
            message: "unknown parameter - maybe something was misspelled?".to_string(),
        }
    }

    pub fn invalid_value(parameter_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            parameter_id: parameter_id.into(),
            kind: ValidationErrorKind::InvalidValue,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.parameter_id, self.message)
    }
}

/// Aggregated result of validating one argument set.
///
/// Errors are ordered: missing parameters, then unknown parameters, then
/// value errors in descriptor order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    /// Formatted `"<id> - <message>"` lines, in report order.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn missing_ids(&self) -> Vec<&str> {
        self.ids_of(ValidationErrorKind::Missing)
    }

    pub fn unknown_ids(&self) -> Vec<&str> {
        self.ids_of(ValidationErrorKind::Unknown)
    }

    fn ids_of(&self, kind: ValidationErrorKind) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|error| error.kind == kind)
            .map(|error| error.parameter_id.as_str())
            .collect()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return f.write_str("no validation errors");
        }
        let lines = self.messages();
        write!(f, "{} validation error(s): {}", lines.len(), lines.join("; "))
    }
}
