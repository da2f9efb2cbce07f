//! Error types for descriptor building and method validation.

use methodcheck_types::{MalformedSpec, ParseReleaseTagError, ReleaseTag, ValidationReport};
use thiserror::Error;

/// A raw specification could not be turned into descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error(transparent)]
    Malformed(#[from] MalformedSpec),

    #[error("parameter {parameter_id} of {method_id} is a dropdown without dropdown_options")]
    MissingDropdownOptions { method_id: String, parameter_id: String },

    #[error("parameter id {parameter_id} is declared more than once in {method_id}")]
    DuplicateParameter { method_id: String, parameter_id: String },

    #[error("parameter {parameter_id} of {method_id} declares an invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        method_id: String,
        parameter_id: String,
        pattern: String,
        reason: String,
    },
}

/// Failures surfaced by [`crate::MethodManager`].
///
/// Everything except [`ManagerError::Parameters`] is a precondition failure,
/// raised before any parameter is looked at.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ManagerError {
    #[error(transparent)]
    InvalidTag(#[from] ParseReleaseTagError),

    #[error("Unknown method id \"{method_id}\" tagged as \"{tag}\"")]
    UnknownMethod { method_id: String, tag: ReleaseTag },

    #[error("Method versions only apply to released method modules! (tag \"{tag}\" was given with version \"{version}\")")]
    VersionOnNonRelease { tag: ReleaseTag, version: String },

    #[error("Invalid method specification: {0}")]
    Build(#[from] BuildError),

    #[error("Parameter validation failed for {method_id}: {report}")]
    Parameters { method_id: String, report: ValidationReport },
}

impl ManagerError {
    pub fn unknown_method(method_id: impl Into<String>, tag: ReleaseTag) -> Self {
        Self::UnknownMethod {
            method_id: method_id.into(),
            tag,
        }
    }

    /// Every problem as one line each: the full report for parameter
    /// failures, a single line otherwise.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Parameters { report, .. } => report.messages(),
            other => vec![other.to_string()],
        }
    }

    /// The aggregated report, when the failure came from parameter checks.
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            Self::Parameters { report, .. } => Some(report),
            _ => None,
        }
    }
}
