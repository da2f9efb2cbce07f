//! Shared type definitions for method specification validation.
//!
//! - `spec`: raw specification documents as published by the method store
//! - `tag`: release channels (`release`, `beta`, `dev`)
//! - `value`: the closed set of value kinds callers may supply
//! - `descriptor`: canonical per-parameter validation rules
//! - `validation`: validation errors and aggregated reports

pub mod descriptor;
pub mod spec;
pub mod tag;
pub mod validation;
pub mod value;

pub use descriptor::{NumericBound, ParamType, ParameterDescriptor};
pub use spec::{
    DropdownOption, DropdownOptions, MalformedSpec, MethodInfo, MethodSpec, RawParameter, TextOptions, document_method_id,
};
pub use tag::{ParseReleaseTagError, ReleaseTag};
pub use validation::{ValidationError, ValidationErrorKind, ValidationReport};
pub use value::{ParamValue, UnsupportedValue};

/// Type reported for a workspace object by the reference lookup service.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ObjectInfo {
    /// Object name within its workspace
    pub name: String,
    /// Fully qualified type string (e.g., `KBaseGenomes.Genome-8.2`)
    pub type_string: String,
}
