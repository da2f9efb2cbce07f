//! # Method Check Engine
//!
//! Decides whether a set of named argument values is acceptable for a
//! method before a job is launched, and if not, reports every problem at
//! once.
//!
//! ## Pipeline
//!
//! 1. **Descriptor building** ([`build_descriptors`]): a raw specification is
//!    flattened into one [`ParameterDescriptor`] per parameter.
//! 2. **Value validation** ([`validate_value`]): one scalar is checked
//!    against one descriptor (type, referenced object, allowed values,
//!    bounds, patterns).
//! 3. **Parameter set validation** ([`validate_parameter_set`]): missing and
//!    unknown parameters plus per-parameter value checks, aggregated into a
//!    [`ValidationReport`].
//!
//! [`MethodManager`] ties these together with a specification snapshot and
//! a reference lookup collaborator.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use methodcheck_engine::{Arguments, InMemoryObjects, MethodManager};
//! use methodcheck_registry::{ReleaseTag, SpecSnapshot};
//!
//! let spec = serde_json::from_str(r#"{
//!     "info": { "id": "Tools/count", "name": "Count" },
//!     "parameters": [{
//!         "id": "k", "optional": 0, "field_type": "int",
//!         "short_hint": "", "description": "", "allow_multiple": 0
//!     }]
//! }"#)?;
//! let snapshot = SpecSnapshot::new().with_tag(ReleaseTag::Release, vec![spec]);
//! let manager = MethodManager::new(Arc::new(snapshot), Arc::new(InMemoryObjects::new()));
//!
//! let outcome = manager.validate_parameters("Tools/count", "release", None, &Arguments::new().with("k", 21_i64));
//! assert!(outcome.is_ok());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod arguments;
pub mod descriptor;
pub mod error;
pub mod lookup;
pub mod manager;
pub mod parameters;
mod pattern;
pub mod usage;
pub mod value;

pub use arguments::{Arguments, SuppliedValue};
pub use descriptor::{build_descriptors, display_order};
pub use error::{BuildError, ManagerError};
pub use lookup::{InMemoryObjects, LookupError, ObjectInfoLookup, WorkspaceLookup};
pub use manager::MethodManager;
pub use methodcheck_types::{ParamValue, ParameterDescriptor, ValidationError, ValidationReport};
pub use parameters::{check_parameter, validate_parameter_set};
pub use usage::MethodUsage;
pub use value::{CompiledRules, WorkspaceContext, validate_value};
