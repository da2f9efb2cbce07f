//! Reference lookup collaborators.
//!
//! Input parameters that name existing data objects are checked against the
//! workspace service. The validator only sees the [`ObjectInfoLookup`]
//! trait; timeouts and retries belong to the implementation.

use std::{collections::HashMap, path::Path};

use anyhow::{Context, Result};
use methodcheck_api::WorkspaceClient;
use methodcheck_types::ObjectInfo;
use thiserror::Error;
use tokio::runtime::{Builder, Runtime};

/// Why an object could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("object {name} does not exist in workspace {workspace}")]
    NotFound { workspace: String, name: String },

    #[error("{0}")]
    Service(String),
}

/// Trait defining how object names are resolved to their reported type.
pub trait ObjectInfoLookup: Send + Sync {
    fn get_object_info(&self, workspace: &str, name: &str) -> Result<ObjectInfo, LookupError>;
}

/// Lookup backed by the remote workspace service.
pub struct WorkspaceLookup {
    client: WorkspaceClient,
    runtime: Runtime,
}

impl WorkspaceLookup {
    pub fn new(url: &str) -> Result<Self> {
        let client = WorkspaceClient::new(url)?;
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .context("runtime init failed")?;
        Ok(Self { client, runtime })
    }
}

impl ObjectInfoLookup for WorkspaceLookup {
    fn get_object_info(&self, workspace: &str, name: &str) -> Result<ObjectInfo, LookupError> {
        self.runtime
            .block_on(self.client.get_object_info(workspace, name))
            .map_err(|error| LookupError::Service(error.to_string()))
    }
}

/// Static name → type table for offline validation and tests.
///
/// The table describes a single workspace; the workspace argument of a
/// lookup is only echoed back in errors.
#[derive(Debug, Clone, Default)]
pub struct InMemoryObjects {
    types_by_name: HashMap<String, String>,
}

impl InMemoryObjects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(mut self, name: impl Into<String>, type_string: impl Into<String>) -> Self {
        self.types_by_name.insert(name.into(), type_string.into());
        self
    }

    /// Reads a JSON object mapping object names to type strings.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read objects file: {}", path.display()))?;
        let types_by_name: HashMap<String, String> =
            serde_json::from_str(&content).with_context(|| format!("Invalid objects file: {}", path.display()))?;
        Ok(Self { types_by_name })
    }
}

impl ObjectInfoLookup for InMemoryObjects {
    fn get_object_info(&self, workspace: &str, name: &str) -> Result<ObjectInfo, LookupError> {
        self.types_by_name
            .get(name)
            .map(|type_string| ObjectInfo {
                name: name.to_string(),
                type_string: type_string.clone(),
            })
            .ok_or_else(|| LookupError::NotFound {
                workspace: workspace.to_string(),
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_lookup_resolves_known_names() {
        let objects = InMemoryObjects::new().with_object("lib1", "KBaseAssembly.PairedEndLibrary-2.0");
        let info = objects.get_object_info("ws", "lib1").expect("lookup");
        assert_eq!(info.type_string, "KBaseAssembly.PairedEndLibrary-2.0");
    }

    #[test]
    fn in_memory_lookup_reports_missing_names() {
        let err = InMemoryObjects::new().get_object_info("ws", "ghost").unwrap_err();
        assert_eq!(err.to_string(), "object ghost does not exist in workspace ws");
    }

    #[test]
    fn objects_file_is_a_name_to_type_map() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("objects.json");
        std::fs::write(&path, r#"{ "genome1": "KBaseGenomes.Genome-8.2" }"#).expect("write objects");
        let objects = InMemoryObjects::from_json_file(&path).expect("load objects");
        assert!(objects.get_object_info("ws", "genome1").is_ok());
    }
}
