use std::{
    env,
    path::{Path, PathBuf},
};

use dirs_next::config_dir;
use methodcheck_types::ReleaseTag;
use methodcheck_util::expand_tilde;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Environment variable overriding the configuration file location.
pub const CONFIG_PATH_ENV: &str = "METHODCHECK_CONFIG_PATH";
pub const WORKSPACE_ENV: &str = "METHODCHECK_WORKSPACE";
pub const METHOD_STORE_URL_ENV: &str = "METHODCHECK_METHOD_STORE_URL";
pub const WORKSPACE_URL_ENV: &str = "METHODCHECK_WORKSPACE_URL";

const DEFAULT_METHOD_STORE_URL: &str = "https://kbase.us/services/narrative_method_store/rpc";
const DEFAULT_WORKSPACE_URL: &str = "https://kbase.us/services/ws";

/// Error surfaced when writing the configuration fails.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Local specification catalog for one tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecCatalog {
    pub tag: ReleaseTag,
    /// Path to a JSON or YAML file holding the tag's specifications
    pub path: String,
}

impl SpecCatalog {
    pub fn resolved_path(&self) -> PathBuf {
        expand_tilde(&self.path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodCheckConfig {
    #[serde(default = "default_method_store_url")]
    pub method_store_url: String,
    #[serde(default = "default_workspace_url")]
    pub workspace_url: String,
    /// Active workspace used for input object lookups
    #[serde(default)]
    pub workspace: Option<String>,
    /// Local catalogs; when present they replace the remote method store
    #[serde(default)]
    pub catalogs: Option<Vec<SpecCatalog>>,
}

impl Default for MethodCheckConfig {
    fn default() -> Self {
        Self {
            method_store_url: default_method_store_url(),
            workspace_url: default_workspace_url(),
            workspace: None,
            catalogs: None,
        }
    }
}

impl MethodCheckConfig {
    /// Loads the configuration from [`default_config_path`], falling back to
    /// defaults when the file is missing or unreadable, then applies
    /// environment overrides.
    pub fn load() -> Self {
        Self::load_from(&default_config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        let mut config = match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<MethodCheckConfig>(&content) {
                Ok(config) => config,
                Err(error) => {
                    warn!(path = %path.display(), %error, "ignoring unparseable config file");
                    MethodCheckConfig::default()
                }
            },
            Err(_) => {
                debug!(path = %path.display(), "no config file; using defaults");
                MethodCheckConfig::default()
            }
        };
        config.apply_env_overrides();
        config
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Catalog configured for `tag`, if any.
    pub fn catalog_for(&self, tag: ReleaseTag) -> Option<&SpecCatalog> {
        self.catalogs.as_ref()?.iter().find(|catalog| catalog.tag == tag)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(workspace) = non_blank_env(WORKSPACE_ENV) {
            self.workspace = Some(workspace);
        }
        if let Some(url) = non_blank_env(METHOD_STORE_URL_ENV) {
            self.method_store_url = url;
        }
        if let Some(url) = non_blank_env(WORKSPACE_URL_ENV) {
            self.workspace_url = url;
        }
    }
}

fn non_blank_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn default_method_store_url() -> String {
    DEFAULT_METHOD_STORE_URL.to_string()
}

fn default_workspace_url() -> String {
    DEFAULT_WORKSPACE_URL.to_string()
}

/// Get the default path for the configuration file.
pub fn default_config_path() -> PathBuf {
    if let Some(path) = non_blank_env(CONFIG_PATH_ENV) {
        return expand_tilde(&path);
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("methodcheck")
        .join("config.json")
}
