//! Specification sources.
//!
//! A [`SpecSource`] hands out the raw specification documents published
//! under a tag. Documents stay unparsed here; the snapshot parses each one
//! separately, so a malformed document only affects its own method. The
//! store never caches across sources; it only asks for all tags again on
//! `reload`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow, bail};
use indexmap::IndexMap;
use methodcheck_types::{MethodSpec, ReleaseTag, document_method_id};
use serde_json::Value;
use tracing::debug;

use crate::config::MethodCheckConfig;

/// Trait defining where raw method specifications come from.
pub trait SpecSource: Send + Sync {
    /// Every specification document published under `tag`, unparsed.
    fn list_specs(&self, tag: ReleaseTag) -> Result<Vec<Value>>;

    /// Long-form description of one method. Sources without descriptions
    /// report an error.
    fn method_description(&self, method_id: &str, tag: ReleaseTag) -> Result<String> {
        let _ = (method_id, tag);
        bail!("method descriptions are not available from this source")
    }
}

/// Source reading one catalog file per tag.
///
/// Files ending in `.json` are parsed as JSON, anything else as YAML. A
/// catalog holds either a list of specifications or a mapping with a
/// `methods` list. Tags without a catalog have no methods.
#[derive(Debug, Clone, Default)]
pub struct FileSpecSource {
    catalogs: IndexMap<ReleaseTag, PathBuf>,
}

impl FileSpecSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(mut self, tag: ReleaseTag, path: impl Into<PathBuf>) -> Self {
        self.catalogs.insert(tag, path.into());
        self
    }

    /// Builds a source from the configured catalogs, or `None` when the
    /// configuration declares none.
    pub fn from_config(config: &MethodCheckConfig) -> Option<Self> {
        let catalogs = config.catalogs.as_ref().filter(|catalogs| !catalogs.is_empty())?;
        Some(
            catalogs
                .iter()
                .fold(Self::new(), |source, catalog| source.with_catalog(catalog.tag, catalog.resolved_path())),
        )
    }
}

impl SpecSource for FileSpecSource {
    fn list_specs(&self, tag: ReleaseTag) -> Result<Vec<Value>> {
        let Some(path) = self.catalogs.get(&tag) else {
            debug!(%tag, "no catalog configured for tag");
            return Ok(Vec::new());
        };
        parse_catalog_file(path)
    }
}

/// Loads the documents of a catalog file, with format detection by
/// extension.
///
/// Only the catalog's shape is checked here: the file must parse and hold a
/// list, or a mapping with a `methods` list. The documents themselves are
/// returned unparsed.
pub fn parse_catalog_file(path: &Path) -> Result<Vec<Value>> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read spec catalog: {}", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));

    let catalog: Value = if is_json {
        serde_json::from_str(&content).with_context(|| format!("Invalid JSON spec catalog: {}", path.display()))?
    } else {
        serde_yaml::from_str(&content).with_context(|| format!("Invalid YAML spec catalog: {}", path.display()))?
    };
    let documents = catalog_documents(catalog)
        .with_context(|| format!("Unexpected spec catalog layout: {}", path.display()))?;
    debug!(path = %path.display(), count = documents.len(), "loaded spec catalog");
    Ok(documents)
}

fn catalog_documents(catalog: Value) -> Result<Vec<Value>> {
    match catalog {
        Value::Array(documents) => Ok(documents),
        Value::Object(mut wrapper) => match wrapper.remove("methods") {
            Some(Value::Array(documents)) => Ok(documents),
            Some(_) => bail!("`methods` must be a list of specifications"),
            None => bail!("expected a list of specifications or a mapping with a `methods` list"),
        },
        _ => bail!("expected a list of specifications or a mapping with a `methods` list"),
    }
}

/// In-memory source, mainly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct StaticSpecSource {
    documents: IndexMap<ReleaseTag, Vec<Value>>,
    descriptions: IndexMap<String, String>,
}

impl StaticSpecSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_spec(self, tag: ReleaseTag, spec: MethodSpec) -> Self {
        // Serializing a MethodSpec cannot fail.
        let document = serde_json::to_value(&spec).unwrap_or(Value::Null);
        self.with_document(tag, document)
    }

    /// Adds a raw document as-is, including malformed ones.
    pub fn with_document(mut self, tag: ReleaseTag, document: Value) -> Self {
        self.documents.entry(tag).or_default().push(document);
        self
    }

    pub fn with_description(mut self, method_id: impl Into<String>, description: impl Into<String>) -> Self {
        self.descriptions.insert(method_id.into(), description.into());
        self
    }
}

impl SpecSource for StaticSpecSource {
    fn list_specs(&self, tag: ReleaseTag) -> Result<Vec<Value>> {
        Ok(self.documents.get(&tag).cloned().unwrap_or_default())
    }

    fn method_description(&self, method_id: &str, tag: ReleaseTag) -> Result<String> {
        let published = self
            .documents
            .get(&tag)
            .is_some_and(|documents| documents.iter().any(|document| document_method_id(document) == Some(method_id)));
        if !published {
            bail!("Unknown method id \"{}\" tagged as \"{}\"", method_id, tag);
        }
        self.descriptions
            .get(method_id)
            .cloned()
            .ok_or_else(|| anyhow!("no description recorded for {}", method_id))
    }
}
