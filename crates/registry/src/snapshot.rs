use indexmap::IndexMap;
use methodcheck_types::{MalformedSpec, MethodSpec, ReleaseTag, document_method_id};
use serde_json::Value;
use tracing::warn;

/// Immutable view of every specification known at one point in time.
///
/// Specifications are keyed by tag, then by method id in load order. A
/// method id seen twice within a tag keeps the later specification.
/// Documents that fail to parse are kept under their method id as
/// [`MalformedSpec`] so only that method is unusable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecSnapshot {
    specs: IndexMap<ReleaseTag, IndexMap<String, Result<MethodSpec, MalformedSpec>>>,
}

impl SpecSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every specification for `tag` with already parsed ones.
    pub fn with_tag(mut self, tag: ReleaseTag, specs: Vec<MethodSpec>) -> Self {
        let by_id = specs.into_iter().map(|spec| (spec.info.id.clone(), Ok(spec))).collect();
        self.specs.insert(tag, by_id);
        self
    }

    /// Replaces every specification for `tag`, parsing each raw document on
    /// its own. Documents without a readable `info.id` cannot be attributed
    /// to a method and are skipped.
    pub fn with_documents(mut self, tag: ReleaseTag, documents: Vec<Value>) -> Self {
        let mut by_id = IndexMap::new();
        for (index, document) in documents.into_iter().enumerate() {
            let Some(method_id) = document_method_id(&document).map(str::to_string) else {
                warn!(%tag, index, "skipping specification without info.id");
                continue;
            };
            let entry = MethodSpec::from_document(document);
            if let Err(malformed) = &entry {
                warn!(%tag, method_id, reason = %malformed.reason, "malformed method specification");
            }
            by_id.insert(method_id, entry);
        }
        self.specs.insert(tag, by_id);
        self
    }

    /// The loaded entry for a method: its specification, or why it could not
    /// be parsed.
    pub fn entry(&self, tag: ReleaseTag, method_id: &str) -> Option<Result<&MethodSpec, &MalformedSpec>> {
        self.specs.get(&tag)?.get(method_id).map(Result::as_ref)
    }

    /// The parsed specification for a method, if it is published and well formed.
    pub fn get(&self, tag: ReleaseTag, method_id: &str) -> Option<&MethodSpec> {
        self.entry(tag, method_id)?.ok()
    }

    /// Whether `method_id` is published under `tag`, well formed or not.
    pub fn contains(&self, tag: ReleaseTag, method_id: &str) -> bool {
        self.entry(tag, method_id).is_some()
    }

    /// Well-formed specifications for `tag`, in load order.
    pub fn methods(&self, tag: ReleaseTag) -> impl Iterator<Item = &MethodSpec> {
        self.entries(tag).filter_map(|entry| entry.as_ref().ok())
    }

    /// Documents for `tag` that could not be parsed, in load order.
    pub fn malformed(&self, tag: ReleaseTag) -> impl Iterator<Item = &MalformedSpec> {
        self.entries(tag).filter_map(|entry| entry.as_ref().err())
    }

    /// Number of published methods under `tag`, malformed ones included.
    pub fn method_count(&self, tag: ReleaseTag) -> usize {
        self.specs.get(&tag).map_or(0, IndexMap::len)
    }

    fn entries(&self, tag: ReleaseTag) -> impl Iterator<Item = &Result<MethodSpec, MalformedSpec>> {
        self.specs.get(&tag).into_iter().flat_map(|by_id| by_id.values())
    }
}
