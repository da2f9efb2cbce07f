//! Validation entry point used before a job is submitted.

use std::sync::Arc;

use methodcheck_registry::SpecSnapshot;
use methodcheck_types::{MethodSpec, ParameterDescriptor, ReleaseTag};
use serde_json::{Map as JsonMap, Value};
use tracing::{debug, info};

use crate::{
    arguments::Arguments,
    descriptor::build_descriptors,
    error::{BuildError, ManagerError},
    lookup::ObjectInfoLookup,
    parameters::validate_parameter_set,
    usage::MethodUsage,
    value::WorkspaceContext,
};

/// Checks method availability and validates argument sets against a fixed
/// specification snapshot.
///
/// The manager never reloads specifications itself; build a new one from a
/// fresh snapshot after `SpecStore::reload`.
#[derive(Clone)]
pub struct MethodManager {
    snapshot: Arc<SpecSnapshot>,
    lookup: Arc<dyn ObjectInfoLookup>,
    workspace: Option<String>,
}

impl MethodManager {
    pub fn new(snapshot: Arc<SpecSnapshot>, lookup: Arc<dyn ObjectInfoLookup>) -> Self {
        Self {
            snapshot,
            lookup,
            workspace: None,
        }
    }

    /// Sets the workspace input objects are looked up in.
    pub fn with_workspace(mut self, workspace: impl Into<String>) -> Self {
        self.workspace = Some(workspace.into());
        self
    }

    pub fn workspace(&self) -> Option<&str> {
        self.workspace.as_deref()
    }

    pub fn snapshot(&self) -> &Arc<SpecSnapshot> {
        &self.snapshot
    }

    /// Whether `method_id` is published under `tag`, even with a malformed
    /// specification. Invalid tags yield `false`.
    pub fn check_method(&self, method_id: &str, tag: &str) -> bool {
        tag.parse::<ReleaseTag>()
            .is_ok_and(|tag| self.snapshot.contains(tag, method_id))
    }

    /// Resolves the tag and the method's specification, failing fast when
    /// either is unknown. A published but malformed specification fails
    /// with [`ManagerError::Build`].
    pub fn require_method(&self, method_id: &str, tag: &str) -> Result<(ReleaseTag, &MethodSpec), ManagerError> {
        let tag: ReleaseTag = tag.parse()?;
        match self.snapshot.entry(tag, method_id) {
            Some(Ok(spec)) => Ok((tag, spec)),
            Some(Err(malformed)) => Err(BuildError::from(malformed.clone()).into()),
            None => Err(ManagerError::unknown_method(method_id, tag)),
        }
    }

    /// Descriptors for a method, in declaration order.
    pub fn descriptors(&self, method_id: &str, tag: &str) -> Result<Vec<ParameterDescriptor>, ManagerError> {
        let (_, spec) = self.require_method(method_id, tag)?;
        Ok(build_descriptors(spec)?)
    }

    pub fn method_usage(&self, method_id: &str, tag: &str) -> Result<MethodUsage, ManagerError> {
        let (tag, spec) = self.require_method(method_id, tag)?;
        let descriptors = build_descriptors(spec)?;
        Ok(MethodUsage::new(spec, tag, &descriptors))
    }

    /// Methods published under `tag`, sorted by id.
    pub fn list_methods(&self, tag: &str) -> Result<Vec<&MethodSpec>, ManagerError> {
        let tag: ReleaseTag = tag.parse()?;
        let mut methods: Vec<&MethodSpec> = self.snapshot.methods(tag).collect();
        methods.sort_by(|left, right| left.info.id.cmp(&right.info.id));
        Ok(methods)
    }

    /// Validates `arguments` for a method.
    ///
    /// Preconditions are checked first and fail fast, in this order: the tag
    /// must be known, the method must be published under it, and a version
    /// may only accompany the `release` tag. Otherwise every parameter
    /// problem is collected into [`ManagerError::Parameters`].
    pub fn validate_parameters(
        &self,
        method_id: &str,
        tag: &str,
        version: Option<&str>,
        arguments: &Arguments,
    ) -> Result<(), ManagerError> {
        let (tag, spec) = self.require_method(method_id, tag)?;
        if let Some(version) = version
            && tag != ReleaseTag::Release
        {
            return Err(ManagerError::VersionOnNonRelease {
                tag,
                version: version.to_string(),
            });
        }

        debug!(method_id, %tag, argument_count = arguments.len(), "validating parameters");
        let descriptors = build_descriptors(spec)?;
        let context = WorkspaceContext::new(self.lookup.as_ref(), self.workspace.as_deref());
        let report = validate_parameter_set(&descriptors, arguments, &context);

        if report.is_valid() {
            debug!(method_id, %tag, "parameters accepted");
            return Ok(());
        }
        info!(method_id, %tag, error_count = report.errors().len(), "parameters rejected");
        Err(ManagerError::Parameters {
            method_id: method_id.to_string(),
            report,
        })
    }

    /// Same as [`MethodManager::validate_parameters`] for JSON arguments.
    pub fn validate_json_arguments(
        &self,
        method_id: &str,
        tag: &str,
        version: Option<&str>,
        arguments: &JsonMap<String, Value>,
    ) -> Result<(), ManagerError> {
        self.validate_parameters(method_id, tag, version, &Arguments::from_json_map(arguments))
    }
}

impl std::fmt::Debug for MethodManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodManager")
            .field("workspace", &self.workspace)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::InMemoryObjects;
    use serde_json::json;

    fn manager() -> MethodManager {
        let spec: MethodSpec = serde_json::from_value(json!({
            "info": { "id": "Tools/count", "name": "Count" },
            "parameters": [
                { "id": "k", "optional": 0, "field_type": "text", "short_hint": "", "description": "", "allow_multiple": 0,
                  "text_options": { "validate_as": "int", "min_int": 1 } }
            ]
        }))
        .expect("spec fixture");
        let snapshot = SpecSnapshot::new()
            .with_tag(ReleaseTag::Release, vec![spec.clone()])
            .with_tag(ReleaseTag::Dev, vec![spec]);
        MethodManager::new(Arc::new(snapshot), Arc::new(InMemoryObjects::new())).with_workspace("ws")
    }

    #[test]
    fn check_method_is_non_failing() {
        let manager = manager();
        assert!(manager.check_method("Tools/count", "release"));
        assert!(!manager.check_method("Tools/count", "beta"));
        assert!(!manager.check_method("Tools/count", "nightly"));
    }

    #[test]
    fn bad_tag_fails_before_anything_else() {
        let err = manager()
            .validate_parameters("Nope/none", "Release", Some("1.0"), &Arguments::new())
            .unwrap_err();
        assert!(matches!(err, ManagerError::InvalidTag(_)));
    }

    #[test]
    fn unknown_method_fails_fast() {
        let err = manager()
            .validate_parameters("Nope/none", "release", None, &Arguments::new())
            .unwrap_err();
        assert_eq!(err, ManagerError::unknown_method("Nope/none", ReleaseTag::Release));
    }

    #[test]
    fn version_is_only_allowed_with_release() {
        let manager = manager();
        let arguments = Arguments::new().with("k", 3_i64);
        assert!(manager.validate_parameters("Tools/count", "release", Some(">=1.0.0"), &arguments).is_ok());

        // The argument set is invalid too, but the precondition wins.
        let err = manager
            .validate_parameters("Tools/count", "dev", Some("1.0.0"), &Arguments::new())
            .unwrap_err();
        assert!(matches!(err, ManagerError::VersionOnNonRelease { .. }));
        assert!(err.report().is_none());
    }

    #[test]
    fn parameter_errors_are_reported_together() {
        let err = manager()
            .validate_parameters("Tools/count", "dev", None, &Arguments::new().with("k", 0_i64).with("x", "y"))
            .unwrap_err();
        assert_eq!(
            err.messages(),
            vec![
                "x - unknown parameter - maybe something was misspelled?".to_string(),
                "k - Given value 0 should be >= 1".to_string()
            ]
        );
    }

    #[test]
    fn json_arguments_are_converted_at_the_boundary() {
        let arguments = json!({ "k": 2 });
        assert!(
            manager()
                .validate_json_arguments("Tools/count", "release", None, arguments.as_object().expect("object"))
                .is_ok()
        );
    }

    #[test]
    fn malformed_spec_fails_only_its_own_method() {
        let snapshot = SpecSnapshot::new().with_documents(
            ReleaseTag::Release,
            vec![
                json!({ "info": { "id": "Good/ok" }, "parameters": [
                    { "id": "k", "optional": 0, "field_type": "int", "short_hint": "", "description": "", "allow_multiple": 0 }
                ] }),
                json!({ "info": { "id": "Bad/broken" }, "parameters": [ { "id": "x", "optional": 0 } ] }),
            ],
        );
        let manager = MethodManager::new(Arc::new(snapshot), Arc::new(InMemoryObjects::new()));

        assert!(manager.validate_parameters("Good/ok", "release", None, &Arguments::new().with("k", 3_i64)).is_ok());
        assert!(manager.check_method("Bad/broken", "release"));
        let err = manager
            .validate_parameters("Bad/broken", "release", None, &Arguments::new())
            .unwrap_err();
        assert!(matches!(err, ManagerError::Build(BuildError::Malformed(_))), "{:?}", err);
        assert!(err.to_string().contains("Bad/broken"));
        assert_eq!(manager.list_methods("release").expect("list").len(), 1);
    }

    #[test]
    fn list_methods_sorts_by_id_and_checks_tag() {
        let manager = manager();
        assert_eq!(manager.list_methods("dev").expect("list").len(), 1);
        assert!(manager.list_methods("beta").expect("list").is_empty());
        assert!(manager.list_methods("stable").is_err());
    }
}
