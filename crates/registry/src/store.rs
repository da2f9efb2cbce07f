use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Result;
use methodcheck_types::ReleaseTag;
use tracing::{info, warn};

use crate::{SpecSnapshot, SpecSource};

/// Owner of the current specification snapshot.
///
/// The store is created explicitly and handed to whoever needs it; there is
/// no process-wide cache. Readers take an `Arc<SpecSnapshot>` and keep using
/// it even while a reload swaps in a newer one.
pub struct SpecStore {
    source: Arc<dyn SpecSource>,
    current: Mutex<Arc<SpecSnapshot>>,
}

impl SpecStore {
    /// Creates a store with an empty snapshot. Call [`SpecStore::reload`] to
    /// populate it.
    pub fn new(source: Arc<dyn SpecSource>) -> Self {
        Self {
            source,
            current: Mutex::new(Arc::new(SpecSnapshot::new())),
        }
    }

    /// Creates a store and performs the initial load.
    pub fn load(source: Arc<dyn SpecSource>) -> Result<Self> {
        let store = Self::new(source);
        store.reload()?;
        Ok(store)
    }

    /// Fetches every tag from the source and swaps in a fresh snapshot.
    ///
    /// When any tag fails to load the previous snapshot stays current and
    /// the error is returned.
    pub fn reload(&self) -> Result<Arc<SpecSnapshot>> {
        let mut snapshot = SpecSnapshot::new();
        for tag in ReleaseTag::ALL {
            let documents = self.source.list_specs(tag).inspect_err(|error| {
                warn!(%tag, error = %error, "spec reload failed; keeping previous snapshot");
            })?;
            snapshot = snapshot.with_documents(tag, documents);
        }

        let snapshot = Arc::new(snapshot);
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&snapshot);
        info!(
            release = snapshot.method_count(ReleaseTag::Release),
            beta = snapshot.method_count(ReleaseTag::Beta),
            dev = snapshot.method_count(ReleaseTag::Dev),
            malformed = ReleaseTag::ALL.iter().map(|tag| snapshot.malformed(*tag).count()).sum::<usize>(),
            "method specs reloaded"
        );
        Ok(snapshot)
    }

    /// The most recently loaded snapshot.
    pub fn snapshot(&self) -> Arc<SpecSnapshot> {
        Arc::clone(&self.current.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn source(&self) -> &Arc<dyn SpecSource> {
        &self.source
    }
}

impl std::fmt::Debug for SpecStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpecStore").field("current", &self.snapshot()).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use anyhow::bail;
    use methodcheck_types::{MethodInfo, MethodSpec};

    use super::*;
    use crate::StaticSpecSource;

    fn spec(id: &str) -> MethodSpec {
        MethodSpec {
            info: MethodInfo {
                id: id.into(),
                name: id.into(),
                subtitle: String::new(),
                ver: None,
            },
            parameters: Vec::new(),
        }
    }

    /// Serves one spec per tag until told to fail.
    struct FlakySource {
        fail: AtomicBool,
    }

    impl SpecSource for FlakySource {
        fn list_specs(&self, tag: ReleaseTag) -> Result<Vec<serde_json::Value>> {
            if self.fail.load(Ordering::SeqCst) {
                bail!("method store unreachable");
            }
            Ok(vec![serde_json::to_value(spec(&format!("{}/method", tag)))?])
        }
    }

    #[test]
    fn new_store_starts_empty() {
        let store = SpecStore::new(Arc::new(StaticSpecSource::new()));
        assert_eq!(store.snapshot().method_count(ReleaseTag::Release), 0);
    }

    #[test]
    fn reload_returns_and_installs_fresh_snapshot() {
        let source = StaticSpecSource::new()
            .with_spec(ReleaseTag::Release, spec("a/one"))
            .with_spec(ReleaseTag::Dev, spec("a/two"));
        let store = SpecStore::new(Arc::new(source));

        let returned = store.reload().expect("reload");
        assert!(returned.contains(ReleaseTag::Release, "a/one"));
        assert!(Arc::ptr_eq(&returned, &store.snapshot()));
    }

    #[test]
    fn failed_reload_keeps_previous_snapshot() {
        let source = Arc::new(FlakySource {
            fail: AtomicBool::new(false),
        });
        let store = SpecStore::load(source.clone()).expect("initial load");
        let before = store.snapshot();
        assert!(before.contains(ReleaseTag::Beta, "beta/method"));

        source.fail.store(true, Ordering::SeqCst);
        assert!(store.reload().is_err());
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn held_snapshots_are_unaffected_by_reload() {
        let store = SpecStore::load(Arc::new(StaticSpecSource::new().with_spec(ReleaseTag::Release, spec("a/one"))))
            .expect("initial load");
        let held = store.snapshot();
        store.reload().expect("reload");
        assert!(!Arc::ptr_eq(&held, &store.snapshot()));
        assert_eq!(*held, *store.snapshot());
    }

    #[test]
    fn malformed_documents_do_not_block_reload() {
        let source = StaticSpecSource::new()
            .with_spec(ReleaseTag::Release, spec("Good/ok"))
            .with_document(
                ReleaseTag::Release,
                serde_json::json!({ "info": { "id": "Bad/broken" }, "parameters": [ { "id": "x" } ] }),
            );
        let store = SpecStore::load(Arc::new(source)).expect("load succeeds despite a malformed document");
        let snapshot = store.snapshot();
        assert!(snapshot.get(ReleaseTag::Release, "Good/ok").is_some());
        assert!(matches!(snapshot.entry(ReleaseTag::Release, "Bad/broken"), Some(Err(_))));
    }
}
