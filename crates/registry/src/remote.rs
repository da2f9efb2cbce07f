use anyhow::{Context, Result};
use methodcheck_api::MethodStoreClient;
use methodcheck_types::ReleaseTag;
use serde_json::Value;
use tokio::runtime::{Builder, Runtime};

use crate::SpecSource;

/// Source backed by the remote narrative method store.
///
/// Calls are blocking: the source owns a single-threaded runtime and drives
/// each request to completion before returning.
pub struct RemoteSpecSource {
    client: MethodStoreClient,
    runtime: Runtime,
}

impl RemoteSpecSource {
    pub fn new(url: &str) -> Result<Self> {
        let client = MethodStoreClient::new(url)?;
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .context("runtime init failed")?;
        Ok(Self { client, runtime })
    }
}

impl SpecSource for RemoteSpecSource {
    fn list_specs(&self, tag: ReleaseTag) -> Result<Vec<Value>> {
        self.runtime
            .block_on(self.client.list_methods_spec(tag))
            .with_context(|| format!("Failed to list {} method specs", tag))
    }

    fn method_description(&self, method_id: &str, tag: ReleaseTag) -> Result<String> {
        self.runtime
            .block_on(self.client.get_method_description(method_id, tag))
            .with_context(|| format!("Failed to fetch description for {}", method_id))
    }
}
