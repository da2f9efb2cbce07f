//! Registry crate for method specifications.
//!
//! This crate owns everything about *where* specifications come from and
//! *which* ones are current:
//!
//! - [`SpecSource`] implementations for local catalogs, the remote method
//!   store and in-memory fixtures
//! - [`SpecStore`], the injectable owner of the current [`SpecSnapshot`]
//! - [`MethodCheckConfig`], the on-disk configuration

pub mod config;
mod remote;
mod snapshot;
pub mod source;
mod store;

pub use config::{MethodCheckConfig, SpecCatalog, default_config_path};
pub use methodcheck_types::{MalformedSpec, MethodSpec, ReleaseTag};
pub use remote::RemoteSpecSource;
pub use snapshot::SpecSnapshot;
pub use source::{FileSpecSource, SpecSource, StaticSpecSource};
pub use store::SpecStore;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

/// Picks the specification source described by `config`: local catalogs
/// when configured, the remote method store otherwise.
pub fn source_from_config(config: &MethodCheckConfig) -> Result<Arc<dyn SpecSource>> {
    if let Some(files) = FileSpecSource::from_config(config) {
        info!("using local spec catalogs");
        return Ok(Arc::new(files));
    }
    info!(url = %config.method_store_url, "using remote method store");
    Ok(Arc::new(RemoteSpecSource::new(&config.method_store_url)?))
}
