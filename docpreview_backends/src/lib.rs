mod cache;
mod compiler;
mod remote;

pub use cache::PackageCache;
pub use compiler::CompilerCli;
pub use remote::{parse_releases, RemoteRegistry};

use docpreview_backend_api::SourceRegistry;

/// Build a source registry that consults the local cache before the package site.
#[must_use]
pub fn default_registry() -> SourceRegistry {
    let mut registry = SourceRegistry::new();
    registry.register(PackageCache::new());

    match RemoteRegistry::new() {
        Ok(remote) => registry.register(remote),
        Err(err) => tracing::warn!(error = %err, "package site unavailable; using cache only"),
    }

    registry
}
