mod registry;
mod types;

use std::path::Path;

use docpreview_api::{DocsSnapshot, PackageName, Version};

pub use registry::SourceRegistry;
pub use types::{BackendError, BackendResult, SourceSummary};

/// A place published packages can be looked up in (local cache, package site, ...).
pub trait PackageSource: Send + Sync {
    /// Stable identifier used for lookup and logging.
    fn id(&self) -> &'static str;

    /// Human-friendly label for UI surfaces.
    fn label(&self) -> &'static str;

    /// Every version of `package` this source knows about, in no particular order.
    ///
    /// An empty list means the source has never seen the package.
    ///
    /// # Errors
    ///
    /// Implementors should surface transport or filesystem failures.
    fn versions(&self, package: &PackageName) -> BackendResult<Vec<Version>>;

    /// Documentation snapshot of a published version, if the source has it.
    ///
    /// # Errors
    ///
    /// Implementors should surface transport, filesystem or decoding failures.
    fn docs(&self, package: &PackageName, version: Version) -> BackendResult<Option<DocsSnapshot>>;

    /// README text of a published version, if the source has it.
    ///
    /// # Errors
    ///
    /// Implementors should surface transport or filesystem failures.
    fn readme(&self, package: &PackageName, version: Version) -> BackendResult<Option<String>>;
}

/// The external compiler, driven for documentation builds and API diffs.
pub trait DocsCompiler: Send + Sync {
    /// Build the project's documentation snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error when the compiler cannot be run, fails, or emits unreadable docs.
    fn build_docs(&self, project_dir: &Path) -> BackendResult<DocsSnapshot>;

    /// Raw report of the compiler's `diff` command against the latest published release.
    ///
    /// # Errors
    ///
    /// Returns an error when the command cannot be spawned, times out or exits unsuccessfully.
    fn diff(&self, project_dir: &Path) -> BackendResult<String>;
}
