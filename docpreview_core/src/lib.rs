//! Core library for previewing package documentation.
//!
//! The crate is layered around three primary responsibilities:
//! - the diff engines (line diff, API-diff report parsing, content diff)
//! - resolving the latest published baseline through ordered package sources
//! - orchestrating a preview build of a local project

#![warn(
    clippy::all,
    clippy::cargo,
    clippy::nursery,
    clippy::pedantic,
    missing_docs
)]
#![cfg_attr(
    not(test),
    deny(
        clippy::dbg_macro,
        clippy::expect_used,
        clippy::panic,
        clippy::print_stderr,
        clippy::print_stdout,
        clippy::todo,
        clippy::unwrap_used
    )
)]

/// Parser for the compiler's textual API-diff report.
pub mod api_diff;
/// Published-baseline resolution over ordered package sources.
pub mod baseline;
/// Doc-comment, signature and README diffing between two snapshots.
pub mod content_diff;
/// Line-level text diffing.
pub mod line_diff;
/// Tracing subscriber setup.
pub mod logging;
/// Preview build orchestration.
pub mod preview;
/// Project manifest discovery and parsing.
pub mod project;

pub use docpreview_api as api;
pub use docpreview_api::{
    ApiDiff, ContentDiff, DiffLine, DiffLineKind, DocsSnapshot, DocumentedModule,
    ItemContentDiff, Magnitude, ModuleChanges, ModuleContentDiff, PackageName, PreviewUpdate,
    Version,
};

pub use api_diff::parse_diff_output;
pub use content_diff::compute_content_diff;
pub use line_diff::compute_line_diff;

use docpreview_backend_api::BackendError;

/// Common result type for the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the core library.
///
/// The diff engines themselves never fail; these cover project access and
/// the compiler invocation that produces the current snapshot.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No project manifest was found at or above the given path.
    #[error("no elm.json found at or above {path}")]
    NotAProject {
        /// Path the search started from.
        path: String,
    },
    /// The project manifest could not be decoded.
    #[error("invalid project manifest {path}: {source}")]
    InvalidManifest {
        /// Manifest path.
        path: String,
        /// Decoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// The project kind cannot be previewed.
    #[error("{path} is an application; documentation can only be built for packages")]
    UnsupportedProject {
        /// Project root.
        path: String,
    },
    /// Filesystem interaction failed.
    #[error("failed to access {path}: {source}")]
    Io {
        /// Filesystem path involved in the failed operation.
        path: String,
        /// Source I/O error returned by the standard library.
        #[source]
        source: std::io::Error,
    },
    /// The compiler failed to build documentation.
    #[error("documentation build failed: {source}")]
    Compiler {
        /// Backend failure.
        #[from]
        source: BackendError,
    },
}
