//! Builds the preview update for a local package: current docs, the
//! compiler's API diff and the content diff against the latest release.

use std::sync::Arc;
use std::thread;

use docpreview_backend_api::DocsCompiler;

use crate::{
    api::{ApiDiff, DocsSnapshot, PreviewUpdate},
    api_diff::parse_diff_output,
    baseline::BaselineService,
    content_diff::compute_content_diff,
    project::{display_path, Manifest, Project},
    Error, Result,
};

/// Orchestrates one documentation build of a project.
pub struct Previewer {
    project: Project,
    compiler: Arc<dyn DocsCompiler>,
    baseline: BaselineService,
}

impl Previewer {
    /// Create a previewer for `project`.
    #[must_use]
    pub fn new(project: Project, compiler: Arc<dyn DocsCompiler>, baseline: BaselineService) -> Self {
        Self {
            project,
            compiler,
            baseline,
        }
    }

    /// Project being previewed.
    #[must_use]
    pub const fn project(&self) -> &Project {
        &self.project
    }

    /// Build docs and then run the API diff while the published baseline is
    /// resolved in the background, then merge everything into one update.
    ///
    /// A failing `diff` command only drops the API diff; a missing baseline
    /// only drops the content diff.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedProject`] for applications, [`Error::Compiler`]
    /// when the documentation build fails, and [`Error::Io`] when the README
    /// cannot be read.
    pub fn build(&self) -> Result<PreviewUpdate> {
        let Some(name) = self.project.package_name() else {
            return Err(Error::UnsupportedProject {
                path: display_path(self.project.root()),
            });
        };
        let root = self.project.root();
        tracing::info!(package = %name, root = %root.display(), "building preview");
        if let Manifest::Package {
            summary,
            exposed_modules,
            ..
        } = self.project.manifest()
        {
            tracing::debug!(%summary, modules = ?exposed_modules.names(), "package manifest");
        }

        let (docs, diff, baseline) = thread::scope(|scope| {
            let baseline = scope.spawn(|| self.baseline.published_baseline(name));
            // both commands write the project's build artifacts
            let docs = self.compiler.build_docs(root);
            let diff = docs.is_ok().then(|| self.api_diff()).flatten();
            (
                docs,
                diff,
                join_or_none(baseline.join(), "published baseline"),
            )
        });
        let docs: DocsSnapshot = docs?;
        let readme = self.project.readme()?;

        let content_diff = baseline.as_ref().and_then(|published| {
            compute_content_diff(
                published.docs.as_deref(),
                Some(docs.as_slice()),
                published.readme.as_deref(),
                readme.as_deref(),
            )
        });

        tracing::info!(
            package = %name,
            modules = docs.len(),
            api_diff = diff.is_some(),
            content_diff = content_diff.is_some(),
            "preview ready"
        );

        Ok(PreviewUpdate {
            name: Some(name.clone()),
            version: self.project.version(),
            published_version: baseline.as_ref().map(|published| published.version),
            docs,
            readme,
            diff,
            content_diff,
        })
    }

    fn api_diff(&self) -> Option<ApiDiff> {
        match self.compiler.diff(self.project.root()) {
            Ok(report) => {
                let parsed = parse_diff_output(&report);
                if parsed.is_none() {
                    tracing::debug!("diff report had no magnitude line");
                }
                parsed
            }
            Err(err) => {
                tracing::warn!(error = %err, "compiler diff failed; omitting api diff");
                None
            }
        }
    }
}

/// Flatten a scoped thread result; a panicked worker counts as "no answer".
fn join_or_none<T>(joined: thread::Result<Option<T>>, what: &str) -> Option<T> {
    joined.unwrap_or_else(|_| {
        tracing::error!(task = what, "preview worker panicked");
        None
    })
}

impl std::fmt::Debug for Previewer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Previewer")
            .field("project", &self.project)
            .field("baseline", &self.baseline)
            .finish_non_exhaustive()
    }
}
