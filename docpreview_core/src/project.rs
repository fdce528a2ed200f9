//! Project discovery and `elm.json` manifest parsing.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{
    api::{PackageName, Version},
    Error, Result,
};

/// Manifest file name marking a project root.
pub const MANIFEST_FILE: &str = "elm.json";

/// README file read alongside the manifest.
pub const README_FILE: &str = "README.md";

/// Decoded project manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Manifest {
    /// A publishable package.
    Package {
        /// Package name, `author/project`.
        name: PackageName,
        /// One-line summary.
        #[serde(default)]
        summary: String,
        /// Version declared locally (may be ahead of the published one).
        version: Version,
        /// Modules exposed by the package.
        #[serde(rename = "exposed-modules", default)]
        exposed_modules: ExposedModules,
    },
    /// An application; it has no documentation to preview.
    Application {
        /// Source roots.
        #[serde(rename = "source-directories", default)]
        source_directories: Vec<String>,
    },
}

/// `exposed-modules` is either a flat list or a map of headings to lists.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ExposedModules {
    /// Plain list of module names.
    List(Vec<String>),
    /// Module names grouped under documentation headings.
    Grouped(BTreeMap<String, Vec<String>>),
}

impl Default for ExposedModules {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl ExposedModules {
    /// All exposed module names; grouped lists are flattened in heading order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::List(names) => names.iter().map(String::as_str).collect(),
            Self::Grouped(groups) => groups
                .values()
                .flatten()
                .map(String::as_str)
                .collect(),
        }
    }
}

/// A project located on disk.
#[derive(Clone)]
pub struct Project {
    root: PathBuf,
    manifest: Manifest,
}

impl Project {
    /// Open the project containing `path`, searching parent directories for
    /// the manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be canonicalized, no manifest exists
    /// at or above it, or the manifest cannot be read or decoded.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let original = path.as_ref();
        let canonical = std::fs::canonicalize(original).map_err(|source| Error::Io {
            path: display_path(original),
            source,
        })?;

        let root = canonical
            .ancestors()
            .find(|dir| dir.join(MANIFEST_FILE).is_file())
            .map(Path::to_path_buf)
            .ok_or_else(|| Error::NotAProject {
                path: display_path(&canonical),
            })?;

        let manifest = read_manifest(&root.join(MANIFEST_FILE))?;
        tracing::debug!(root = %root.display(), "opened project");
        Ok(Self { root, manifest })
    }

    /// Absolute path of the directory holding the manifest.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Decoded manifest.
    #[must_use]
    pub const fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Package name, for package projects.
    #[must_use]
    pub const fn package_name(&self) -> Option<&PackageName> {
        match &self.manifest {
            Manifest::Package { name, .. } => Some(name),
            Manifest::Application { .. } => None,
        }
    }

    /// Locally declared version, for package projects.
    #[must_use]
    pub const fn version(&self) -> Option<Version> {
        match &self.manifest {
            Manifest::Package { version, .. } => Some(*version),
            Manifest::Application { .. } => None,
        }
    }

    /// Contents of the project README, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the README exists but cannot be read.
    pub fn readme(&self) -> Result<Option<String>> {
        let path = self.root.join(README_FILE);
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(Error::Io {
                path: display_path(&path),
                source,
            }),
        }
    }
}

fn read_manifest(path: &Path) -> Result<Manifest> {
    let raw = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: display_path(path),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| Error::InvalidManifest {
        path: display_path(path),
        source,
    })
}

pub(crate) fn display_path(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

impl fmt::Debug for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Project")
            .field("root", &self.root)
            .field("package", &self.package_name())
            .finish_non_exhaustive()
    }
}
