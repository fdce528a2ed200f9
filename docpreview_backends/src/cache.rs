use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use docpreview_api::{DocsSnapshot, PackageName, Version};
use docpreview_backend_api::{BackendError, BackendResult, PackageSource};

const HOME_ENV: &str = "ELM_HOME";
const COMPILER_RELEASE: &str = "0.19.1";

/// Package source backed by the compiler's on-disk package cache.
///
/// Layout: `<root>/<author>/<project>/<version>/{docs.json,README.md}`.
#[derive(Debug, Clone)]
pub struct PackageCache {
    root: PathBuf,
}

impl PackageCache {
    /// Locate the cache from `ELM_HOME`, falling back to `~/.elm`.
    #[must_use]
    pub fn new() -> Self {
        let home = env::var_os(HOME_ENV).map(PathBuf::from).unwrap_or_else(|| {
            dirs::home_dir().map_or_else(
                || {
                    tracing::warn!("no home directory; using a relative package cache");
                    PathBuf::from(".elm")
                },
                |home| home.join(".elm"),
            )
        });
        Self::from_home(home)
    }

    /// Cache inside an explicit compiler home directory.
    #[must_use]
    pub fn from_home(home: impl AsRef<Path>) -> Self {
        Self::at(home.as_ref().join(COMPILER_RELEASE).join("packages"))
    }

    /// Cache rooted directly at a packages directory.
    #[must_use]
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Packages directory this cache reads from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn package_dir(&self, package: &PackageName) -> PathBuf {
        self.root.join(package.author()).join(package.project())
    }

    fn version_file(&self, package: &PackageName, version: Version, file: &str) -> PathBuf {
        self.package_dir(package).join(version.to_string()).join(file)
    }
}

impl Default for PackageCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageSource for PackageCache {
    fn id(&self) -> &'static str {
        "cache"
    }

    fn label(&self) -> &'static str {
        "Local package cache"
    }

    fn versions(&self, package: &PackageName) -> BackendResult<Vec<Version>> {
        let dir = self.package_dir(package);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(io_error(&dir, &err)),
        };

        let mut versions = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| io_error(&dir, &err))?;
            let is_dir = entry.file_type().is_ok_and(|kind| kind.is_dir());
            if !is_dir {
                continue;
            }
            if let Some(version) = entry
                .file_name()
                .to_str()
                .and_then(|name| name.parse::<Version>().ok())
            {
                versions.push(version);
            }
        }
        Ok(versions)
    }

    fn docs(&self, package: &PackageName, version: Version) -> BackendResult<Option<DocsSnapshot>> {
        let path = self.version_file(package, version, "docs.json");
        let Some(raw) = read_optional(&path)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| BackendError::message(format!("malformed {}: {err}", path.display())))
    }

    fn readme(&self, package: &PackageName, version: Version) -> BackendResult<Option<String>> {
        read_optional(&self.version_file(package, version, "README.md"))
    }
}

fn read_optional(path: &Path) -> BackendResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(io_error(path, &err)),
    }
}

fn io_error(path: &Path, err: &io::Error) -> BackendError {
    BackendError::message(format!("failed to access {}: {err}", path.display()))
}
