use std::sync::Arc;

use super::{BackendResult, PackageSource, SourceRegistry, SourceSummary};
use crate::api::{DocsSnapshot, PackageName, Version};

/// Everything the content diff needs from the latest published release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedBaseline {
    /// Latest published version.
    pub version: Version,
    /// Documentation of that version, if any source could provide it.
    pub docs: Option<DocsSnapshot>,
    /// README of that version, if any source could provide it.
    pub readme: Option<String>,
}

/// Resolves published baselines by asking each registered source in order.
///
/// The first source with an answer wins. Source failures are logged and
/// treated as "not found here", so a broken network never fails a preview.
#[derive(Clone)]
pub struct BaselineService {
    registry: Arc<SourceRegistry>,
}

impl BaselineService {
    /// Create a service backed by the provided registry.
    #[must_use]
    pub fn new(registry: SourceRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Access the underlying registry.
    #[must_use]
    pub fn registry(&self) -> Arc<SourceRegistry> {
        Arc::clone(&self.registry)
    }

    /// List summaries for all registered sources, in lookup order.
    #[must_use]
    pub fn summaries(&self) -> Vec<SourceSummary> {
        self.registry.summaries()
    }

    /// Highest version reported by the first source that knows the package.
    ///
    /// `None` means the package was never published (or no source is reachable).
    #[must_use]
    pub fn latest_version(&self, package: &PackageName) -> Option<Version> {
        self.first(package, "versions", |source| {
            source
                .versions(package)
                .map(|versions| versions.into_iter().max())
        })
    }

    /// Documentation snapshot of a published version.
    #[must_use]
    pub fn docs(&self, package: &PackageName, version: Version) -> Option<DocsSnapshot> {
        self.first(package, "docs", |source| source.docs(package, version))
    }

    /// README of a published version.
    #[must_use]
    pub fn readme(&self, package: &PackageName, version: Version) -> Option<String> {
        self.first(package, "readme", |source| source.readme(package, version))
    }

    /// Latest published version together with its docs and README.
    #[must_use]
    pub fn published_baseline(&self, package: &PackageName) -> Option<PublishedBaseline> {
        let Some(version) = self.latest_version(package) else {
            tracing::info!(%package, "no published version found");
            return None;
        };
        tracing::debug!(%package, %version, "resolved published baseline");
        Some(PublishedBaseline {
            version,
            docs: self.docs(package, version),
            readme: self.readme(package, version),
        })
    }

    fn first<T, F>(&self, package: &PackageName, operation: &'static str, lookup: F) -> Option<T>
    where
        F: Fn(&dyn PackageSource) -> BackendResult<Option<T>>,
    {
        for source in self.registry.iter() {
            match lookup(source.as_ref()) {
                Ok(Some(found)) => {
                    tracing::debug!(source = source.id(), %package, operation, "source answered");
                    return Some(found);
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(
                        source = source.id(),
                        %package,
                        operation,
                        error = %err,
                        "package source failed; trying next"
                    );
                }
            }
        }
        None
    }
}

impl std::fmt::Debug for BaselineService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<&str> = self.registry.ids().collect();
        f.debug_struct("BaselineService")
            .field("sources", &ids)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::api::DocumentedModule;
    use crate::baseline::BackendError;

    #[derive(Default)]
    struct FakeSource {
        id: &'static str,
        versions: Vec<Version>,
        docs: HashMap<Version, DocsSnapshot>,
        readmes: HashMap<Version, String>,
        broken: bool,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn named(id: &'static str) -> Self {
            Self {
                id,
                ..Self::default()
            }
        }

        fn check(&self) -> BackendResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.broken {
                Err(BackendError::message(format!("{} is down", self.id)))
            } else {
                Ok(())
            }
        }
    }

    impl PackageSource for FakeSource {
        fn id(&self) -> &'static str {
            self.id
        }

        fn label(&self) -> &'static str {
            "Fake"
        }

        fn versions(&self, _package: &PackageName) -> BackendResult<Vec<Version>> {
            self.check()?;
            Ok(self.versions.clone())
        }

        fn docs(&self, _: &PackageName, version: Version) -> BackendResult<Option<DocsSnapshot>> {
            self.check()?;
            Ok(self.docs.get(&version).cloned())
        }

        fn readme(&self, _: &PackageName, version: Version) -> BackendResult<Option<String>> {
            self.check()?;
            Ok(self.readmes.get(&version).cloned())
        }
    }

    fn package() -> PackageName {
        "author/project".parse().expect("package name")
    }

    fn service(sources: Vec<FakeSource>) -> BaselineService {
        let mut registry = SourceRegistry::new();
        for source in sources {
            registry.register(source);
        }
        BaselineService::new(registry)
    }

    #[test]
    fn picks_highest_version_numerically() {
        let mut cache = FakeSource::named("cache");
        cache.versions = vec![
            Version::new(1, 9, 0),
            Version::new(1, 10, 0),
            Version::new(1, 2, 30),
        ];
        let service = service(vec![cache]);
        assert_eq!(
            service.latest_version(&package()),
            Some(Version::new(1, 10, 0))
        );
    }

    #[test]
    fn cache_answer_wins_over_network() {
        let mut cache = FakeSource::named("cache");
        cache.versions = vec![Version::new(1, 0, 0)];
        let mut remote = FakeSource::named("remote");
        remote.versions = vec![Version::new(2, 0, 0)];

        let service = service(vec![cache, remote]);
        assert_eq!(
            service.latest_version(&package()),
            Some(Version::new(1, 0, 0))
        );
        let remote = service.registry().get("remote").expect("remote registered");
        assert_eq!(remote.id(), "remote");
    }

    #[test]
    fn falls_back_when_cache_is_empty_or_broken() {
        let empty = FakeSource::named("cache");
        let broken = FakeSource {
            broken: true,
            ..FakeSource::named("mirror")
        };
        let mut remote = FakeSource::named("remote");
        remote.versions = vec![Version::new(3, 1, 4)];

        let service = service(vec![empty, broken, remote]);
        assert_eq!(
            service.latest_version(&package()),
            Some(Version::new(3, 1, 4))
        );
    }

    #[test]
    fn docs_fall_back_per_version() {
        let version = Version::new(1, 0, 0);
        let mut cache = FakeSource::named("cache");
        cache.versions = vec![version];
        cache.readmes.insert(version, "cached readme".into());
        let mut remote = FakeSource::named("remote");
        remote
            .docs
            .insert(version, vec![DocumentedModule::new("Remote.Docs")]);

        let baseline = service(vec![cache, remote])
            .published_baseline(&package())
            .expect("baseline");
        assert_eq!(baseline.version, version);
        assert_eq!(baseline.readme.as_deref(), Some("cached readme"));
        let docs = baseline.docs.expect("docs from remote");
        assert_eq!(docs[0].name, "Remote.Docs");
    }

    #[test]
    fn never_published_has_no_baseline() {
        let service = service(vec![FakeSource::named("cache"), FakeSource::named("remote")]);
        assert!(service.published_baseline(&package()).is_none());
    }

    #[test]
    fn empty_registry_resolves_nothing() {
        let service = BaselineService::new(SourceRegistry::new());
        assert!(service.latest_version(&package()).is_none());
        assert!(service.summaries().is_empty());
    }
}
