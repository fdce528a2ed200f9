use std::collections::HashMap;
use std::env;
use std::time::Duration;

use docpreview_api::{DocsSnapshot, PackageName, Version};
use docpreview_backend_api::{BackendError, BackendResult, PackageSource};
use reqwest::blocking::Client;
use reqwest::StatusCode;

const DEFAULT_SITE: &str = "https://package.elm-lang.org";
const SITE_ENV: &str = "DOCPREVIEW_PACKAGE_SITE";
const REQUEST_TIMEOUT_SECS: u64 = 20;

/// Package source backed by the public package site.
#[derive(Debug, Clone)]
pub struct RemoteRegistry {
    base_url: String,
    client: Client,
}

impl RemoteRegistry {
    /// Registry at `DOCPREVIEW_PACKAGE_SITE`, defaulting to the public package site.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be initialised.
    pub fn new() -> BackendResult<Self> {
        let base_url = env::var(SITE_ENV).unwrap_or_else(|_| DEFAULT_SITE.to_string());
        Self::with_base_url(base_url)
    }

    /// Registry at an explicit base URL (no trailing slash required).
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be initialised.
    pub fn with_base_url(base_url: impl Into<String>) -> BackendResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("docpreview/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| BackendError::message(format!("failed to build HTTP client: {err}")))?;
        Ok(Self::with_client(base_url, client))
    }

    /// Registry at `base_url` issuing requests through a preconfigured client.
    #[must_use]
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    /// Base URL requests are issued against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn package_url(&self, package: &PackageName, tail: &str) -> String {
        format!(
            "{}/packages/{}/{}/{tail}",
            self.base_url,
            package.author(),
            package.project()
        )
    }

    fn version_url(&self, package: &PackageName, version: Version, file: &str) -> String {
        self.package_url(package, &format!("{version}/{file}"))
    }

    fn fetch(&self, url: &str) -> BackendResult<Option<String>> {
        tracing::debug!(%url, "fetching from package site");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| BackendError::message(format!("request to {url} failed: {err}")))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(BackendError::message(format!(
                "request to {url} returned {status}"
            )));
        }
        response
            .text()
            .map(Some)
            .map_err(|err| BackendError::message(format!("failed to read {url}: {err}")))
    }
}

impl PackageSource for RemoteRegistry {
    fn id(&self) -> &'static str {
        "remote"
    }

    fn label(&self) -> &'static str {
        "Package site"
    }

    fn versions(&self, package: &PackageName) -> BackendResult<Vec<Version>> {
        match self.fetch(&self.package_url(package, "releases.json"))? {
            Some(raw) => parse_releases(&raw),
            None => Ok(Vec::new()),
        }
    }

    fn docs(&self, package: &PackageName, version: Version) -> BackendResult<Option<DocsSnapshot>> {
        let url = self.version_url(package, version, "docs.json");
        let Some(raw) = self.fetch(&url)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| BackendError::message(format!("malformed docs from {url}: {err}")))
    }

    fn readme(&self, package: &PackageName, version: Version) -> BackendResult<Option<String>> {
        self.fetch(&self.version_url(package, version, "README.md"))
    }
}

/// Decode a `releases.json` body (`{"1.0.0": <publish time>, ...}`) into versions.
///
/// Keys that are not `major.minor.patch` are skipped.
///
/// # Errors
///
/// Returns an error when the body is not a JSON object.
pub fn parse_releases(raw: &str) -> BackendResult<Vec<Version>> {
    let releases: HashMap<String, serde_json::Value> = serde_json::from_str(raw)
        .map_err(|err| BackendError::message(format!("malformed releases listing: {err}")))?;
    Ok(releases
        .keys()
        .filter_map(|key| key.parse::<Version>().ok())
        .collect())
}
