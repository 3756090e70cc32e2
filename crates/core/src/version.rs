use crate::{cache::VersionCache, http_client::HttpClient};
use regex::Regex;
use std::{sync::LazyLock, time::Duration};
use tracing::{debug, warn};
use url::Url;

/// Version used whenever the manifest cannot provide one.
pub const DEFAULT_LAUNCHER_VERSION: &str = "1.0.0";

/// Key the resolved version is stored under in the [`VersionCache`].
pub const VERSION_CACHE_KEY: &str = "latestVersion";

static MANIFEST_VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"version:\s*(.+)").expect("valid manifest version pattern"));

/// Outcome of looking up the version advertised by the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The manifest advertised this version.
    Resolved(String),
    /// The manifest was unavailable or did not contain a version.
    UseDefault,
}

/// Resolves the current launcher version, preferring a cached value over the remote manifest.
#[derive(Debug, Clone)]
pub struct VersionResolver {
    client: HttpClient,
    manifest_url: Url,
    cache_ttl: Duration,
}

impl VersionResolver {
    /// Create a resolver that reads `manifest_url` on cache misses and caches results for `cache_ttl`.
    pub fn new(client: HttpClient, manifest_url: Url, cache_ttl: Duration) -> Self {
        Self {
            client,
            manifest_url,
            cache_ttl,
        }
    }

    /// Resolve the launcher version.
    ///
    /// This never fails: cache and manifest errors are logged and the
    /// [`DEFAULT_LAUNCHER_VERSION`] is returned in their place.
    pub async fn resolve(&self, cache: &dyn VersionCache) -> String {
        match cache.get(VERSION_CACHE_KEY).await {
            Ok(Some(version)) if !version.is_empty() => {
                debug!("Using cached launcher version {version}");
                return version;
            }
            Ok(_) => {}
            Err(err) => warn!("Failed to read launcher version from cache: {err}"),
        }

        match self.fetch_manifest().await {
            Resolution::Resolved(version) => {
                debug!("Resolved launcher version {version} from manifest");
                if let Err(err) = cache.put(VERSION_CACHE_KEY, &version, self.cache_ttl).await {
                    warn!("Failed to write launcher version to cache: {err}");
                }
                version
            }
            Resolution::UseDefault => DEFAULT_LAUNCHER_VERSION.to_owned(),
        }
    }

    async fn fetch_manifest(&self) -> Resolution {
        let response = match self.client.get(self.manifest_url.as_str()).send().await {
            Ok(response) => response,
            Err(err) => {
                warn!("Failed to send request for version manifest: {err}");
                return Resolution::UseDefault;
            }
        };
        if let Err(err) = response.error_for_status_ref() {
            warn!("Version manifest returned unsuccessful status code: {err}");
            return Resolution::UseDefault;
        }
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                warn!("Failed to read version manifest body: {err}");
                return Resolution::UseDefault;
            }
        };

        match parse_manifest_version(&body) {
            Some(version) => Resolution::Resolved(version),
            None => {
                warn!("Version manifest did not contain a version line");
                Resolution::UseDefault
            }
        }
    }
}

/// Extract the first `version:` value from a manifest document.
pub fn parse_manifest_version(manifest: &str) -> Option<String> {
    MANIFEST_VERSION_PATTERN
        .captures(manifest)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().trim())
        .filter(|version| !version.is_empty())
        .map(str::to_owned)
}
