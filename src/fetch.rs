//! Collaborators that turn remote URLs and logical asset paths into bytes.
//!
//! The pipeline only talks to these traits. [`HttpFetcher`] (feature `http`)
//! is the production fetcher; [`NoFetch`] refuses every request and is what
//! offline callers and tests plug in.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Timeout for fetching the primary source.
pub const SOURCE_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for the best-effort glyph lookup.
pub const GLYPH_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("favicon-generator/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Fetch
// ============================================================================

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("the server answered with HTTP {status}")]
    Status { status: u16 },

    #[error("{reason}")]
    Transport { reason: String },

    #[error("remote fetching is not available")]
    Unsupported,
}

/// Downloads the body behind a URL. A single attempt, no retries.
pub trait Fetch {
    fn fetch(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, FetchError>;
}

/// A fetcher that refuses every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFetch;

impl Fetch for NoFetch {
    fn fetch(&self, _url: &str, _timeout: Duration) -> Result<Vec<u8>, FetchError> {
        Err(FetchError::Unsupported)
    }
}

/// Blocking HTTP(S) fetcher backed by `reqwest`.
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "http")]
impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Transport {
                reason: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client })
    }
}

#[cfg(feature = "http")]
impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, FetchError> {
        tracing::debug!("fetching {} (timeout {:?})", url, timeout);

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .map_err(|e| FetchError::Transport {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().map_err(|e| FetchError::Transport {
            reason: e.to_string(),
        })?;

        Ok(body.to_vec())
    }
}

// ============================================================================
// Asset resolution
// ============================================================================

/// What an asset path resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedAsset {
    /// A file on local disk.
    File(PathBuf),
    /// A URL to fetch.
    Url(String),
    /// The asset bytes themselves.
    Bytes(Vec<u8>),
}

/// Maps a logical asset path that is not a local file onto its content.
pub trait AssetResolver {
    fn resolve(&self, path: &str) -> Option<ResolvedAsset>;
}

/// A resolver that knows no assets.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssets;

impl AssetResolver for NoAssets {
    fn resolve(&self, _path: &str) -> Option<ResolvedAsset> {
        None
    }
}

/// Resolves `container::path` references against registered root directories.
///
/// Lookup order for a path without an explicit `::`:
/// 1. the first segment as container, the rest as path (`media/logo.svg`)
/// 2. each fallback container (`assets`, `media`, `files`) with the full path
#[derive(Debug, Clone, Default)]
pub struct ContainerResolver {
    containers: HashMap<String, PathBuf>,
}

impl ContainerResolver {
    /// Containers tried, in order, when the path names none.
    pub const FALLBACK_CONTAINERS: [&'static str; 3] = ["assets", "media", "files"];

    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a container handle backed by a directory.
    pub fn with_container(mut self, handle: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        self.containers.insert(handle.into(), root.into());
        self
    }

    fn find(&self, container: &str, path: &str) -> Option<PathBuf> {
        let candidate = self.containers.get(container)?.join(path);
        candidate.is_file().then_some(candidate)
    }
}

impl AssetResolver for ContainerResolver {
    fn resolve(&self, path: &str) -> Option<ResolvedAsset> {
        if let Some((container, rest)) = path.split_once("::") {
            return self.find(container, rest).map(ResolvedAsset::File);
        }

        if let Some((container, rest)) = path.split_once('/') {
            if let Some(found) = self.find(container, rest) {
                return Some(ResolvedAsset::File(found));
            }
        }

        Self::FALLBACK_CONTAINERS
            .iter()
            .find_map(|container| self.find(container, path))
            .map(ResolvedAsset::File)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_fetch_refuses() {
        let err = NoFetch
            .fetch("https://example.com", SOURCE_FETCH_TIMEOUT)
            .unwrap_err();
        assert!(matches!(err, FetchError::Unsupported));
    }

    #[test]
    fn container_resolution_order() {
        let dir = tempfile::tempdir().unwrap();
        let media = dir.path().join("media");
        let assets = dir.path().join("assets");
        std::fs::create_dir_all(media.join("favicons")).unwrap();
        std::fs::create_dir_all(&assets).unwrap();
        std::fs::write(media.join("favicons/logo.svg"), "<svg/>").unwrap();
        std::fs::write(assets.join("logo.png"), [0u8]).unwrap();

        let resolver = ContainerResolver::new()
            .with_container("media", &media)
            .with_container("assets", &assets);

        assert_eq!(
            resolver.resolve("media::favicons/logo.svg"),
            Some(ResolvedAsset::File(media.join("favicons/logo.svg")))
        );
        assert_eq!(
            resolver.resolve("media/favicons/logo.svg"),
            Some(ResolvedAsset::File(media.join("favicons/logo.svg")))
        );
        assert_eq!(
            resolver.resolve("logo.png"),
            Some(ResolvedAsset::File(assets.join("logo.png")))
        );
        assert_eq!(resolver.resolve("missing.png"), None);
        assert_eq!(resolver.resolve("media::missing.svg"), None);
    }

    #[test]
    fn no_assets_resolves_nothing() {
        assert_eq!(NoAssets.resolve("media/logo.svg"), None);
    }
}
