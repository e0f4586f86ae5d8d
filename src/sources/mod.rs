//! Collaborators the prefill core talks to: the owned catalog, manifests,
//! chunk transfer through the LAN cache and freshness tracking.
//!
//! Each concern is a trait so the core can be driven by in-memory fakes in
//! tests; the submodules provide the HTTP-backed implementations used by the
//! binary.

use std::future::Future;
use std::time::Duration;

use crate::error::SourceError;
use crate::state::{CatalogEntry, ManifestUrl, QueuedChunk};

mod catalog;
mod detect;
mod manifest;
mod transfer;

pub use catalog::HttpCatalog;
pub use detect::{is_lan_address, resolve_cache_address};
pub use manifest::{HttpManifestSource, parse_manifest, select_canonical_url};
pub use transfer::CacheTransfer;

/// Lists the apps the account owns.
pub trait CatalogSource {
    /// What: Fetch the owned catalog.
    ///
    /// Output:
    /// - Entries in catalog order, or a transient network/auth error.
    fn list_owned_apps(&self) -> impl Future<Output = Result<Vec<CatalogEntry>, SourceError>> + Send;
}

/// Remembers which apps are already fully present in the cache.
pub trait FreshnessTracker {
    /// Cheap, side-effect-free check whether `app` is current.
    fn is_up_to_date(&self, app: &CatalogEntry) -> bool;

    /// Record that `app` finished downloading at its current version.
    fn mark_up_to_date(&mut self, app: &CatalogEntry);
}

/// Finds and parses the manifest describing an app's chunks.
pub trait ManifestSource {
    /// Candidate manifest URLs for `app`.
    fn list_candidate_urls(
        &self,
        app: &CatalogEntry,
    ) -> impl Future<Output = Result<Vec<ManifestUrl>, SourceError>> + Send;

    /// What: Pick the manifest URL to download.
    ///
    /// # Errors
    /// - A `NotFound` error when `urls` is empty.
    fn select_canonical(&self, urls: &[ManifestUrl]) -> Result<ManifestUrl, SourceError> {
        select_canonical_url(urls)
    }

    /// Download the manifest at `url` and turn it into a chunk queue.
    fn fetch_and_parse(
        &self,
        app: &CatalogEntry,
        url: &ManifestUrl,
    ) -> impl Future<Output = Result<Vec<QueuedChunk>, SourceError>> + Send;
}

/// Pulls queued chunks through the cache.
pub trait ChunkTransfer {
    /// What: Download every chunk in `queue`.
    ///
    /// Inputs:
    /// - `queue`: Chunks to request
    /// - `urls`: All candidate manifest URLs (their hosts serve the chunks)
    ///
    /// Output:
    /// - `Ok(true)` when every chunk succeeded, `Ok(false)` when some failed,
    ///   `Err` for errors such as an unreachable cache.
    fn download_queued(
        &self,
        queue: &[QueuedChunk],
        urls: &[ManifestUrl],
    ) -> impl Future<Output = Result<bool, SourceError>> + Send;
}

/// What: Build the shared HTTP client for catalog, manifest and chunk requests.
///
/// Inputs:
/// - `timeout`: Per-request timeout
///
/// Output:
/// - Configured `reqwest::Client`, or a `Network` error when TLS setup fails.
///
/// # Errors
/// - Returns `SourceError` when the client cannot be constructed.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, SourceError> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(timeout)
        .user_agent(format!("lanprefill/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| SourceError::network(format!("failed to build HTTP client: {e}")))
}
