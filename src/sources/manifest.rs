use serde::Deserialize;

use crate::error::SourceError;
use crate::state::{CatalogEntry, ManifestUrl, QueuedChunk};

use super::ManifestSource;

/// What: Choose the manifest URL to download from the candidates.
///
/// Inputs:
/// - `urls`: Candidate manifest URLs in service order
///
/// Output:
/// - The first URL without a query string (an unsigned CDN URL the cache can
///   key on), otherwise the first candidate.
///
/// # Errors
/// - `NotFound` when there are no candidates.
pub fn select_canonical_url(urls: &[ManifestUrl]) -> Result<ManifestUrl, SourceError> {
    urls.iter()
        .find(|u| !u.has_query())
        .or_else(|| urls.first())
        .cloned()
        .ok_or_else(|| SourceError::not_found("no manifest URLs available"))
}

#[derive(Deserialize)]
struct ManifestDocument {
    #[serde(default)]
    chunks: Vec<QueuedChunk>,
}

/// What: Parse a manifest body into its chunk queue.
///
/// Inputs:
/// - `body`: Raw manifest bytes
///
/// Output:
/// - Chunks in manifest order.
///
/// # Errors
/// - `Parse` when the body is not a manifest document.
pub fn parse_manifest(body: &[u8]) -> Result<Vec<QueuedChunk>, SourceError> {
    serde_json::from_slice::<ManifestDocument>(body)
        .map(|doc| doc.chunks)
        .map_err(|e| SourceError::parse(format!("invalid manifest: {e}")))
}

/// Manifest lookups against the catalog service and the CDN.
#[derive(Clone, Debug)]
pub struct HttpManifestSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpManifestSource {
    /// Source rooted at the catalog service `base_url`.
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl ManifestSource for HttpManifestSource {
    async fn list_candidate_urls(&self, app: &CatalogEntry) -> Result<Vec<ManifestUrl>, SourceError> {
        let url = format!("{}/apps/{}/manifests", self.base_url, app.app_id);
        let urls: Vec<ManifestUrl> = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        tracing::debug!(app_id = %app.app_id, count = urls.len(), "[Manifest] Candidate URLs listed");
        Ok(urls)
    }

    async fn fetch_and_parse(
        &self,
        app: &CatalogEntry,
        url: &ManifestUrl,
    ) -> Result<Vec<QueuedChunk>, SourceError> {
        let body = self
            .client
            .get(&url.uri)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        tracing::debug!(
            app_id = %app.app_id,
            bytes = body.len(),
            "[Manifest] Downloaded manifest"
        );
        parse_manifest(&body)
    }
}
