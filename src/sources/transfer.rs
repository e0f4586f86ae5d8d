use std::net::IpAddr;

use futures::stream::{self, StreamExt};
use reqwest::header::HOST;
use tokio::sync::OnceCell;

use crate::error::SourceError;
use crate::state::{ManifestUrl, QueuedChunk};

use super::ChunkTransfer;
use super::detect::resolve_cache_address;

/// Result of one chunk request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ChunkStatus {
    Done,
    /// Request failed after reaching the network stack.
    Failed,
    /// The cache refused or never accepted the connection.
    Unreachable,
}

/// Chunk downloader that routes every request through the LAN cache.
///
/// Requests go to the cache address with the CDN host in the `Host` header;
/// bodies are drained and discarded since only the cache needs the data.
#[derive(Debug)]
pub struct CacheTransfer {
    client: reqwest::Client,
    configured_cache: Option<String>,
    max_concurrency: usize,
    cache_ip: OnceCell<IpAddr>,
}

impl CacheTransfer {
    /// What: Build a transfer engine.
    ///
    /// Inputs:
    /// - `client`: Shared HTTP client
    /// - `configured_cache`: Explicit cache address from settings
    /// - `max_concurrency`: Chunk requests in flight
    pub fn new(
        client: reqwest::Client,
        configured_cache: Option<String>,
        max_concurrency: usize,
    ) -> Self {
        Self {
            client,
            configured_cache,
            max_concurrency: max_concurrency.max(1),
            cache_ip: OnceCell::new(),
        }
    }

    /// Resolve the cache address once; later calls reuse it.
    async fn cache_ip(&self, cdn_host: &str) -> Result<IpAddr, SourceError> {
        let ip = self
            .cache_ip
            .get_or_try_init(|| resolve_cache_address(cdn_host, self.configured_cache.as_deref()))
            .await?;
        Ok(*ip)
    }

    async fn fetch_chunk(&self, url: &str, host: &str) -> ChunkStatus {
        let resp = match self.client.get(url).header(HOST, host).send().await {
            Ok(r) => r,
            Err(e) if e.is_connect() => {
                tracing::debug!(url, error = %e, "[Transfer] Cache refused connection");
                return ChunkStatus::Unreachable;
            }
            Err(e) => {
                tracing::debug!(url, error = %e, "[Transfer] Chunk request failed");
                return ChunkStatus::Failed;
            }
        };
        let mut resp = match resp.error_for_status() {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(url, error = %e, "[Transfer] Chunk returned error status");
                return ChunkStatus::Failed;
            }
        };
        loop {
            match resp.chunk().await {
                Ok(Some(_)) => {}
                Ok(None) => return ChunkStatus::Done,
                Err(e) => {
                    tracing::debug!(url, error = %e, "[Transfer] Chunk body interrupted");
                    return ChunkStatus::Failed;
                }
            }
        }
    }

    /// Request every url concurrently and return those that did not finish.
    async fn run_pass(&self, urls: Vec<String>, host: &str) -> (Vec<String>, usize) {
        let results: Vec<(String, ChunkStatus)> = stream::iter(urls)
            .map(|url| async move {
                let status = self.fetch_chunk(&url, host).await;
                (url, status)
            })
            .buffer_unordered(self.max_concurrency)
            .collect()
            .await;
        let unreachable = results
            .iter()
            .filter(|(_, s)| *s == ChunkStatus::Unreachable)
            .count();
        let failed = results
            .into_iter()
            .filter(|(_, s)| *s != ChunkStatus::Done)
            .map(|(url, _)| url)
            .collect();
        (failed, unreachable)
    }
}

/// What: Build the request URL for a chunk served through the cache.
///
/// Inputs:
/// - `cache_ip`: Cache address
/// - `manifest`: Manifest URL whose directory holds the chunks
/// - `chunk`: Chunk to request
///
/// Output:
/// - `http://<cache>/<manifest dir>/<chunk path>`; IPv6 addresses are bracketed.
pub(crate) fn chunk_request_url(cache_ip: IpAddr, manifest: &ManifestUrl, chunk: &QueuedChunk) -> String {
    let dir = reqwest::Url::parse(manifest.base())
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| "/".to_string());
    let host = match cache_ip {
        IpAddr::V4(v4) => v4.to_string(),
        IpAddr::V6(v6) => format!("[{v6}]"),
    };
    format!("http://{host}{dir}{}", chunk.path.trim_start_matches('/'))
}

impl ChunkTransfer for CacheTransfer {
    /// What: Pull every chunk through the cache, retrying failures once.
    ///
    /// Output:
    /// - `Ok(true)` when all chunks completed; `Ok(false)` when some still failed.
    ///
    /// Details:
    /// - Cache detection failure, or every chunk being refused at connect time,
    ///   is reported as `CacheUnreachable`.
    async fn download_queued(
        &self,
        queue: &[QueuedChunk],
        urls: &[ManifestUrl],
    ) -> Result<bool, SourceError> {
        let Some((manifest, host)) = urls
            .iter()
            .find_map(|u| u.host().map(|h| (u, h)))
        else {
            return Err(SourceError::not_found("no CDN host in manifest URLs"));
        };
        if queue.is_empty() {
            return Ok(true);
        }
        let ip = self.cache_ip(&host).await?;
        let requests: Vec<String> = queue
            .iter()
            .map(|chunk| chunk_request_url(ip, manifest, chunk))
            .collect();
        let total = requests.len();
        tracing::debug!(chunks = total, cache = %ip, host = %host, "[Transfer] Starting chunk downloads");

        let (failed, unreachable) = self.run_pass(requests, &host).await;
        if unreachable == total {
            return Err(SourceError::cache_unreachable(format!(
                "cache at {ip} refused every connection"
            )));
        }
        if failed.is_empty() {
            return Ok(true);
        }
        tracing::warn!(failed = failed.len(), total, "[Transfer] Retrying failed chunks");
        let (still_failed, _) = self.run_pass(failed, &host).await;
        if !still_failed.is_empty() {
            tracing::warn!(failed = still_failed.len(), total, "[Transfer] Chunks failed after retry");
        }
        Ok(still_failed.is_empty())
    }
}
