//! In-memory collaborators for driving the pipeline without a network.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use lanprefill::error::SourceError;
use lanprefill::sources::{CatalogSource, ChunkTransfer, FreshnessTracker, ManifestSource};
use lanprefill::state::{CatalogEntry, ManifestUrl, QueuedChunk};

/// What: Build a catalog entry with a build version.
pub fn entry(id: &str, title: &str, version: &str) -> CatalogEntry {
    CatalogEntry {
        app_id: id.into(),
        title: title.into(),
        build_version: Some(version.into()),
    }
}

/// Catalog returning a fixed list, or a fixed error.
pub struct FakeCatalog(pub Result<Vec<CatalogEntry>, SourceError>);

impl CatalogSource for FakeCatalog {
    async fn list_owned_apps(&self) -> Result<Vec<CatalogEntry>, SourceError> {
        self.0.clone()
    }
}

/// Manifest source serving fixed chunk lists per app.
#[derive(Default)]
pub struct FakeManifests {
    /// Chunk sizes per app id.
    pub chunks: HashMap<String, Vec<u64>>,
    /// Apps whose manifest fetch fails with a network error.
    pub failing: HashSet<String>,
}

impl FakeManifests {
    /// Serve `sizes` as the chunk list of `app_id`.
    pub fn with_app(mut self, app_id: &str, sizes: &[u64]) -> Self {
        self.chunks.insert(app_id.into(), sizes.to_vec());
        self
    }

    /// Make the manifest fetch of `app_id` fail.
    pub fn fail_manifest(mut self, app_id: &str) -> Self {
        self.failing.insert(app_id.into());
        self
    }
}

impl ManifestSource for FakeManifests {
    async fn list_candidate_urls(&self, app: &CatalogEntry) -> Result<Vec<ManifestUrl>, SourceError> {
        Ok(vec![
            ManifestUrl::new(format!("http://cdn.test/{}/manifest?sig=x", app.app_id)),
            ManifestUrl::new(format!("http://cdn.test/{}/manifest", app.app_id)),
        ])
    }

    async fn fetch_and_parse(
        &self,
        app: &CatalogEntry,
        url: &ManifestUrl,
    ) -> Result<Vec<QueuedChunk>, SourceError> {
        assert!(!url.has_query(), "pipeline must use the canonical url");
        if self.failing.contains(&app.app_id) {
            return Err(SourceError::network("manifest request timed out"));
        }
        let sizes = self.chunks.get(&app.app_id).cloned().unwrap_or_default();
        Ok(sizes
            .into_iter()
            .enumerate()
            .map(|(i, size_bytes)| QueuedChunk {
                path: format!("{}/chunk{i}", app.app_id),
                size_bytes,
            })
            .collect())
    }
}

/// Transfer that records attempts and fails on demand.
#[derive(Default)]
pub struct FakeTransfer {
    /// App ids whose transfer reports the cache as unreachable.
    pub unreachable: HashSet<String>,
    /// App ids whose transfer reports partial failure.
    pub incomplete: HashSet<String>,
    /// App ids in the order transfers were attempted; shared so tests can
    /// inspect it after handing the fake to a pipeline.
    pub attempts: Arc<Mutex<Vec<String>>>,
}

impl FakeTransfer {
    /// Report the cache as unreachable when `app_id` is transferred.
    pub fn unreachable_at(mut self, app_id: &str) -> Self {
        self.unreachable.insert(app_id.into());
        self
    }

    /// Report `Ok(false)` for `app_id`.
    pub fn incomplete_at(mut self, app_id: &str) -> Self {
        self.incomplete.insert(app_id.into());
        self
    }

    /// Handle on the attempt log.
    pub fn attempt_log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.attempts)
    }
}

impl ChunkTransfer for FakeTransfer {
    async fn download_queued(
        &self,
        _queue: &[QueuedChunk],
        urls: &[ManifestUrl],
    ) -> Result<bool, SourceError> {
        let app_id = urls
            .first()
            .and_then(|u| u.uri.split('/').nth(3))
            .unwrap_or_default()
            .to_string();
        self.attempts.lock().expect("attempts lock").push(app_id.clone());
        if self.unreachable.contains(&app_id) {
            return Err(SourceError::cache_unreachable("connection refused by 10.0.0.5"));
        }
        Ok(!self.incomplete.contains(&app_id))
    }
}

/// Freshness tracker held in memory.
#[derive(Default)]
pub struct MemoryFreshness {
    /// Recorded versions by app id.
    pub versions: HashMap<String, Option<String>>,
}

impl FreshnessTracker for MemoryFreshness {
    fn is_up_to_date(&self, app: &CatalogEntry) -> bool {
        self.versions.get(&app.app_id) == Some(&app.build_version)
    }

    fn mark_up_to_date(&mut self, app: &CatalogEntry) {
        self.versions
            .insert(app.app_id.clone(), app.build_version.clone());
    }
}
