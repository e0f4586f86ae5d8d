use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PersistError;
use crate::sources::FreshnessTracker;
use crate::state::CatalogEntry;

use super::persist::write_json_atomic;

/// Version recorded for apps whose catalog entry carries no build version.
const UNVERSIONED: &str = "";

/// File-backed record of the build version each app was last prefilled at.
///
/// Every successful download is flushed immediately, so an interrupted run
/// only ever loses the app that was in flight.
#[derive(Clone, Debug)]
pub struct FreshnessStore {
    path: PathBuf,
    versions: BTreeMap<String, String>,
}

impl FreshnessStore {
    /// What: Open the store at `path`.
    ///
    /// Output:
    /// - Store with the recorded versions; empty when the file is missing or unreadable.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let versions = match fs::read_to_string(&path) {
            Ok(body) => serde_json::from_str(&body).unwrap_or_else(|e| {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "[Freshness] Store is malformed; treating every app as stale"
                );
                BTreeMap::new()
            }),
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "[Freshness] Failed to read store; treating every app as stale"
                    );
                }
                BTreeMap::new()
            }
        };
        Self { path, versions }
    }

    /// Backing file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of apps with a recorded version.
    #[must_use]
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// True when no app has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// What: Forget every recorded app and delete the backing file.
    ///
    /// Output:
    /// - Number of records that were cleared.
    ///
    /// # Errors
    /// - `PersistError::Io` when the file exists but cannot be removed.
    pub fn clear(&mut self) -> Result<usize, PersistError> {
        let cleared = self.versions.len();
        self.versions.clear();
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(PersistError::Io {
                    path: self.path.display().to_string(),
                    source,
                });
            }
        }
        tracing::info!(path = %self.path.display(), cleared, "[Freshness] Store cleared");
        Ok(cleared)
    }
}

impl FreshnessTracker for FreshnessStore {
    fn is_up_to_date(&self, app: &CatalogEntry) -> bool {
        let current = app.build_version.as_deref().unwrap_or(UNVERSIONED);
        self.versions
            .get(&app.app_id)
            .is_some_and(|recorded| recorded == current)
    }

    /// Records the app and flushes; a failed flush is logged and the in-memory record kept.
    fn mark_up_to_date(&mut self, app: &CatalogEntry) {
        let version = app
            .build_version
            .clone()
            .unwrap_or_else(|| UNVERSIONED.to_string());
        self.versions.insert(app.app_id.clone(), version);
        if let Err(e) = write_json_atomic(&self.path, &self.versions) {
            tracing::warn!(
                app_id = %app.app_id,
                error = %e,
                "[Freshness] Failed to persist up-to-date record"
            );
        } else {
            tracing::debug!(app_id = %app.app_id, "[Freshness] Marked up to date");
        }
    }
}
