use std::collections::HashSet;
use std::time::Instant;

use crate::config::PrefillConfig;
use crate::error::{PrefillError, SourceError};
use crate::sources::{CatalogSource, ChunkTransfer, FreshnessTracker, ManifestSource};
use crate::state::{CatalogEntry, DownloadOutcome, PersistedSelection, PrefillTarget};
use crate::util::{format_bitrate, format_elapsed, format_size};

use super::summary::RunSummary;

/// Print a user-facing progress line prefixed with the local time.
fn say(line: &str) {
    println!("[{}] {line}", chrono::Local::now().format("%H:%M:%S"));
}

/// What: Work out which app ids a run should process, in order.
///
/// Inputs:
/// - `target`: All owned apps, or the saved selection plus manual ids
/// - `catalog`: Owned catalog
/// - `selection`: Saved selection
///
/// Output:
/// - Ids in processing order with duplicates removed (first occurrence wins).
#[must_use]
pub fn resolve_app_ids(
    target: &PrefillTarget,
    catalog: &[CatalogEntry],
    selection: &PersistedSelection,
) -> Vec<String> {
    let candidates: Vec<String> = match target {
        PrefillTarget::AllOwned => catalog.iter().map(|e| e.app_id.clone()).collect(),
        PrefillTarget::Selected { manual_ids } => selection
            .ids()
            .iter()
            .chain(manual_ids.iter())
            .cloned()
            .collect(),
    };
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

/// Walks apps one at a time: freshness check, manifest, transfer, classification.
///
/// Owns its collaborators for the duration of a run; no two apps are ever in
/// flight at once at this layer.
pub struct PrefillPipeline<M, F, T> {
    config: PrefillConfig,
    manifests: M,
    freshness: F,
    transfer: T,
}

impl<M, F, T> PrefillPipeline<M, F, T>
where
    M: ManifestSource + Send + Sync,
    F: FreshnessTracker + Send,
    T: ChunkTransfer + Send + Sync,
{
    /// Assemble a pipeline from its run options and collaborators.
    pub const fn new(config: PrefillConfig, manifests: M, freshness: F, transfer: T) -> Self {
        Self {
            config,
            manifests,
            freshness,
            transfer,
        }
    }

    /// Freshness tracker, for inspection after a run.
    pub const fn freshness(&self) -> &F {
        &self.freshness
    }

    /// What: Process `app_ids` strictly in order and summarize the run.
    ///
    /// Inputs:
    /// - `catalog`: Owned catalog used to look up each id
    /// - `app_ids`: Ids to process, already deduplicated
    ///
    /// Output:
    /// - `Ok(summary)` when the loop completes, whatever the per-app results.
    ///
    /// # Errors
    /// - [`PrefillError::CacheUnreachable`] as soon as any app reports that the
    ///   cache is unreachable; later apps are not attempted. The error carries
    ///   the summary so far, with the aborting app counted as failed.
    ///
    /// Details:
    /// - The summary is printed on both the normal and the aborting path.
    pub async fn run(
        &mut self,
        catalog: &[CatalogEntry],
        app_ids: &[String],
    ) -> Result<RunSummary, PrefillError> {
        let mut summary = RunSummary::default();
        tracing::info!(
            apps = app_ids.len(),
            force = self.config.force,
            "[Prefill] Starting run"
        );
        println!();

        for app_id in app_ids {
            let Some(app) = catalog.iter().find(|e| &e.app_id == app_id) else {
                tracing::warn!(app_id = %app_id, "[Prefill] App is not in the owned catalog");
                say(&format!("{app_id} is not owned by this account. Skipping app..."));
                summary.record(app_id, DownloadOutcome::Failed, 0);
                continue;
            };

            if !self.config.force && self.freshness.is_up_to_date(app) {
                tracing::debug!(app_id = %app.app_id, "[Prefill] Already up to date");
                summary.record(&app.app_id, DownloadOutcome::UpToDate, 0);
                continue;
            }

            match self.download_app(app).await {
                Ok((true, bytes)) => {
                    self.freshness.mark_up_to_date(app);
                    summary.record(&app.app_id, DownloadOutcome::Updated, bytes);
                }
                Ok((false, _)) => {
                    tracing::warn!(app_id = %app.app_id, "[Prefill] Transfer reported failure");
                    say(&format!("Download of {} did not complete. Skipping app...", app.title));
                    summary.record(&app.app_id, DownloadOutcome::Failed, 0);
                }
                Err(e) if e.is_fatal() => {
                    tracing::error!(app_id = %app.app_id, error = %e, "[Prefill] Cache unreachable; aborting run");
                    summary.record(&app.app_id, DownloadOutcome::Failed, 0);
                    say(&format!("Unable to reach the LAN cache: {e}"));
                    println!("{}", summary.render());
                    return Err(PrefillError::CacheUnreachable {
                        app_id: app.app_id.clone(),
                        message: e.message,
                        summary,
                    });
                }
                Err(e) => {
                    tracing::warn!(app_id = %app.app_id, kind = ?e.kind, error = %e, "[Prefill] Download failed");
                    say(&format!("Unexpected download error : {e}  Skipping app..."));
                    println!();
                    summary.record(&app.app_id, DownloadOutcome::Failed, 0);
                }
            }
        }

        say("Prefill complete!");
        println!("{}", summary.render());
        tracing::info!(
            updated = summary.updated_count,
            up_to_date = summary.up_to_date_count,
            failed = summary.failed_count,
            bytes = summary.total_bytes_transferred,
            "[Prefill] Run finished"
        );
        Ok(summary)
    }

    /// What: Fetch the manifest for `app` and push its chunks through the cache.
    ///
    /// Output:
    /// - `(success, requested_bytes)` from the transfer collaborator.
    ///
    /// # Errors
    /// - Any collaborator error, untouched; the caller decides whether it is fatal.
    async fn download_app(&self, app: &CatalogEntry) -> Result<(bool, u64), SourceError> {
        say(&format!("Starting {}", app.title));

        let urls = self.manifests.list_candidate_urls(app).await?;
        let manifest_url = self.manifests.select_canonical(&urls)?;
        let queue = self.manifests.fetch_and_parse(app, &manifest_url).await?;

        let timer = Instant::now();
        let total_bytes: u64 = queue.iter().map(|c| c.size_bytes).sum();
        if self.config.verbose {
            say(&format!(
                "Downloading {} from {} chunks",
                format_size(total_bytes),
                queue.len()
            ));
        } else {
            say(&format!("Downloading {}", format_size(total_bytes)));
        }
        tracing::debug!(
            app_id = %app.app_id,
            manifest = %manifest_url.uri,
            chunks = queue.len(),
            bytes = total_bytes,
            "[Prefill] Chunk queue ready"
        );

        let ok = self.transfer.download_queued(&queue, &urls).await?;
        if ok {
            let elapsed = timer.elapsed();
            say(&format!(
                "Finished in {} - {}",
                format_elapsed(elapsed),
                format_bitrate(total_bytes, elapsed)
            ));
            println!();
        }
        Ok((ok, total_bytes))
    }
}

/// What: List the catalog, resolve the ids for `target` and run the pipeline.
///
/// Inputs:
/// - `catalog_source`: Owned catalog collaborator
/// - `target`: Which apps to process
/// - `selection`: Saved selection (used unless `target` is `AllOwned`)
/// - `pipeline`: Configured pipeline
///
/// Output:
/// - Run summary.
///
/// # Errors
/// - `Catalog` when listing fails, `EmptyCatalog` when nothing is owned; the
///   pipeline never starts in either case.
/// - Any error returned by [`PrefillPipeline::run`].
pub async fn prefill_owned_apps<C, M, F, T>(
    catalog_source: &C,
    target: &PrefillTarget,
    selection: &PersistedSelection,
    pipeline: &mut PrefillPipeline<M, F, T>,
) -> Result<RunSummary, PrefillError>
where
    C: CatalogSource + Sync,
    M: ManifestSource + Send + Sync,
    F: FreshnessTracker + Send,
    T: ChunkTransfer + Send + Sync,
{
    let catalog = catalog_source
        .list_owned_apps()
        .await
        .map_err(PrefillError::Catalog)?;
    if catalog.is_empty() {
        return Err(PrefillError::EmptyCatalog);
    }
    let ids = resolve_app_ids(target, &catalog, selection);
    if ids.is_empty() {
        tracing::info!("[Prefill] No apps to prefill");
        say("No apps selected. Run select-apps first, or pass --all / --app.");
    }
    pipeline.run(&catalog, &ids).await
}
