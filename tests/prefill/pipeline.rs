//! End-to-end behavior of the prefill pipeline over fake collaborators.

use lanprefill::app::FreshnessStore;
use lanprefill::config::PrefillConfig;
use lanprefill::error::{PrefillError, SourceError};
use lanprefill::logic::{PrefillPipeline, prefill_owned_apps};
use lanprefill::sources::FreshnessTracker;
use lanprefill::state::{DownloadOutcome, PersistedSelection, PrefillTarget};

use super::common::{FakeCatalog, FakeManifests, FakeTransfer, MemoryFreshness, entry};

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

fn three_apps() -> Vec<lanprefill::state::CatalogEntry> {
    vec![
        entry("A1", "Game A", "1"),
        entry("A2", "Game B", "7"),
        entry("A3", "Game C", "3"),
    ]
}

fn manifests() -> FakeManifests {
    FakeManifests::default()
        .with_app("A1", &[100, 50])
        .with_app("A2", &[200])
        .with_app("A3", &[10, 10, 10])
}

#[tokio::test]
/// What: A second run over unchanged apps downloads nothing.
///
/// Inputs:
/// - Two runs of the same pipeline over `[A1, A2]`
///
/// Output:
/// - First run: 2 updated, 350 bytes. Second run: 2 up to date, 0 bytes,
///   and no further transfers.
async fn second_run_is_all_up_to_date() {
    let catalog = three_apps();
    let mut pipeline = PrefillPipeline::new(
        PrefillConfig::default(),
        manifests(),
        MemoryFreshness::default(),
        FakeTransfer::default(),
    );

    let first = pipeline.run(&catalog, &ids(&["A1", "A2"])).await.expect("first run");
    assert_eq!(first.updated_count, 2);
    assert_eq!(first.total_bytes_transferred, 350);

    let second = pipeline.run(&catalog, &ids(&["A1", "A2"])).await.expect("second run");
    assert_eq!(second.up_to_date_count, 2);
    assert_eq!(second.updated_count, 0);
    assert_eq!(second.failed_count, 0);
    assert_eq!(second.total_bytes_transferred, 0);
}

#[tokio::test]
/// What: Freshness written to disk survives into a fresh pipeline.
///
/// Inputs:
/// - Run with a `FreshnessStore` in a temp dir, reopen the store, run again
///
/// Output:
/// - Second run reports the app as up to date; a new build version makes it
///   stale again.
async fn file_backed_freshness_survives_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store_path = dir.path().join("state").join("downloaded_versions.json");
    let mut catalog = vec![entry("A1", "Game A", "1")];

    let mut first = PrefillPipeline::new(
        PrefillConfig::default(),
        manifests(),
        FreshnessStore::open(&store_path),
        FakeTransfer::default(),
    );
    first.run(&catalog, &ids(&["A1"])).await.expect("first run");

    let reopened = FreshnessStore::open(&store_path);
    assert!(reopened.is_up_to_date(&catalog[0]));
    let mut second = PrefillPipeline::new(
        PrefillConfig::default(),
        manifests(),
        reopened,
        FakeTransfer::default(),
    );
    let summary = second.run(&catalog, &ids(&["A1"])).await.expect("second run");
    assert_eq!(summary.outcome_of("A1"), Some(DownloadOutcome::UpToDate));

    catalog[0].build_version = Some("2".into());
    let summary = second.run(&catalog, &ids(&["A1"])).await.expect("third run");
    assert_eq!(summary.outcome_of("A1"), Some(DownloadOutcome::Updated));
}

#[tokio::test]
/// What: One app's manifest failure does not stop the others.
///
/// Inputs:
/// - Apps `[A1, A2, A3]`, A2's manifest fetch fails
///
/// Output:
/// - failed 1, updated 2, all three recorded in order, A2 not marked fresh.
async fn per_app_failure_is_isolated() {
    let catalog = three_apps();
    let mut pipeline = PrefillPipeline::new(
        PrefillConfig::default(),
        manifests().fail_manifest("A2"),
        MemoryFreshness::default(),
        FakeTransfer::default(),
    );

    let summary = pipeline
        .run(&catalog, &ids(&["A1", "A2", "A3"]))
        .await
        .expect("run completes");
    assert_eq!(summary.failed_count, 1);
    assert_eq!(summary.updated_count, 2);
    assert_eq!(summary.total_bytes_transferred, 180);
    assert_eq!(
        summary.apps,
        [
            ("A1".to_string(), DownloadOutcome::Updated),
            ("A2".to_string(), DownloadOutcome::Failed),
            ("A3".to_string(), DownloadOutcome::Updated),
        ]
    );
    assert!(!pipeline.freshness().is_up_to_date(&catalog[1]));
}

#[tokio::test]
/// What: An incomplete transfer counts as failed and leaves the app stale.
async fn incomplete_transfer_is_failed() {
    let catalog = three_apps();
    let mut pipeline = PrefillPipeline::new(
        PrefillConfig::default(),
        manifests(),
        MemoryFreshness::default(),
        FakeTransfer::default().incomplete_at("A1"),
    );
    let summary = pipeline.run(&catalog, &ids(&["A1"])).await.expect("run");
    assert_eq!(summary.failed_count, 1);
    assert_eq!(summary.total_bytes_transferred, 0);
    assert!(!pipeline.freshness().is_up_to_date(&catalog[0]));
}

#[tokio::test]
/// What: An unreachable cache aborts the run before later apps are attempted.
///
/// Inputs:
/// - Apps `[A1, A2, A3]`, the cache is unreachable while transferring A2
///
/// Output:
/// - `CacheUnreachable` with exit status 3; its summary covers A1 (updated)
///   and A2 (failed) only; A3 is never attempted.
async fn unreachable_cache_aborts_run() {
    let catalog = three_apps();
    let transfer = FakeTransfer::default().unreachable_at("A2");
    let attempts = transfer.attempt_log();
    let mut pipeline = PrefillPipeline::new(
        PrefillConfig::default(),
        manifests(),
        MemoryFreshness::default(),
        transfer,
    );

    let err = pipeline
        .run(&catalog, &ids(&["A1", "A2", "A3"]))
        .await
        .expect_err("run must abort");
    assert_eq!(err.exit_code(), 3);
    let PrefillError::CacheUnreachable { app_id, summary, .. } = err else {
        panic!("expected a cache-unreachable abort");
    };
    assert_eq!(app_id, "A2");
    assert_eq!(summary.processed(), 2);
    assert_eq!(summary.updated_count, 1);
    assert_eq!(summary.failed_count, 1);
    assert_eq!(summary.outcome_of("A3"), None);
    assert_eq!(*attempts.lock().expect("lock"), ["A1", "A2"]);
}

#[tokio::test]
/// What: `force` re-downloads apps the tracker considers current.
async fn force_ignores_freshness() {
    let catalog = three_apps();
    let mut freshness = MemoryFreshness::default();
    freshness.mark_up_to_date(&catalog[0]);
    let mut pipeline = PrefillPipeline::new(
        PrefillConfig {
            force: true,
            verbose: true,
        },
        manifests(),
        freshness,
        FakeTransfer::default(),
    );
    let summary = pipeline.run(&catalog, &ids(&["A1"])).await.expect("run");
    assert_eq!(summary.outcome_of("A1"), Some(DownloadOutcome::Updated));
    assert_eq!(summary.total_bytes_transferred, 150);
}

#[tokio::test]
/// What: Ids missing from the catalog are failed without touching collaborators.
async fn unknown_id_is_failed() {
    let catalog = three_apps();
    let mut pipeline = PrefillPipeline::new(
        PrefillConfig::default(),
        manifests(),
        MemoryFreshness::default(),
        FakeTransfer::default(),
    );
    let summary = pipeline.run(&catalog, &ids(&["NOPE", "A3"])).await.expect("run");
    assert_eq!(summary.outcome_of("NOPE"), Some(DownloadOutcome::Failed));
    assert_eq!(summary.outcome_of("A3"), Some(DownloadOutcome::Updated));
}

#[tokio::test]
/// What: Startup errors stop the command before the pipeline runs.
///
/// Inputs:
/// - An empty catalog, then a catalog that fails to list
///
/// Output:
/// - Exit status 2 for the empty catalog, 1 for the listing failure, and no
///   transfer attempts in either case.
async fn startup_errors_never_start_pipeline() {
    let selection = PersistedSelection::from_ids(["A1"]);
    let target = PrefillTarget::Selected {
        manual_ids: Vec::new(),
    };
    let transfer = FakeTransfer::default();
    let attempts = transfer.attempt_log();
    let mut pipeline = PrefillPipeline::new(
        PrefillConfig::default(),
        manifests(),
        MemoryFreshness::default(),
        transfer,
    );

    let empty = prefill_owned_apps(&FakeCatalog(Ok(Vec::new())), &target, &selection, &mut pipeline)
        .await
        .expect_err("empty catalog");
    assert!(matches!(empty, PrefillError::EmptyCatalog));
    assert_eq!(empty.exit_code(), 2);

    let offline = FakeCatalog(Err(SourceError::network("auth expired")));
    let err = prefill_owned_apps(&offline, &target, &selection, &mut pipeline)
        .await
        .expect_err("catalog failure");
    assert!(matches!(err, PrefillError::Catalog(_)));
    assert_eq!(err.exit_code(), 1);
    assert!(attempts.lock().expect("lock").is_empty());
}

#[tokio::test]
/// What: `AllOwned` walks the catalog; `Selected` walks selection plus manual ids.
async fn targets_pick_apps_in_order() {
    let catalog = FakeCatalog(Ok(three_apps()));
    let selection = PersistedSelection::from_ids(["A3"]);
    let mut pipeline = PrefillPipeline::new(
        PrefillConfig::default(),
        manifests(),
        MemoryFreshness::default(),
        FakeTransfer::default(),
    );

    let all = prefill_owned_apps(&catalog, &PrefillTarget::AllOwned, &selection, &mut pipeline)
        .await
        .expect("all owned");
    assert_eq!(all.updated_count, 3);

    let mut pipeline = PrefillPipeline::new(
        PrefillConfig::default(),
        manifests(),
        MemoryFreshness::default(),
        FakeTransfer::default(),
    );
    let target = PrefillTarget::Selected {
        manual_ids: vec!["A1".into(), "A3".into()],
    };
    let picked = prefill_owned_apps(&catalog, &target, &selection, &mut pipeline)
        .await
        .expect("selected");
    let order: Vec<&str> = picked.apps.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(order, ["A3", "A1"]);
}
