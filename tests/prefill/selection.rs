//! Selection workflow: merge, interactive session, save, reload.

use lanprefill::app::SelectionStore;
use lanprefill::logic::{SelectionEvent, SelectionSession, SessionOutcome, merge_catalog};
use lanprefill::state::{CatalogEntry, PersistedSelection};
use tokio::sync::mpsc;

fn catalog() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new("A1", "Game A"),
        CatalogEntry::new("A2", "Game B"),
    ]
}

#[tokio::test]
/// What: Toggling both apps and confirming persists both ids.
///
/// Inputs:
/// - Catalog `[A1, A2]`, no saved selection
/// - Events `Toggle(0)`, `Toggle(1)`, `Confirm`
///
/// Output:
/// - Saved selection `{A1, A2}`; the next merge shows both selected.
async fn confirmed_session_persists_selection() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SelectionStore::new(dir.path().join("state").join("selected_apps.json"));
    let models = merge_catalog(&catalog(), &store.load()).expect("non-empty catalog");
    assert!(models.iter().all(|m| !m.is_selected));

    let (tx, mut rx) = mpsc::unbounded_channel();
    for ev in [
        SelectionEvent::Toggle(0),
        SelectionEvent::Toggle(1),
        SelectionEvent::Confirm,
    ] {
        tx.send(ev).expect("send");
    }
    let SessionOutcome::Confirmed(models) = SelectionSession::new(models).run(&mut rx).await else {
        panic!("session should confirm");
    };
    store
        .save(&PersistedSelection::from_models(&models))
        .expect("save");

    let reloaded = store.load();
    assert_eq!(reloaded, PersistedSelection::from_ids(["A1", "A2"]));
    let remerged = merge_catalog(&catalog(), &reloaded).expect("merge");
    assert!(remerged.iter().all(|m| m.is_selected));
}

#[tokio::test]
/// What: A cancelled session leaves the saved selection untouched.
///
/// Inputs:
/// - Saved selection `{A2}`, events `Toggle(0)`, `Cancel`
///
/// Output:
/// - Session cancelled; the file still holds `{A2}`.
async fn cancelled_session_saves_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SelectionStore::new(dir.path().join("selected_apps.json"));
    store
        .save(&PersistedSelection::from_ids(["A2"]))
        .expect("seed");

    let models = merge_catalog(&catalog(), &store.load()).expect("merge");
    let (tx, mut rx) = mpsc::unbounded_channel();
    tx.send(SelectionEvent::Toggle(0)).expect("send");
    tx.send(SelectionEvent::Cancel).expect("send");
    let outcome = SelectionSession::new(models).run(&mut rx).await;

    assert_eq!(outcome, SessionOutcome::Cancelled);
    assert_eq!(store.load(), PersistedSelection::from_ids(["A2"]));
}

#[tokio::test]
/// What: Closing the event channel mid-session counts as cancel.
async fn closed_channel_cancels() {
    let models = merge_catalog(&catalog(), &PersistedSelection::default()).expect("merge");
    let (tx, mut rx) = mpsc::unbounded_channel();
    tx.send(SelectionEvent::Toggle(1)).expect("send");
    drop(tx);
    let outcome = SelectionSession::new(models).run(&mut rx).await;
    assert_eq!(outcome, SessionOutcome::Cancelled);
}

#[test]
/// What: Saved ids no longer in the catalog do not appear in the list.
fn stale_saved_ids_are_not_shown() {
    let saved = PersistedSelection::from_ids(["GONE", "A2"]);
    let models = merge_catalog(&catalog(), &saved).expect("merge");
    let shown: Vec<(&str, bool)> = models
        .iter()
        .map(|m| (m.app_id.as_str(), m.is_selected))
        .collect();
    assert_eq!(shown, [("A1", false), ("A2", true)]);
}
