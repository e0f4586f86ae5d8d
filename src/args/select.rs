//! `select-apps`: interactive selection, then an optional immediate prefill.

use lanprefill::app::{SelectionStore, run_selection_tui};
use lanprefill::config::PrefillConfig;
use lanprefill::error::PrefillError;
use lanprefill::logic::{SelectionSession, SessionOutcome, merge_catalog, resolve_app_ids};
use lanprefill::sources::CatalogSource;
use lanprefill::state::{PersistedSelection, PrefillTarget};

use super::Context;
use super::utils::prompt_user;

/// What: Run the selection screen and save what the user confirms.
///
/// Inputs:
/// - `ctx`: Directories and settings
/// - `no_color`: Render the list without colors
/// - `verbose`: Verbose progress lines if a prefill follows
///
/// Output:
/// - `Ok(())` when the session was cancelled or the selection saved.
///
/// # Errors
/// - `Catalog` or `EmptyCatalog` before the screen opens.
/// - `Terminal` when the screen cannot be drawn.
/// - `Persistence` when the selection could not be saved. The confirmed
///   selection is still offered for an immediate prefill first.
/// - Any error from the follow-up prefill run.
pub async fn handle_select_apps(
    ctx: &Context,
    no_color: bool,
    verbose: bool,
) -> Result<(), PrefillError> {
    let client = ctx.http_client()?;
    let catalog = ctx
        .catalog(&client)
        .list_owned_apps()
        .await
        .map_err(PrefillError::Catalog)?;
    let store = SelectionStore::new(ctx.paths.selection_file());
    let models = merge_catalog(&catalog, &store.load())?;

    let SessionOutcome::Confirmed(models) =
        run_selection_tui(SelectionSession::new(models), no_color).await?
    else {
        tracing::info!("[Select] Selection cancelled; saved selection unchanged");
        println!("Selection cancelled. Nothing was saved.");
        return Ok(());
    };

    let selection = PersistedSelection::from_models(&models);
    let saved = store.save(&selection);
    match &saved {
        Ok(()) => {
            tracing::info!(count = selection.len(), path = %store.path().display(), "[Select] Selection saved");
            println!("Selected {} apps to prefill!", selection.len());
        }
        Err(e) => {
            tracing::error!(error = %e, "[Select] Failed to save selection");
            eprintln!("Could not save your selection: {e}");
        }
    }

    if !selection.is_empty() && prompt_user("Run prefill now?") {
        let config = PrefillConfig::from_settings(&ctx.settings, false, verbose);
        let mut pipeline = ctx.pipeline(&client, config);
        let target = PrefillTarget::Selected {
            manual_ids: Vec::new(),
        };
        let ids = resolve_app_ids(&target, &catalog, &selection);
        pipeline.run(&catalog, &ids).await?;
    }

    saved.map_err(PrefillError::from)
}
