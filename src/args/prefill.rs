//! `prefill`: run the pipeline without the selection screen.

use lanprefill::app::SelectionStore;
use lanprefill::config::PrefillConfig;
use lanprefill::error::PrefillError;
use lanprefill::logic::prefill_owned_apps;
use lanprefill::state::PrefillTarget;
use lanprefill::util::parse_app_ids;

use super::Context;

/// What: Prefill the saved selection plus `apps`, or every owned app.
///
/// Inputs:
/// - `ctx`: Directories and settings
/// - `all`: Ignore the selection and walk the whole catalog
/// - `force`: Re-download apps already up to date
/// - `verbose`: Print chunk counts
/// - `apps`: Raw `--app` values (comma- or space-separated)
///
/// # Errors
/// - Startup errors (`Setup`, `Catalog`, `EmptyCatalog`) and the fatal
///   `CacheUnreachable` abort. Per-app failures only show in the summary.
pub async fn handle_prefill(
    ctx: &Context,
    all: bool,
    force: bool,
    verbose: bool,
    apps: &[String],
) -> Result<(), PrefillError> {
    let target = if all {
        PrefillTarget::AllOwned
    } else {
        PrefillTarget::Selected {
            manual_ids: parse_app_ids(apps),
        }
    };
    let selection = SelectionStore::new(ctx.paths.selection_file()).load();
    tracing::info!(?target, saved = selection.len(), "[Prefill] Command started");

    let client = ctx.http_client()?;
    let config = PrefillConfig::from_settings(&ctx.settings, force, verbose);
    let mut pipeline = ctx.pipeline(&client, config);
    prefill_owned_apps(&ctx.catalog(&client), &target, &selection, &mut pipeline).await?;
    Ok(())
}
