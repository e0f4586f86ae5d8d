//! `status`: show the saved selection and which apps are up to date.

use lanprefill::app::{FreshnessStore, SelectionStore};
use lanprefill::error::PrefillError;
use lanprefill::sources::{CatalogSource, FreshnessTracker};
use lanprefill::state::{CatalogEntry, PersistedSelection};

use super::Context;

/// What: Render one status line per saved app.
///
/// Inputs:
/// - `selection`: Saved selection
/// - `catalog`: Owned catalog (titles and current versions)
/// - `freshness`: Freshness tracker
///
/// Output:
/// - Lines of the form `  <state>  <id>  <title>`.
///
/// Details:
/// - Ids that are no longer owned show as `missing`.
#[must_use]
pub fn status_lines<F: FreshnessTracker>(
    selection: &PersistedSelection,
    catalog: &[CatalogEntry],
    freshness: &F,
) -> Vec<String> {
    selection
        .ids()
        .iter()
        .map(|id| match catalog.iter().find(|e| &e.app_id == id) {
            Some(entry) if freshness.is_up_to_date(entry) => {
                format!("  up-to-date  {id}  {}", entry.title)
            }
            Some(entry) => format!("  pending     {id}  {}", entry.title),
            None => format!("  missing     {id}"),
        })
        .collect()
}

/// What: Print the saved selection joined with catalog titles and freshness.
///
/// # Errors
/// - `Setup` or `Catalog` when the catalog cannot be listed.
pub async fn handle_status(ctx: &Context) -> Result<(), PrefillError> {
    let selection = SelectionStore::new(ctx.paths.selection_file()).load();
    if selection.is_empty() {
        println!("No apps selected. Run `lanprefill select-apps` to choose some.");
        return Ok(());
    }
    let client = ctx.http_client()?;
    let catalog = ctx
        .catalog(&client)
        .list_owned_apps()
        .await
        .map_err(PrefillError::Catalog)?;
    let freshness = FreshnessStore::open(ctx.paths.freshness_file());

    println!("{} apps selected:", selection.len());
    for line in status_lines(&selection, &catalog, &freshness) {
        println!("{line}");
    }
    Ok(())
}
