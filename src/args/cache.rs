//! `clear-cache`: forget freshness records.

use lanprefill::app::FreshnessStore;
use lanprefill::error::PrefillError;

use super::Context;

/// What: Delete every freshness record so the next run re-downloads all apps.
///
/// Inputs:
/// - `ctx`: Directories and settings
///
/// Output:
/// - Prints how many records were cleared.
///
/// # Errors
/// - `Persistence` when the store file cannot be removed.
pub fn handle_clear_cache(ctx: &Context) -> Result<(), PrefillError> {
    tracing::info!("[Cache] Clear requested from CLI");
    let mut store = FreshnessStore::open(ctx.paths.freshness_file());
    let cleared = store.clear()?;
    if cleared > 0 {
        tracing::info!(cleared, "[Cache] Cleared freshness records");
        println!("Cleared {cleared} up-to-date records. The next prefill downloads every app again.");
    } else {
        tracing::info!("[Cache] No freshness records to clear");
        println!("Nothing to clear.");
    }
    Ok(())
}
