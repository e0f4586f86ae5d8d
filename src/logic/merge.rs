use crate::error::PrefillError;
use crate::state::{CatalogEntry, PersistedSelection, SelectableAppModel};

/// What: Build the selectable list from the owned catalog and the saved selection.
///
/// Inputs:
/// - `catalog`: Owned apps in catalog order, ids unique
/// - `selection`: Previously persisted selection
///
/// Output:
/// - One model per catalog entry, in catalog order, selected iff its id is in `selection`.
///
/// # Errors
/// - [`PrefillError::EmptyCatalog`] when `catalog` is empty.
///
/// Details:
/// - Saved ids that are no longer owned are simply not shown.
pub fn merge_catalog(
    catalog: &[CatalogEntry],
    selection: &PersistedSelection,
) -> Result<Vec<SelectableAppModel>, PrefillError> {
    if catalog.is_empty() {
        tracing::warn!("[Select] Owned catalog is empty");
        return Err(PrefillError::EmptyCatalog);
    }
    let models: Vec<SelectableAppModel> = catalog
        .iter()
        .map(|entry| SelectableAppModel {
            app_id: entry.app_id.clone(),
            title: entry.title.clone(),
            is_selected: selection.contains(&entry.app_id),
        })
        .collect();
    tracing::debug!(
        owned = models.len(),
        preselected = models.iter().filter(|m| m.is_selected).count(),
        "[Select] Merged catalog with saved selection"
    );
    Ok(models)
}
