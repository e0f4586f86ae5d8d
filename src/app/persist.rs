use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::PersistError;
use crate::state::PersistedSelection;

/// What: Write `value` as JSON to `path` without ever exposing a partial file.
///
/// Inputs:
/// - `path`: Final destination
/// - `value`: Serializable payload
///
/// Output:
/// - `Ok(())` once the new content is in place.
///
/// # Errors
/// - `PersistError::Json` when serialization fails.
/// - `PersistError::Io` when the parent directory, temp file or rename fails.
///
/// Details:
/// - Writes to a sibling `.tmp` file and renames it over the destination, so a
///   reader sees either the old or the new content.
pub(crate) fn write_json_atomic<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> Result<(), PersistError> {
    let display = path.display().to_string();
    let body = serde_json::to_string_pretty(value).map_err(|source| PersistError::Json {
        path: display.clone(),
        source,
    })?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| PersistError::Io {
            path: display.clone(),
            source,
        })?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, body.as_bytes()).map_err(|source| PersistError::Io {
        path: tmp.display().to_string(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(|source| {
        let _ = fs::remove_file(&tmp);
        PersistError::Io {
            path: display,
            source,
        }
    })?;
    tracing::trace!(path = %path.display(), bytes = body.len(), "[Persist] File replaced");
    Ok(())
}

/// Durable storage of the user's app selection as a JSON array of ids.
///
/// The selection workflow is the only writer.
#[derive(Clone, Debug)]
pub struct SelectionStore {
    path: PathBuf,
}

impl SelectionStore {
    /// Store backed by the JSON file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// What: Read the saved selection.
    ///
    /// Output:
    /// - Saved ids with duplicates removed; empty when nothing was saved.
    ///
    /// Details:
    /// - Never fails: a missing file is an empty selection, and an unreadable
    ///   or malformed file is logged and also treated as empty.
    #[must_use]
    pub fn load(&self) -> PersistedSelection {
        let body = match fs::read_to_string(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "[Persist] No saved selection yet");
                return PersistedSelection::default();
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "[Persist] Failed to read saved selection; starting empty"
                );
                return PersistedSelection::default();
            }
        };
        match serde_json::from_str::<Vec<String>>(&body) {
            Ok(ids) => {
                let sel = PersistedSelection::from_ids(ids);
                tracing::debug!(
                    path = %self.path.display(),
                    count = sel.len(),
                    "[Persist] Loaded saved selection"
                );
                sel
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "[Persist] Saved selection is malformed; starting empty"
                );
                PersistedSelection::default()
            }
        }
    }

    /// What: Replace the saved selection.
    ///
    /// Inputs:
    /// - `selection`: Ids to save (already unique by construction)
    ///
    /// Output:
    /// - `Ok(())` when the file now holds exactly `selection`.
    ///
    /// # Errors
    /// - `PersistError` when the file cannot be written; the previous content is left intact.
    pub fn save(&self, selection: &PersistedSelection) -> Result<(), PersistError> {
        match write_json_atomic(&self.path, selection.ids()) {
            Ok(()) => {
                tracing::info!(
                    path = %self.path.display(),
                    count = selection.len(),
                    "[Persist] Selection saved"
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "[Persist] Failed to save selection"
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, SelectionStore) {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = SelectionStore::new(tmp.path().join("state").join("selected_apps.json"));
        (tmp, store)
    }

    #[test]
    /// What: A missing file loads as empty.
    fn load_missing_is_empty() {
        let (_tmp, store) = store();
        assert!(store.load().is_empty());
    }

    #[test]
    /// What: Save then load returns the same ids with duplicates removed.
    ///
    /// Inputs:
    /// - Selection built from `["x", "y", "x"]`
    ///
    /// Output:
    /// - Loaded selection `["x", "y"]`; no temp file left behind.
    fn save_load_round_trip_dedups() {
        let (_tmp, store) = store();
        let sel = PersistedSelection::from_ids(["x", "y", "x"]);
        store.save(&sel).expect("save");
        assert_eq!(store.load().ids(), ["x", "y"]);
        let mut tmp_name = store.path().as_os_str().to_owned();
        tmp_name.push(".tmp");
        assert!(!PathBuf::from(tmp_name).exists());
    }

    #[test]
    /// What: Saving overwrites the previous selection wholesale.
    fn save_overwrites_previous() {
        let (_tmp, store) = store();
        store
            .save(&PersistedSelection::from_ids(["a", "b"]))
            .expect("first save");
        store
            .save(&PersistedSelection::from_ids(["c"]))
            .expect("second save");
        assert_eq!(store.load().ids(), ["c"]);
    }

    #[test]
    /// What: Malformed or duplicate-laden files degrade gracefully.
    fn load_tolerates_bad_content() {
        let (_tmp, store) = store();
        fs::create_dir_all(store.path().parent().expect("parent")).expect("mkdir");
        fs::write(store.path(), "{not json").expect("write");
        assert!(store.load().is_empty());
        fs::write(store.path(), r#"["a","a","b"]"#).expect("write");
        assert_eq!(store.load().ids(), ["a", "b"]);
    }

    #[test]
    /// What: A failed save reports an error instead of pretending success.
    fn save_into_file_parent_fails() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "file, not dir").expect("write");
        let store = SelectionStore::new(blocker.join("selected_apps.json"));
        assert!(store.save(&PersistedSelection::from_ids(["a"])).is_err());
    }
}
