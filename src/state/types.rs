//! Core value types shared by the selection workflow and the prefill pipeline.

use std::collections::HashSet;

/// One owned app as reported by the catalog service.
///
/// Immutable once fetched; `app_id` is unique within a catalog.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// Remote-issued identifier of the app.
    pub app_id: String,
    /// Human-readable title.
    pub title: String,
    /// Current build version, when the catalog reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_version: Option<String>,
}

impl CatalogEntry {
    /// What: Build an entry without a build version.
    ///
    /// Inputs:
    /// - `app_id`: Remote identifier
    /// - `title`: Display title
    ///
    /// Output:
    /// - New `CatalogEntry` with `build_version` unset.
    pub fn new(app_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            title: title.into(),
            build_version: None,
        }
    }
}

/// A catalog entry as shown in the selection list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectableAppModel {
    /// Identifier copied from the catalog entry.
    pub app_id: String,
    /// Title copied from the catalog entry.
    pub title: String,
    /// Whether the user wants this app prefilled.
    pub is_selected: bool,
}

/// Durable set of app ids the user chose to prefill.
///
/// Keeps insertion order for stable files and display, but never holds the
/// same id twice.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PersistedSelection {
    ids: Vec<String>,
}

impl PersistedSelection {
    /// What: Build a selection from any id sequence, dropping duplicates.
    ///
    /// Inputs:
    /// - `ids`: App ids in caller order, possibly repeated
    ///
    /// Output:
    /// - Selection holding the first occurrence of each id, in order.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let ids = ids
            .into_iter()
            .map(Into::into)
            .filter(|id: &String| seen.insert(id.clone()))
            .collect();
        Self { ids }
    }

    /// What: Collect the ids of every selected model.
    ///
    /// Inputs:
    /// - `models`: Final model list of a confirmed selection session
    ///
    /// Output:
    /// - Selection containing the selected ids in list order.
    #[must_use]
    pub fn from_models(models: &[SelectableAppModel]) -> Self {
        Self::from_ids(
            models
                .iter()
                .filter(|m| m.is_selected)
                .map(|m| m.app_id.clone()),
        )
    }

    /// Whether `app_id` is part of the selection.
    #[must_use]
    pub fn contains(&self, app_id: &str) -> bool {
        self.ids.iter().any(|id| id == app_id)
    }

    /// Selected ids in stored order.
    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Number of selected ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Consume the selection and return the ids.
    #[must_use]
    pub fn into_ids(self) -> Vec<String> {
        self.ids
    }
}

/// Per-app classification produced by one prefill run. Never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DownloadOutcome {
    /// Skipped because the freshness tracker already has the current version.
    UpToDate,
    /// Every chunk went through the cache; the app is now recorded as fresh.
    Updated,
    /// Manifest, transfer or lookup failed for this app only.
    Failed,
}

/// One chunk request produced by manifest parsing.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedChunk {
    /// Path of the chunk relative to the CDN host.
    pub path: String,
    /// Bytes the cache will serve for this chunk.
    pub size_bytes: u64,
}

/// One candidate location of an app's manifest.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ManifestUrl {
    /// Absolute URL of the manifest on a CDN host.
    pub uri: String,
}

impl ManifestUrl {
    /// Wrap a URL string.
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }

    /// Host part of the URL, if it parses.
    #[must_use]
    pub fn host(&self) -> Option<String> {
        reqwest::Url::parse(&self.uri)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
    }

    /// True when the URL carries a query string (usually a signed URL).
    #[must_use]
    pub fn has_query(&self) -> bool {
        self.uri.contains('?')
    }

    /// What: Base URL of the directory holding the manifest.
    ///
    /// Output:
    /// - Everything up to and including the last `/` before any query string.
    #[must_use]
    pub fn base(&self) -> &str {
        let without_query = self.uri.split('?').next().unwrap_or(&self.uri);
        without_query
            .rfind('/')
            .map_or(without_query, |i| &without_query[..=i])
    }
}

/// Which apps a prefill run should walk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PrefillTarget {
    /// Every app in the owned catalog, in catalog order.
    AllOwned,
    /// The persisted selection followed by any manually supplied ids.
    Selected {
        /// Extra ids given on the command line.
        manual_ids: Vec<String>,
    },
}
