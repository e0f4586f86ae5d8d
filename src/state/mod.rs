//! Value types describing the owned catalog, the user's selection and run outcomes.

pub mod types;

pub use types::{
    CatalogEntry, DownloadOutcome, ManifestUrl, PersistedSelection, PrefillTarget, QueuedChunk,
    SelectableAppModel,
};
