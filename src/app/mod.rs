//! Terminal front-end and durable state files.

/// Freshness records for apps already present in the cache.
mod freshness;
/// Atomic JSON writes and the saved selection.
mod persist;
/// Interactive selection screen.
mod select;
/// Terminal setup and restoration.
mod terminal;

pub use freshness::FreshnessStore;
pub use persist::SelectionStore;
pub use select::{events_for_key, run_selection_tui};
