//! Core orchestration: catalog merging, the selection state machine, the
//! prefill pipeline and its run summary.

pub mod merge;
pub mod prefill;
pub mod selection;
pub mod summary;

pub use merge::merge_catalog;
pub use prefill::{PrefillPipeline, prefill_owned_apps, resolve_app_ids};
pub use selection::{SelectionEvent, SelectionSession, SessionOutcome, SessionState};
pub use summary::RunSummary;
