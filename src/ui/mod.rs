//! Terminal rendering for the interactive app selection.

mod select;

pub use select::render_selection;
