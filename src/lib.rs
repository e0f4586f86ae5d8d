//! Library entry for lanprefill: the selection workflow, the prefill pipeline
//! and their collaborators, exposed for the binary and integration tests.

pub mod app;
pub mod config;
pub mod error;
pub mod logic;
pub mod sources;
pub mod state;
pub mod ui;
pub mod util;
