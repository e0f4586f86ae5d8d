//! Integration tests for the selection workflow and the prefill pipeline.

#[path = "prefill/common.rs"]
mod common;
#[path = "prefill/pipeline.rs"]
mod pipeline;
#[path = "prefill/selection.rs"]
mod selection;
