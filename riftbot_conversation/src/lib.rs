#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! The conversation session core.
//!
//! One shared, append-only turn history is visible to every in-flight
//! exchange; the orchestrator extends it under mutual exclusion so that
//! what the backend saw and what history records never disagree.
//!
//! # Key pieces
//! - [`HistoryStore`]: the shared ordered log of turns
//! - [`ChatOrchestrator`]: snapshot → backend call → append, as one
//!   exclusive sequence
//! - [`documents`]: startup loading of reference documents into the
//!   history prefix

pub mod documents;
mod history;
mod orchestrator;

pub use history::{HistoryGuard, HistoryStore};
pub use orchestrator::ChatOrchestrator;
