#![deny(
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

//! Telegram surface of the assistant.
//!
//! Inbound messages are classified against the configured triggers and
//! driven through an explicit per-request lifecycle: a pending notice
//! goes up, the exchange runs, and the notice is resolved into either
//! the reply or a generic failure message.

mod bot;
mod error;
mod handler;
mod lifecycle;
#[cfg(test)]
mod testing;
mod transport;
mod trigger;

pub use bot::RiftBot;
pub use error::{Error, Result};
pub use lifecycle::{LifecycleState, MessageLifecycle};
pub use transport::TelegramTransport;
pub use trigger::{Trigger, classify};
