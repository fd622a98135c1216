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

//! League of Legends match context.
//!
//! Resolves a `name#tag` Riot ID to the player's latest match and folds
//! the result into the outgoing chat request.

mod client;
mod enrich;

use thiserror::Error;

pub use client::RiotClient;
pub use enrich::{MatchContextEnricher, parse_riot_id};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed analyze command: {0}")]
    MalformedCommand(String),

    #[error("Riot API error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("no recorded matches for {0}")]
    NoMatches(String),

    #[error("unexpected Riot API payload: {0}")]
    Payload(String),

    #[error("match lookup failed: {0}")]
    Lookup(anyhow::Error),
}
