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

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Author of a conversation turn. The generative backend knows only two
/// roles; the system instruction travels out-of-band.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One piece of turn content: plain text or a binary blob with its
/// sniffed media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text(String),
    Blob { mime_type: String, data: Vec<u8> },
}

/// A single authored contribution to the conversation. Immutable once
/// created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Turn {
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::Text(text.into())],
        }
    }

    #[must_use]
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part::Text(text.into())],
        }
    }

    /// Reference documents enter history as model-authored blob turns.
    #[must_use]
    pub fn document(document: Document) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part::Blob {
                mime_type: document.mime_type,
                data: document.bytes,
            }],
        }
    }

    /// First text part, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            Part::Text(text) => Some(text.as_str()),
            Part::Blob { .. } => None,
        })
    }
}

/// A reference document read once at startup.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Channel identity on the chat platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(pub i64);

/// Handle to a message previously sent on the chat platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef(pub i32);

/// Outcome of a match-data lookup: a human-readable summary plus the
/// platform's opaque player identifier.
#[derive(Debug, Clone)]
pub struct MatchReport {
    pub summary: String,
    pub player_id: String,
}

/// Generative backend boundary. Given the ordered history and the new
/// user text, produce one reply.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn generate(&self, history: &[Turn], user_text: &str) -> anyhow::Result<String>;
}

/// Chat platform boundary: send and delete visible messages.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_message(&self, channel: ChannelId, text: &str) -> anyhow::Result<MessageRef>;
    async fn delete_message(&self, channel: ChannelId, message: MessageRef) -> anyhow::Result<()>;
}

/// Match-data lookup boundary.
#[async_trait]
pub trait MatchLookup: Send + Sync {
    async fn lookup(&self, player_name: &str, player_tag: &str) -> anyhow::Result<MatchReport>;
}
