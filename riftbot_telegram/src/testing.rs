//! Shared test doubles for the transport, backend, and lookup
//! boundaries.

use async_trait::async_trait;
use riftbot_core::{
    ChannelId, ChatBackend, ChatTransport, MatchLookup, MatchReport, MessageRef, Turn,
};
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Send(String),
    Delete(i32),
}

/// Records successful transport operations in order. Sends are numbered
/// by attempt (1-based); attempts listed in `failing_sends` error out
/// without being recorded.
pub struct MockTransport {
    calls: Mutex<Vec<Call>>,
    send_attempts: AtomicUsize,
    failing_sends: Vec<usize>,
    failing_deletes: bool,
    next_id: AtomicI32,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            send_attempts: AtomicUsize::new(0),
            failing_sends: Vec::new(),
            failing_deletes: false,
            next_id: AtomicI32::new(1),
        }
    }

    pub fn failing_sends(mut self, attempts: &[usize]) -> Self {
        self.failing_sends = attempts.to_vec();
        self
    }

    pub fn failing_deletes(mut self) -> Self {
        self.failing_deletes = true;
        self
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn send_message(&self, _channel: ChannelId, text: &str) -> anyhow::Result<MessageRef> {
        let attempt = self.send_attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if self.failing_sends.contains(&attempt) {
            return Err(anyhow::anyhow!("send rejected (attempt {attempt})"));
        }
        self.calls.lock().await.push(Call::Send(text.to_string()));
        Ok(MessageRef(self.next_id.fetch_add(1, Ordering::SeqCst)))
    }

    async fn delete_message(&self, _channel: ChannelId, message: MessageRef) -> anyhow::Result<()> {
        if self.failing_deletes {
            return Err(anyhow::anyhow!("delete rejected"));
        }
        self.calls.lock().await.push(Call::Delete(message.0));
        Ok(())
    }
}

/// Replies with a fixed text and captures every prompt it was given.
pub struct CapturingBackend {
    pub prompts: Mutex<Vec<String>>,
    reply: Option<String>,
}

impl CapturingBackend {
    pub fn replying(reply: &str) -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            reply: Some(reply.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            reply: None,
        }
    }
}

#[async_trait]
impl ChatBackend for CapturingBackend {
    async fn generate(&self, _history: &[Turn], user_text: &str) -> anyhow::Result<String> {
        self.prompts.lock().await.push(user_text.to_string());
        self.reply
            .clone()
            .ok_or_else(|| anyhow::anyhow!("backend unavailable"))
    }
}

/// Counts invocations and records the last Riot ID it was asked about.
pub struct RecordingLookup {
    pub calls: AtomicUsize,
    pub seen: Mutex<Option<(String, String)>>,
}

impl RecordingLookup {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            seen: Mutex::new(None),
        }
    }
}

#[async_trait]
impl MatchLookup for RecordingLookup {
    async fn lookup(&self, player_name: &str, player_tag: &str) -> anyhow::Result<MatchReport> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.seen.lock().await = Some((player_name.to_string(), player_tag.to_string()));
        Ok(MatchReport {
            summary: "mode CLASSIC, duration 1820s".to_string(),
            player_id: "puuid-123".to_string(),
        })
    }
}
