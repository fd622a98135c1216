//! Shared conversation history.
//!
//! The history is a single ordered log of turns, shared by reference
//! across all concurrent requests. Turns are never reordered or removed;
//! the only mutation is appending to the tail.

use riftbot_core::{Role, Turn};
use tokio::sync::{Mutex, MutexGuard};

/// Append-only ordered log of conversation turns.
///
/// A naive read-then-append over shared history races: two concurrent
/// exchanges can both snapshot a history missing each other's turns and
/// then both append, leaving an order no backend call ever saw. Callers
/// that need the full read-snapshot → append sequence to be exclusive
/// take [`HistoryStore::lock`] and hold the guard across it.
#[derive(Debug, Default)]
pub struct HistoryStore {
    turns: Mutex<Vec<Turn>>,
}

impl HistoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclusive access to the log for a snapshot+append sequence.
    pub async fn lock(&self) -> HistoryGuard<'_> {
        HistoryGuard(self.turns.lock().await)
    }

    /// Point-in-time copy of the ordered sequence.
    pub async fn snapshot(&self) -> Vec<Turn> {
        self.turns.lock().await.clone()
    }

    /// Append turns to the tail.
    pub async fn append(&self, turns: impl IntoIterator<Item = Turn> + Send) {
        self.turns.lock().await.extend(turns);
    }

    pub async fn len(&self) -> usize {
        self.turns.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.turns.lock().await.is_empty()
    }

    /// Number of user-authored turns, for logging.
    pub async fn user_turns(&self) -> usize {
        self.turns
            .lock()
            .await
            .iter()
            .filter(|turn| turn.role == Role::User)
            .count()
    }
}

/// Exclusive handle over the log. Holding this guard keeps every other
/// exchange out of the snapshot+append critical section.
pub struct HistoryGuard<'a>(MutexGuard<'a, Vec<Turn>>);

impl HistoryGuard<'_> {
    /// Copy of the sequence as seen by this exclusive holder.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Turn> {
        self.0.clone()
    }

    pub fn append(&mut self, turns: impl IntoIterator<Item = Turn>) {
        self.0.extend(turns);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
