//! Driving one exchange against the generative backend.

use crate::HistoryStore;
use riftbot_core::{ChatBackend, Turn};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Submits user text plus the shared history to the backend and records
/// the completed exchange.
///
/// The store's lock is held across the whole snapshot → generate →
/// append sequence, so concurrent exchanges serialize: history order
/// always matches what each backend call actually saw. The coarse lock
/// is deliberate; backend latency dominates, so finer-grained
/// concurrency buys nothing here.
pub struct ChatOrchestrator {
    backend: Arc<dyn ChatBackend>,
    history: Arc<HistoryStore>,
    deadline: Duration,
}

impl ChatOrchestrator {
    #[must_use]
    pub fn new(backend: Arc<dyn ChatBackend>, history: Arc<HistoryStore>, deadline: Duration) -> Self {
        Self {
            backend,
            history,
            deadline,
        }
    }

    /// Run one full exchange.
    ///
    /// On success the user turn and the model's reply turn are appended,
    /// in that order, and the reply text is returned. On backend failure
    /// or deadline expiry the history is left untouched: a failed
    /// exchange never becomes part of the conversation.
    pub async fn exchange(&self, text: &str) -> anyhow::Result<String> {
        let mut log = self.history.lock().await;
        let snapshot = log.snapshot();
        debug!("submitting exchange with {} prior turns", snapshot.len());

        let reply = tokio::time::timeout(self.deadline, self.backend.generate(&snapshot, text))
            .await
            .map_err(|_| {
                anyhow::anyhow!("backend exchange exceeded {}s deadline", self.deadline.as_secs())
            })??;

        log.append([Turn::user(text), Turn::model(reply.clone())]);
        info!("exchange complete, history now {} turns", log.len());
        Ok(reply)
    }

    #[must_use]
    pub fn history(&self) -> &Arc<HistoryStore> {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use riftbot_core::{Document, Role};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Echoes the user text back, optionally after a pause, and counts
    /// how many prior turns each call saw.
    struct EchoBackend {
        pause: Duration,
        calls: AtomicUsize,
    }

    impl EchoBackend {
        fn new(pause: Duration) -> Self {
            Self {
                pause,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ChatBackend for EchoBackend {
        async fn generate(&self, _history: &[Turn], user_text: &str) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.pause).await;
            Ok(format!("echo:{user_text}"))
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl ChatBackend for FailingBackend {
        async fn generate(&self, _history: &[Turn], _user_text: &str) -> anyhow::Result<String> {
            Err(anyhow::anyhow!("quota exhausted"))
        }
    }

    fn orchestrator_with(backend: Arc<dyn ChatBackend>) -> (ChatOrchestrator, Arc<HistoryStore>) {
        let history = Arc::new(HistoryStore::new());
        let orchestrator =
            ChatOrchestrator::new(backend, Arc::clone(&history), Duration::from_secs(5));
        (orchestrator, history)
    }

    fn seed_document() -> Turn {
        Turn::document(Document {
            name: "guide.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            bytes: vec![0x25, 0x50, 0x44, 0x46],
        })
    }

    #[tokio::test]
    async fn sequential_exchanges_alternate_after_document_prefix() {
        let (orchestrator, history) =
            orchestrator_with(Arc::new(EchoBackend::new(Duration::ZERO)));
        history.append([seed_document(), seed_document()]).await;

        for i in 0..3 {
            let reply = orchestrator.exchange(&format!("question {i}")).await;
            assert!(reply.is_ok());
        }

        let turns = history.snapshot().await;
        assert_eq!(turns.len(), 2 + 2 * 3);
        for (i, turn) in turns.iter().enumerate().skip(2) {
            let expected = if (i - 2) % 2 == 0 { Role::User } else { Role::Model };
            assert_eq!(turn.role, expected, "turn {i}");
        }
    }

    #[tokio::test]
    async fn failed_exchange_never_changes_history() {
        let (orchestrator, history) = orchestrator_with(Arc::new(FailingBackend));
        history.append([seed_document()]).await;

        let outcome = orchestrator.exchange("hello").await;
        assert!(outcome.is_err());
        assert_eq!(history.len().await, 1);
    }

    #[tokio::test]
    async fn concurrent_exchanges_serialize_into_adjacent_pairs() {
        let (orchestrator, history) =
            orchestrator_with(Arc::new(EchoBackend::new(Duration::from_millis(30))));
        let orchestrator = Arc::new(orchestrator);

        let mut handles = Vec::new();
        for i in 0..4 {
            let orchestrator = Arc::clone(&orchestrator);
            handles.push(tokio::spawn(async move {
                orchestrator.exchange(&format!("q{i}")).await
            }));
        }
        for handle in handles {
            assert!(handle.await.is_ok_and(|reply| reply.is_ok()));
        }

        // Each user turn is immediately followed by the reply the backend
        // produced for exactly that text.
        let turns = history.snapshot().await;
        assert_eq!(turns.len(), 8);
        for pair in turns.chunks(2) {
            assert_eq!(pair[0].role, Role::User);
            assert_eq!(pair[1].role, Role::Model);
            let question = pair[0].text().map(str::to_string);
            let answer = pair[1].text().map(str::to_string);
            assert!(question.is_some());
            assert_eq!(
                answer,
                question.map(|q| format!("echo:{q}")),
                "reply must belong to the adjacent user turn"
            );
        }
    }

    #[tokio::test]
    async fn deadline_expiry_is_an_error_without_history_mutation() {
        let history = Arc::new(HistoryStore::new());
        let orchestrator = ChatOrchestrator::new(
            Arc::new(EchoBackend::new(Duration::from_millis(200))),
            Arc::clone(&history),
            Duration::from_millis(20),
        );

        let outcome = orchestrator.exchange("slow").await;
        assert!(outcome.is_err());
        assert_eq!(history.len().await, 0);
    }
}
