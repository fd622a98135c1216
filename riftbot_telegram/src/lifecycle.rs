//! Per-request lifecycle against the chat platform.
//!
//! Every qualifying message walks the same states:
//!
//! ```text
//! Idle → Pending → Resolving → Succeeded | Failed
//! ```
//!
//! `Pending` puts a visible placeholder up; `Succeeded` replaces it with
//! the reply (reply first, delete after, so the user never sees a gap);
//! `Failed` funnels every error through one reporting path that sends
//! the generic failure notice and then cleans the placeholder up
//! best-effort. Terminal states are final: there is no retry.

use crate::error::Error;
use riftbot_config::NoticeTexts;
use riftbot_core::{ChannelId, ChatTransport, MessageRef};
use tracing::{error, warn};

/// Named states of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Idle,
    Pending,
    Resolving,
    Succeeded,
    Failed,
}

/// Drives one request's visible lifecycle. Owned by the handling call;
/// the terminal transitions consume it.
pub struct MessageLifecycle<'a, T: ChatTransport + ?Sized> {
    transport: &'a T,
    channel: ChannelId,
    notices: &'a NoticeTexts,
    state: LifecycleState,
    placeholder: Option<MessageRef>,
}

impl<'a, T: ChatTransport + ?Sized> MessageLifecycle<'a, T> {
    #[must_use]
    pub const fn new(transport: &'a T, channel: ChannelId, notices: &'a NoticeTexts) -> Self {
        Self {
            transport,
            channel,
            notices,
            state: LifecycleState::Idle,
            placeholder: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> LifecycleState {
        self.state
    }

    /// Idle → Pending: emit the placeholder notice.
    ///
    /// If the placeholder cannot be emitted the request is over: there
    /// is nothing visible to clean up and no retry. Idle is retained.
    pub async fn open(&mut self) -> Result<(), Error> {
        debug_assert_eq!(self.state, LifecycleState::Idle);
        let placeholder = self
            .transport
            .send_message(self.channel, &self.notices.pending)
            .await
            .map_err(Error::Transport)?;
        self.placeholder = Some(placeholder);
        self.state = LifecycleState::Pending;
        Ok(())
    }

    /// Pending → Resolving: the exchange is now in flight.
    pub const fn resolving(&mut self) {
        debug_assert!(matches!(self.state, LifecycleState::Pending));
        self.state = LifecycleState::Resolving;
    }

    /// Resolving → Succeeded: the reply must be visible before the
    /// placeholder disappears, so send first and delete after. A delete
    /// failure is logged and does not demote the outcome. A reply send
    /// failure falls through to the failure transition.
    pub async fn succeed(mut self, reply: &str) -> LifecycleState {
        debug_assert_eq!(self.state, LifecycleState::Resolving);
        match self.transport.send_message(self.channel, reply).await {
            Ok(_) => {
                self.delete_placeholder().await;
                self.state = LifecycleState::Succeeded;
                self.state
            }
            Err(e) => self.fail(&Error::Transport(e)).await,
        }
    }

    /// Resolving → Failed: the single failure exit. One generic notice,
    /// then best-effort placeholder cleanup; the user is never left with
    /// only a permanent pending notice. If even the notice cannot be
    /// sent, that is terminal for this request's feedback loop and only
    /// logged.
    pub async fn fail(mut self, err: &Error) -> LifecycleState {
        error!("request failed: {err}");
        if let Err(send_err) = self
            .transport
            .send_message(self.channel, &self.notices.failure)
            .await
        {
            error!("failed to deliver failure notice: {send_err}");
        }
        self.delete_placeholder().await;
        self.state = LifecycleState::Failed;
        self.state
    }

    async fn delete_placeholder(&mut self) {
        if let Some(placeholder) = self.placeholder.take() {
            if let Err(e) = self.transport.delete_message(self.channel, placeholder).await {
                warn!("failed to delete pending notice: {e}");
            }
        }
    }
}
