use crate::transport::TelegramTransport;
use crate::{Result, handler};
use riftbot_config::{NoticeTexts, TriggerConfig};
use riftbot_conversation::ChatOrchestrator;
use riftbot_league::MatchContextEnricher;
use std::sync::Arc;
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::types::UserId;
use tokio::time::sleep;
use tracing::{info, warn};

/// Telegram bot wired to the conversation core.
#[derive(Clone)]
pub struct RiftBot {
    bot: Bot,
    transport: TelegramTransport,
    orchestrator: Arc<ChatOrchestrator>,
    enricher: Arc<MatchContextEnricher>,
    triggers: TriggerConfig,
    notices: NoticeTexts,
    /// Resolved at startup, used for self-echo suppression
    self_id: Option<UserId>,
}

impl RiftBot {
    #[must_use]
    pub fn new(
        token: String,
        orchestrator: Arc<ChatOrchestrator>,
        enricher: Arc<MatchContextEnricher>,
        triggers: TriggerConfig,
        notices: NoticeTexts,
    ) -> Self {
        let bot = Bot::new(token);
        let transport = TelegramTransport::new(bot.clone());
        Self {
            bot,
            transport,
            orchestrator,
            enricher,
            triggers,
            notices,
            self_id: None,
        }
    }

    #[must_use]
    pub const fn transport(&self) -> &TelegramTransport {
        &self.transport
    }

    #[must_use]
    pub fn orchestrator(&self) -> &ChatOrchestrator {
        &self.orchestrator
    }

    #[must_use]
    pub fn enricher(&self) -> &MatchContextEnricher {
        &self.enricher
    }

    #[must_use]
    pub const fn triggers(&self) -> &TriggerConfig {
        &self.triggers
    }

    #[must_use]
    pub const fn notices(&self) -> &NoticeTexts {
        &self.notices
    }

    #[must_use]
    pub const fn self_id(&self) -> Option<UserId> {
        self.self_id
    }

    /// Test connection to the Telegram API with backoff.
    /// Starts at 2s, increases by 2s each attempt, max 10s delay.
    /// Retries indefinitely until the connection succeeds; the returned
    /// identity is what self-echo suppression compares against.
    async fn test_connection(&self) -> Result<UserId> {
        const INITIAL_DELAY_SECS: u64 = 2;
        const MAX_DELAY_SECS: u64 = 10;

        let mut attempt = 1u64;
        loop {
            match self.bot.get_me().await {
                Ok(me) => {
                    info!(
                        "Connected to Telegram API: @{} (id: {})",
                        me.user
                            .username
                            .clone()
                            .unwrap_or_else(|| "no username".to_string()),
                        me.user.id
                    );
                    return Ok(me.user.id);
                }
                Err(e) => {
                    let delay_secs = (INITIAL_DELAY_SECS * attempt).min(MAX_DELAY_SECS);
                    warn!(
                        "Connection attempt {attempt} failed: {e}. Retrying in {delay_secs}s..."
                    );
                    sleep(Duration::from_secs(delay_secs)).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Run the bot.
    pub async fn run(mut self) -> Result<()> {
        use teloxide::dispatching::{Dispatcher, UpdateFilterExt};
        use teloxide::dptree;
        use teloxide::types::Update;

        let own_id = self.test_connection().await?;
        self.self_id = Some(own_id);

        let bot = self.bot.clone();

        let schema = dptree::entry().branch(Update::filter_message().endpoint({
            let bot_clone = self.clone();
            move |_bot: Bot, msg: teloxide::types::Message| {
                let bot_clone = bot_clone.clone();
                async move { handler::handle_message(bot_clone, msg).await }
            }
        }));

        Dispatcher::builder(bot, schema)
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        Ok(())
    }
}
