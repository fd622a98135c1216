use async_trait::async_trait;
use riftbot_core::{ChannelId, ChatTransport, MessageRef};
use teloxide::Bot;
use teloxide::prelude::Requester;
use teloxide::types::{ChatId, MessageId};

/// `ChatTransport` adapter over the teloxide client.
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    #[must_use]
    pub const fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send_message(&self, channel: ChannelId, text: &str) -> anyhow::Result<MessageRef> {
        let message = self.bot.send_message(ChatId(channel.0), text).await?;
        Ok(MessageRef(message.id.0))
    }

    async fn delete_message(&self, channel: ChannelId, message: MessageRef) -> anyhow::Result<()> {
        self.bot
            .delete_message(ChatId(channel.0), MessageId(message.0))
            .await?;
        Ok(())
    }
}
