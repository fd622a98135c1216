use crate::bot::RiftBot;
use crate::error::{Error, Result};
use crate::lifecycle::{LifecycleState, MessageLifecycle};
use crate::trigger::{self, Trigger};
use riftbot_config::{NoticeTexts, TriggerConfig};
use riftbot_conversation::ChatOrchestrator;
use riftbot_core::{ChannelId, ChatTransport};
use riftbot_league::MatchContextEnricher;
use teloxide::types::{Message, UserId};
use tracing::{error, info};

/// Entry point for every inbound Telegram message.
pub async fn handle_message(bot: RiftBot, msg: Message) -> Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let author = msg.from.as_ref().map(|user| user.id);
    if is_self_echo(author, bot.self_id()) {
        return Ok(());
    }

    let username = msg
        .from
        .as_ref()
        .and_then(|u| u.username.as_deref())
        .unwrap_or("unknown");

    let state = process_event(
        bot.transport(),
        bot.orchestrator(),
        bot.enricher(),
        bot.triggers(),
        bot.notices(),
        ChannelId(msg.chat.id.0),
        text,
    )
    .await;

    if let Some(state) = state {
        info!("[@{username}] Message: {text}");
        info!("[@{username}] resolved: {state:?}");
    }

    Ok(())
}

/// The bot's own messages never trigger a transition.
fn is_self_echo(author: Option<UserId>, own_id: Option<UserId>) -> bool {
    matches!((author, own_id), (Some(a), Some(me)) if a == me)
}

/// Classify and, for qualifying messages, drive the full lifecycle.
/// Returns `None` when the message does not qualify.
pub(crate) async fn process_event<T: ChatTransport + ?Sized>(
    transport: &T,
    orchestrator: &ChatOrchestrator,
    enricher: &MatchContextEnricher,
    triggers: &TriggerConfig,
    notices: &NoticeTexts,
    channel: ChannelId,
    text: &str,
) -> Option<LifecycleState> {
    let trigger = trigger::classify(triggers, text)?;

    let mut lifecycle = MessageLifecycle::new(transport, channel, notices);
    if let Err(e) = lifecycle.open().await {
        error!("cannot emit pending notice: {e}");
        return Some(lifecycle.state());
    }
    lifecycle.resolving();

    let outcome = match trigger {
        Trigger::Chat => orchestrator.exchange(text).await.map_err(Error::Exchange),
        Trigger::MatchAnalysis => match enricher.enrich(text).await {
            Ok(enriched) => orchestrator
                .exchange(&enriched)
                .await
                .map_err(Error::Exchange),
            Err(e) => Err(Error::Enrich(e)),
        },
    };

    let state = match outcome {
        Ok(reply) => lifecycle.succeed(&reply).await,
        Err(e) => lifecycle.fail(&e).await,
    };
    Some(state)
}
