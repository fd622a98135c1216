use riftbot_config::TriggerConfig;

/// How a qualifying message asked to be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Keyword chat: the raw text goes straight to the backend.
    Chat,
    /// Structured command: fetch match data first, then exchange.
    MatchAnalysis,
}

/// Classify an inbound message against the configured triggers.
///
/// The command prefix wins over the keyword, so a command body that
/// happens to contain the keyword still gets enrichment. Anything else
/// returns `None` and is silently ignored.
#[must_use]
pub fn classify(triggers: &TriggerConfig, text: &str) -> Option<Trigger> {
    if text.starts_with(&triggers.command_prefix) {
        Some(Trigger::MatchAnalysis)
    } else if text.contains(&triggers.keyword) {
        Some(Trigger::Chat)
    } else {
        None
    }
}
