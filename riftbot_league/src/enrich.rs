//! Folding fetched match data into the outgoing request.
//!
//! The structured command looks like `分析我最后一场游戏|Faker#KR1`: the
//! command phrase, a `|` field delimiter, then a `name#tag` Riot ID.
//! Only presence of the delimited parts is validated; anything further
//! is the lookup service's problem.

use crate::{Error, Result};
use riftbot_core::MatchLookup;
use std::sync::Arc;
use tracing::info;

/// Split a command into the Riot ID's name and tag.
///
/// Fails with [`Error::MalformedCommand`] before any network traffic
/// when the `|` delimiter or the `#` separator is absent.
pub fn parse_riot_id(raw: &str) -> Result<(&str, &str)> {
    let (_, payload) = raw
        .split_once('|')
        .ok_or_else(|| Error::MalformedCommand(format!("missing '|' delimiter in {raw:?}")))?;
    payload
        .split_once('#')
        .ok_or_else(|| Error::MalformedCommand(format!("missing '#' separator in {payload:?}")))
}

/// Pre-step for match-analysis requests: fetch the player's latest match
/// and fold it into one augmented instruction string.
pub struct MatchContextEnricher {
    lookup: Arc<dyn MatchLookup>,
}

impl MatchContextEnricher {
    #[must_use]
    pub fn new(lookup: Arc<dyn MatchLookup>) -> Self {
        Self { lookup }
    }

    /// Returns the augmented request text, leaving `raw` visible at the
    /// front so the model still sees the user's own words.
    pub async fn enrich(&self, raw: &str) -> Result<String> {
        let (name, tag) = parse_riot_id(raw)?;
        let report = self.lookup.lookup(name, tag).await.map_err(Error::Lookup)?;

        info!("enriched request for {name}#{tag}");
        Ok(format!(
            "{raw} |  puuid: {}, 游戏信息: {} | 使用我的 puuid、昵称和游戏标签来分析我玩的角色信息",
            report.player_id, report.summary
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use riftbot_core::MatchReport;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct RecordingLookup {
        calls: AtomicUsize,
        seen: Mutex<Option<(String, String)>>,
    }

    impl RecordingLookup {
        fn new() -> Self {
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
            if let Ok(mut seen) = self.seen.lock() {
                *seen = Some((player_name.to_string(), player_tag.to_string()));
            }
            Ok(MatchReport {
                summary: "mode CLASSIC, duration 1820s".to_string(),
                player_id: "puuid-123".to_string(),
            })
        }
    }

    #[test]
    fn parses_name_and_tag() {
        let parsed = parse_riot_id("分析我最后一场游戏|Faker#KR1");
        assert!(matches!(parsed, Ok(("Faker", "KR1"))));
    }

    #[test]
    fn missing_delimiter_is_malformed() {
        let parsed = parse_riot_id("分析我最后一场游戏 Faker#KR1");
        assert!(matches!(parsed, Err(Error::MalformedCommand(_))));
    }

    #[test]
    fn missing_tag_separator_is_malformed() {
        let parsed = parse_riot_id("分析我最后一场游戏|FakerKR1");
        assert!(matches!(parsed, Err(Error::MalformedCommand(_))));
    }

    #[tokio::test]
    async fn lookup_receives_the_exact_riot_id() {
        let lookup = Arc::new(RecordingLookup::new());
        let enricher = MatchContextEnricher::new(Arc::clone(&lookup) as Arc<dyn MatchLookup>);

        let enriched = enricher.enrich("分析我最后一场游戏|Faker#KR1").await;
        assert!(enriched.is_ok());
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
        let seen = lookup.seen.lock().ok().and_then(|seen| seen.clone());
        assert_eq!(seen, Some(("Faker".to_string(), "KR1".to_string())));
    }

    #[tokio::test]
    async fn augmented_text_folds_command_id_and_summary() -> anyhow::Result<()> {
        let enricher =
            MatchContextEnricher::new(Arc::new(RecordingLookup::new()) as Arc<dyn MatchLookup>);

        let enriched = enricher
            .enrich("分析我最后一场游戏|Faker#KR1")
            .await
            .map_err(anyhow::Error::from)?;
        assert!(enriched.starts_with("分析我最后一场游戏|Faker#KR1"));
        assert!(enriched.contains("puuid: puuid-123"));
        assert!(enriched.contains("游戏信息: mode CLASSIC, duration 1820s"));
        Ok(())
    }

    #[tokio::test]
    async fn malformed_command_never_reaches_the_lookup() {
        let lookup = Arc::new(RecordingLookup::new());
        let enricher = MatchContextEnricher::new(Arc::clone(&lookup) as Arc<dyn MatchLookup>);

        let outcome = enricher.enrich("分析我最后一场游戏|FakerKR1").await;
        assert!(matches!(outcome, Err(Error::MalformedCommand(_))));
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }
}
