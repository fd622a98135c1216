use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use riftbot_core::{MatchLookup, MatchReport};
use serde_json::Value;
use tracing::info;

const DEFAULT_ROUTING_HOST: &str = "https://asia.api.riotgames.com";

/// Riot API client: Riot ID → puuid → latest match → summary text.
pub struct RiotClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl RiotClient {
    #[must_use]
    pub fn new(api_key: String) -> Self {
        info!("Creating RiotClient");
        Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_ROUTING_HOST.to_string(),
        }
    }

    /// Override the regional routing host.
    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    async fn get_json(&self, url: String) -> Result<Value> {
        let value = self
            .client
            .get(url)
            .header("X-Riot-Token", &self.api_key)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;
        Ok(value)
    }

    async fn account_puuid(&self, name: &str, tag: &str) -> Result<String> {
        let account = self
            .get_json(format!(
                "{}/riot/account/v1/accounts/by-riot-id/{name}/{tag}",
                self.base_url
            ))
            .await?;
        account["puuid"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| Error::Payload("account response missing puuid".to_string()))
    }

    async fn latest_match_id(&self, puuid: &str) -> Result<String> {
        let ids = self
            .get_json(format!(
                "{}/lol/match/v5/matches/by-puuid/{puuid}/ids?start=0&count=1",
                self.base_url
            ))
            .await?;
        ids.as_array()
            .and_then(|list| list.first())
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::NoMatches(puuid.to_string()))
    }

    async fn match_detail(&self, match_id: &str) -> Result<Value> {
        self.get_json(format!("{}/lol/match/v5/matches/{match_id}", self.base_url))
            .await
    }
}

/// Compact text block the model can reason over. The requesting player's
/// line is included only when the payload carries them.
fn summarize_match(detail: &Value, puuid: &str) -> String {
    let game = &detail["info"];
    let mode = game["gameMode"].as_str().unwrap_or("UNKNOWN");
    let duration = game["gameDuration"].as_u64().unwrap_or(0);
    let mut summary = format!("mode {mode}, duration {duration}s");

    let player = game["participants"]
        .as_array()
        .and_then(|list| list.iter().find(|p| p["puuid"].as_str() == Some(puuid)));
    if let Some(player) = player {
        let champion = player["championName"].as_str().unwrap_or("unknown");
        let kills = player["kills"].as_u64().unwrap_or(0);
        let deaths = player["deaths"].as_u64().unwrap_or(0);
        let assists = player["assists"].as_u64().unwrap_or(0);
        let outcome = if player["win"].as_bool().unwrap_or(false) {
            "win"
        } else {
            "loss"
        };
        summary.push_str(&format!(
            ", champion {champion}, KDA {kills}/{deaths}/{assists}, {outcome}"
        ));
    }
    summary
}

#[async_trait]
impl MatchLookup for RiotClient {
    async fn lookup(&self, player_name: &str, player_tag: &str) -> anyhow::Result<MatchReport> {
        let puuid = self.account_puuid(player_name, player_tag).await?;
        let match_id = self.latest_match_id(&puuid).await?;
        let detail = self.match_detail(&match_id).await?;
        let summary = summarize_match(&detail, &puuid);

        info!("Fetched match {match_id} for {player_name}#{player_tag}");
        Ok(MatchReport {
            summary,
            player_id: puuid,
        })
    }
}
