use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// Safety thresholds live next to the Gemini client to avoid duplication
use riftbot_providers::SafetyConfig;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub providers: ProvidersConfig,
    pub league: LeagueConfig,
    #[serde(default)]
    pub documents: DocumentsConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TelegramConfig {
    pub token: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub gemini: GeminiConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub system_instruction: String,
    #[serde(default = "GeminiConfig::default_model")]
    pub model: String,
    #[serde(default)]
    pub safety: SafetyConfig,
    #[serde(default = "GeminiConfig::default_deadline_secs")]
    pub deadline_secs: u64,
}

impl GeminiConfig {
    fn default_model() -> String {
        "gemini-2.5-flash-preview-04-17".to_string()
    }

    const fn default_deadline_secs() -> u64 {
        120
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LeagueConfig {
    pub api_key: String,
    #[serde(default = "LeagueConfig::default_routing_host")]
    pub routing_host: String,
}

impl LeagueConfig {
    fn default_routing_host() -> String {
        "https://asia.api.riotgames.com".to_string()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DocumentsConfig {
    #[serde(default = "DocumentsConfig::default_dir")]
    pub dir: PathBuf,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            dir: Self::default_dir(),
        }
    }
}

impl DocumentsConfig {
    fn default_dir() -> PathBuf {
        PathBuf::from("pdfs")
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ChatConfig {
    #[serde(default)]
    pub triggers: TriggerConfig,
    #[serde(default)]
    pub notices: NoticeTexts,
}

/// What makes an inbound message qualify for handling.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TriggerConfig {
    /// Substring that triggers a plain exchange
    #[serde(default = "TriggerConfig::default_keyword")]
    pub keyword: String,
    /// Prefix that triggers match analysis
    #[serde(default = "TriggerConfig::default_command_prefix")]
    pub command_prefix: String,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            keyword: Self::default_keyword(),
            command_prefix: Self::default_command_prefix(),
        }
    }
}

impl TriggerConfig {
    fn default_keyword() -> String {
        "机器人".to_string()
    }

    fn default_command_prefix() -> String {
        "分析我最后一场游戏".to_string()
    }
}

/// Texts shown to the user around an exchange.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NoticeTexts {
    #[serde(default = "NoticeTexts::default_pending")]
    pub pending: String,
    #[serde(default = "NoticeTexts::default_failure")]
    pub failure: String,
}

impl Default for NoticeTexts {
    fn default() -> Self {
        Self {
            pending: Self::default_pending(),
            failure: Self::default_failure(),
        }
    }
}

impl NoticeTexts {
    fn default_pending() -> String {
        "正在生成回答".to_string()
    }

    fn default_failure() -> String {
        "无法生成回答".to_string()
    }
}

const CONFIG_TEMPLATE: &str = r#"{
  "telegram": {
    "token": "your-telegram-bot-token-here"
  },
  "providers": {
    "gemini": {
      "api_key": "your-gemini-api-key-here",
      "system_instruction": "你是一个精通英雄联盟的助手，根据提供的资料回答问题。",
      "model": "gemini-2.5-flash-preview-04-17",
      "deadline_secs": 120
    }
  },
  "league": {
    "api_key": "your-riot-api-key-here",
    "routing_host": "https://asia.api.riotgames.com"
  },
  "documents": {
    "dir": "pdfs"
  },
  "chat": {
    "triggers": {
      "keyword": "机器人",
      "command_prefix": "分析我最后一场游戏"
    },
    "notices": {
      "pending": "正在生成回答",
      "failure": "无法生成回答"
    }
  }
}"#;

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_dir = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("riftbot");

        let config_path = config_dir.join("config.json");

        if !config_path.exists() {
            anyhow::bail!(
                "Config file not found at: {}. Please run 'riftbot init' to create config.",
                config_path.display()
            );
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;

        Ok(config)
    }

    /// Missing credentials fail at startup, before any client exists.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.telegram.token.trim().is_empty() {
            anyhow::bail!("telegram.token is empty");
        }
        if self.providers.gemini.api_key.trim().is_empty() {
            anyhow::bail!("providers.gemini.api_key is empty");
        }
        if self.league.api_key.trim().is_empty() {
            anyhow::bail!("league.api_key is empty");
        }
        Ok(())
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("riftbot");

        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join("config.json");

        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        std::fs::write(&config_path, CONFIG_TEMPLATE)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Edit the config file and add your Telegram, Gemini and Riot keys");
        println!("   2. Put your reference documents into the configured directory");
        println!("   3. Run 'riftbot run' to start the bot");
        println!();
        Ok(())
    }
}
