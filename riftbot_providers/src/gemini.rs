//! Gemini REST backend.
//!
//! Speaks the `models/{model}:generateContent` endpoint. History turns
//! map onto the wire `contents` array; the system instruction and the
//! per-category safety thresholds travel alongside rather than inside
//! the conversation.

use crate::retry::retry_with_backoff;
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use riftbot_core::{ChatBackend, Part, Role, Turn};
use serde::{Deserialize, Serialize};
use tracing::info;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-04-17";

/// Blocking threshold for one harm category.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterLevel {
    #[default]
    BlockNone,
    BlockOnlyHigh,
    BlockMediumAndAbove,
    BlockLowAndAbove,
}

/// Per-category safety thresholds. The default leaves every category
/// unfiltered.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SafetyConfig {
    #[serde(default)]
    pub harassment: FilterLevel,
    #[serde(default)]
    pub hate_speech: FilterLevel,
    #[serde(default)]
    pub dangerous_content: FilterLevel,
    #[serde(default)]
    pub sexually_explicit: FilterLevel,
}

pub struct GeminiBackend {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    system_instruction: String,
    safety: SafetyConfig,
}

impl GeminiBackend {
    #[must_use]
    pub fn new(api_key: String, system_instruction: String) -> Self {
        info!("Creating GeminiBackend");
        Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            system_instruction,
            safety: SafetyConfig::default(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    #[must_use]
    pub fn with_safety(mut self, safety: SafetyConfig) -> Self {
        self.safety = safety;
        self
    }

    fn build_request(&self, history: &[Turn], user_text: &str) -> GenerateContentRequest {
        let mut contents: Vec<Content> = history.iter().map(content_from_turn).collect();
        contents.push(Content {
            role: Some("user".to_string()),
            parts: vec![WirePart::text(user_text)],
        });

        GenerateContentRequest {
            contents,
            system_instruction: Some(Content {
                role: None,
                parts: vec![WirePart::text(&self.system_instruction)],
            }),
            safety_settings: safety_settings(&self.safety),
        }
    }

    async fn try_generate(&self, request: &GenerateContentRequest) -> anyhow::Result<String> {
        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json::<GenerateContentResponse>()
            .await?;

        extract_reply(&response)
    }
}

#[async_trait]
impl ChatBackend for GeminiBackend {
    async fn generate(&self, history: &[Turn], user_text: &str) -> anyhow::Result<String> {
        let request = self.build_request(history, user_text);

        info!("Sending request to Gemini API: model={}", self.model);

        // Retry with backoff: 2s, 4s, 6s, 8s, then 10s x 3
        let base_delays: [u64; 4] = [2, 4, 6, 8];
        let final_retries = 3;

        let reply =
            retry_with_backoff(|| self.try_generate(&request), &base_delays, final_retries)
                .await?;

        info!("Received response from Gemini API");
        Ok(reply)
    }
}

/// The reply is the last part carrying non-empty text, across all
/// candidates in returned order. The API may return several candidate
/// completions; selection is deterministic last-wins, not "best".
fn extract_reply(response: &GenerateContentResponse) -> anyhow::Result<String> {
    let mut selected: Option<&str> = None;
    for candidate in &response.candidates {
        if let Some(content) = &candidate.content {
            for part in &content.parts {
                if let Some(text) = part.text.as_deref() {
                    if !text.is_empty() {
                        selected = Some(text);
                    }
                }
            }
        }
    }
    selected
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("Gemini response carried no usable text"))
}

fn content_from_turn(turn: &Turn) -> Content {
    let role = match turn.role {
        Role::User => "user",
        Role::Model => "model",
    };
    let parts = turn
        .parts
        .iter()
        .map(|part| match part {
            Part::Text(text) => WirePart::text(text),
            Part::Blob { mime_type, data } => WirePart {
                text: None,
                inline_data: Some(InlineData {
                    mime_type: mime_type.clone(),
                    data: BASE64.encode(data),
                }),
            },
        })
        .collect();
    Content {
        role: Some(role.to_string()),
        parts,
    }
}

fn safety_settings(safety: &SafetyConfig) -> Vec<SafetySetting> {
    vec![
        SafetySetting {
            category: HarmCategory::Harassment,
            threshold: safety.harassment,
        },
        SafetySetting {
            category: HarmCategory::HateSpeech,
            threshold: safety.hate_speech,
        },
        SafetySetting {
            category: HarmCategory::DangerousContent,
            threshold: safety.dangerous_content,
        },
        SafetySetting {
            category: HarmCategory::SexuallyExplicit,
            threshold: safety.sexually_explicit,
        },
    ]
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<WirePart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl WirePart {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            inline_data: None,
        }
    }
}

/// Binary blob part; `data` is base64 on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct SafetySetting {
    category: HarmCategory,
    threshold: FilterLevel,
}

#[derive(Debug, Clone, Copy, Serialize)]
enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}
