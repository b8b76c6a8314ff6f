//! OpenAI-compatible chat-completion wire types.

use serde::{Deserialize, Serialize};

use crate::settings::ExternalConfig;

pub const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
pub const MODELS_PATH: &str = "/v1/models";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub temperature: f32,
}

impl ChatRequest {
    /// A single user-role message with sampling taken from `config`.
    pub fn user(prompt: String, config: &ExternalConfig) -> Self {
        Self {
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            max_tokens: config.max_tokens,
            model: config.model_name().map(str::to_string),
            temperature: config.temperature,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ReplyMessage>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

impl ChatResponse {
    /// Completion text of the first choice: `message.content`, else the
    /// legacy `text` field. Blank text counts as absent.
    pub fn text(&self) -> Option<&str> {
        let choice = self.choices.first()?;
        choice
            .message
            .as_ref()
            .and_then(|m| m.content.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .or_else(|| choice.text.as_deref().map(str::trim).filter(|t| !t.is_empty()))
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ModelEntry {
    id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelList {
    data: Vec<ModelEntry>,
}

impl ModelList {
    pub fn ids(&self) -> Vec<String> {
        self.data.iter().map(|m| m.id.clone()).collect()
    }
}
