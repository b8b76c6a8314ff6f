//! Configuration for the external move source.

use log::warn;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:1234";
pub const DEFAULT_MODEL: &str = "local-model";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 10;

/// Where and how to ask a chat-completion service for moves.
///
/// Serialised with camelCase keys, matching the settings file written by
/// the game front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExternalConfig {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub debug: bool,
}

impl Default for ExternalConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            debug: false,
        }
    }
}

impl ExternalConfig {
    /// Defaults overlaid with `SALVO_LLM_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Load a persisted configuration; missing keys take defaults.
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let config: ExternalConfig = serde_json::from_str(text)?;
        Ok(config.normalized())
    }

    /// Apply overrides from `lookup`, keyed by environment variable name.
    /// Values that do not parse are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup("SALVO_LLM_ENDPOINT") {
            self.endpoint = endpoint;
        }
        if let Some(model) = lookup("SALVO_LLM_MODEL") {
            self.model = model;
        }
        if let Some(raw) = lookup("SALVO_LLM_TEMPERATURE") {
            match raw.trim().parse() {
                Ok(t) => self.temperature = t,
                Err(_) => warn!("ignoring SALVO_LLM_TEMPERATURE={raw:?}"),
            }
        }
        if let Some(raw) = lookup("SALVO_LLM_MAX_TOKENS") {
            match raw.trim().parse() {
                Ok(n) => self.max_tokens = n,
                Err(_) => warn!("ignoring SALVO_LLM_MAX_TOKENS={raw:?}"),
            }
        }
        if let Some(raw) = lookup("SALVO_LLM_DEBUG") {
            match raw.trim() {
                "1" | "true" | "yes" | "on" => self.debug = true,
                "0" | "false" | "no" | "off" => self.debug = false,
                _ => warn!("ignoring SALVO_LLM_DEBUG={raw:?}"),
            }
        }
        self.normalized()
    }

    /// Clamp temperature into [0, 1], keep at least one output token and
    /// drop trailing slashes from the endpoint.
    pub fn normalized(mut self) -> Self {
        self.temperature = if self.temperature.is_finite() {
            self.temperature.clamp(0.0, 1.0)
        } else {
            DEFAULT_TEMPERATURE
        };
        self.max_tokens = self.max_tokens.max(1);
        self.endpoint = self.endpoint.trim().trim_end_matches('/').to_string();
        self
    }

    /// Full URL for an API path such as `/v1/models`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint.trim_end_matches('/'), path)
    }

    /// Model identifier to send, if one is configured.
    pub fn model_name(&self) -> Option<&str> {
        let model = self.model.trim();
        (!model.is_empty()).then_some(model)
    }
}
