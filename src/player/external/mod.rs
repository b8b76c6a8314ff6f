//! Move source backed by a chat-completion service.
//!
//! Each move is attempted up to [`retry::MAX_ATTEMPTS`] times with thinner
//! prompts, then falls back to local hunt/target guessing. The caller always
//! gets a legal square back; service failures only show up in the logs.

pub mod chat;
pub mod coordinate;
pub mod memory;
pub mod prompt;
pub mod retry;

use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::core::{hunt_target, Position, ShotOutcome, TargetView};
use crate::settings::ExternalConfig;
use crate::transport::ChatTransport;

use super::MoveSource;
use chat::{ChatRequest, ChatResponse, ModelList, CHAT_COMPLETIONS_PATH, MODELS_PATH};
use coordinate::parse_coordinate;
use memory::MoveMemory;
use prompt::build_prompt;
use retry::{ContextLevel, RetryPlan, RETRY_DELAY};

/// Why a single attempt produced no usable move.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AttemptError {
    #[error("transport failed: {0}")]
    Transport(String),
    #[error("reply was not a chat completion: {0}")]
    Malformed(String),
    #[error("reply carried no text")]
    Empty,
    #[error("no coordinate in {0:?}")]
    Unparseable(String),
    #[error("{0} was already targeted")]
    AlreadyTargeted(Position),
}

/// Outcome of [`ExternalMoveSource::check_connection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionReport {
    pub success: bool,
    pub models: Vec<String>,
    pub error: Option<String>,
}

pub struct ExternalMoveSource {
    config: ExternalConfig,
    transport: Arc<dyn ChatTransport>,
    memory: MoveMemory,
    rng: SmallRng,
    retry_delay: Duration,
}

impl ExternalMoveSource {
    pub fn new(config: ExternalConfig, transport: Arc<dyn ChatTransport>) -> Self {
        let mut seed_rng = rand::rng();
        Self::with_rng(config, transport, SmallRng::from_rng(&mut seed_rng))
    }

    pub fn with_rng(config: ExternalConfig, transport: Arc<dyn ChatTransport>, rng: SmallRng) -> Self {
        Self {
            config: config.normalized(),
            transport,
            memory: MoveMemory::default(),
            rng,
            retry_delay: RETRY_DELAY,
        }
    }

    /// Override the pause between attempts.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn config(&self) -> &ExternalConfig {
        &self.config
    }

    pub fn memory(&self) -> &MoveMemory {
        &self.memory
    }

    /// Ask the service for a single move with the given amount of context.
    pub async fn attempt(&self, view: &TargetView, level: ContextLevel) -> Result<Position, AttemptError> {
        let prompt = build_prompt(view, &self.memory, level);
        if self.config.debug {
            info!("prompt ({:?}):\n{}", level, prompt);
        } else {
            debug!("prompt ({:?}):\n{}", level, prompt);
        }

        let request = ChatRequest::user(prompt, &self.config);
        let body = serde_json::to_value(&request).map_err(|e| AttemptError::Malformed(e.to_string()))?;
        let reply = self
            .transport
            .post_json(&self.config.url(CHAT_COMPLETIONS_PATH), body)
            .await
            .map_err(|e| AttemptError::Transport(e.to_string()))?;
        let response: ChatResponse =
            serde_json::from_value(reply).map_err(|e| AttemptError::Malformed(e.to_string()))?;
        let text = response.text().ok_or(AttemptError::Empty)?;
        debug!("service replied {:?}", text);

        let target = parse_coordinate(text).ok_or_else(|| AttemptError::Unparseable(text.to_string()))?;
        if !view.is_untargeted(target) {
            return Err(AttemptError::AlreadyTargeted(target));
        }
        Ok(target)
    }

    /// List the models served at the configured endpoint.
    pub async fn check_connection(&self) -> ConnectionReport {
        let url = self.config.url(MODELS_PATH);
        let listed = match self.transport.get_json(&url).await {
            Ok(reply) => serde_json::from_value::<ModelList>(reply).map_err(anyhow::Error::from),
            Err(e) => Err(e),
        };
        match listed {
            Ok(list) => {
                let models = list.ids();
                info!("connected to {}, {} model(s) available", self.config.endpoint, models.len());
                ConnectionReport {
                    success: true,
                    models,
                    error: None,
                }
            }
            Err(e) => {
                error!("connection check against {} failed: {}", url, e);
                ConnectionReport {
                    success: false,
                    models: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl MoveSource for ExternalMoveSource {
    fn name(&self) -> &'static str {
        "external"
    }

    async fn next_move(&mut self, view: &TargetView) -> Position {
        for (attempt, level) in RetryPlan::new() {
            if attempt > 0 && !self.retry_delay.is_zero() {
                tokio::time::sleep(self.retry_delay).await;
            }
            match self.attempt(view, level).await {
                Ok(target) => {
                    self.memory.push_event(format!("Targeted {}", target));
                    return target;
                }
                Err(e) => warn!("attempt {} ({:?}) failed: {}", attempt + 1, level, e),
            }
        }

        let target = hunt_target(view, &mut self.rng);
        warn!("service gave no usable move, falling back to {}", target);
        target
    }

    fn record_outcome(&mut self, target: Position, outcome: ShotOutcome) {
        self.memory.record(target, outcome);
    }

    fn update_config(&mut self, config: ExternalConfig) {
        self.config = config.normalized();
        info!("external source now using {} ({})", self.config.endpoint, self.config.model);
    }

    fn reset(&mut self) {
        self.memory.clear();
        debug!("external source memory cleared");
    }
}
