use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::{json, Value};

use crate::transport::ChatTransport;

#[derive(Default)]
struct Script {
    replies: VecDeque<Result<Value, String>>,
    repeat: Option<Result<Value, String>>,
    models: Vec<String>,
    requests: Vec<(String, Value)>,
}

/// In-process transport that answers from a queue of canned replies.
///
/// Clones share the same script, so a test can keep a handle for
/// inspection after moving one into a move source.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Chat reply in the `choices[0].message.content` shape.
    pub fn chat_reply(text: &str) -> Value {
        json!({
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": text } }]
        })
    }

    /// Queue a chat reply carrying `text`.
    pub fn push_text(&self, text: &str) -> &Self {
        self.push_json(Self::chat_reply(text))
    }

    /// Queue an arbitrary JSON reply.
    pub fn push_json(&self, reply: Value) -> &Self {
        self.script().replies.push_back(Ok(reply));
        self
    }

    /// Queue a transport failure.
    pub fn push_error(&self, message: &str) -> &Self {
        self.script().replies.push_back(Err(message.to_string()));
        self
    }

    /// Reply with `text` whenever the queue is empty.
    pub fn repeat_text(&self, text: &str) -> &Self {
        self.script().repeat = Some(Ok(Self::chat_reply(text)));
        self
    }

    /// Fail whenever the queue is empty.
    pub fn repeat_error(&self, message: &str) -> &Self {
        self.script().repeat = Some(Err(message.to_string()));
        self
    }

    /// Model ids listed by `GET …/v1/models`.
    pub fn set_models(&self, models: &[&str]) -> &Self {
        self.script().models = models.iter().map(|m| m.to_string()).collect();
        self
    }

    /// Bodies of every POST seen so far, oldest first.
    pub fn posted(&self) -> Vec<Value> {
        self.script()
            .requests
            .iter()
            .map(|(_, body)| body.clone())
            .collect()
    }

    /// URLs of every request seen so far, oldest first.
    pub fn urls(&self) -> Vec<String> {
        self.script()
            .requests
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }
}

#[async_trait::async_trait]
impl ChatTransport for ScriptedTransport {
    async fn post_json(&self, url: &str, body: Value) -> anyhow::Result<Value> {
        let mut script = self.script();
        script.requests.push((url.to_string(), body));
        let reply = match script.replies.pop_front() {
            Some(reply) => reply,
            None => script
                .repeat
                .clone()
                .unwrap_or_else(|| Err("no scripted reply left".to_string())),
        };
        reply.map_err(|e| anyhow::anyhow!(e))
    }

    async fn get_json(&self, url: &str) -> anyhow::Result<Value> {
        let mut script = self.script();
        script.requests.push((url.to_string(), Value::Null));
        if !url.ends_with("/v1/models") {
            return Err(anyhow::anyhow!("404 Not Found: {}", url));
        }
        if script.models.is_empty() {
            return Err(anyhow::anyhow!("connection refused: {}", url));
        }
        let data: Vec<Value> = script.models.iter().map(|id| json!({ "id": id })).collect();
        Ok(json!({ "object": "list", "data": data }))
    }
}
