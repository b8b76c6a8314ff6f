//! Request/response primitive used to reach a chat-completion service.

use serde_json::Value;

/// JSON over some request/response channel. Implementations decide how the
/// bytes travel; callers only see decoded JSON or an error.
#[async_trait::async_trait]
pub trait ChatTransport: Send + Sync {
    /// POST `body` to `url` and return the decoded JSON reply.
    async fn post_json(&self, url: &str, body: Value) -> anyhow::Result<Value>;

    /// GET `url` and return the decoded JSON reply.
    async fn get_json(&self, url: &str) -> anyhow::Result<Value>;
}

pub mod in_memory;
pub use in_memory::ScriptedTransport;
