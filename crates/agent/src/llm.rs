use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Request(String),
    #[error("completion endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("completion response had no usable content")]
    EmptyResponse,
}

/// Boundary to the external chat-completion service. The runtime only ever
/// sees this trait, so tests substitute doubles and never touch the network.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError>;
}

/// Test double returning a canned reply.
pub struct FixedCompletionClient {
    reply: String,
}

impl FixedCompletionClient {
    pub fn new(reply: impl Into<String>) -> Self {
        Self { reply: reply.into() }
    }
}

#[async_trait]
impl CompletionClient for FixedCompletionClient {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, CompletionError> {
        Ok(self.reply.clone())
    }
}

/// Test double that fails every call, for degraded-path coverage.
#[derive(Default)]
pub struct FailingCompletionClient;

#[async_trait]
impl CompletionClient for FailingCompletionClient {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, CompletionError> {
        Err(CompletionError::Request("simulated completion outage".to_string()))
    }
}
