use std::time::Duration;

use async_trait::async_trait;
use haggle_core::config::LlmConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::llm::{CompletionClient, CompletionError};

/// Chat-completions client for any OpenAI-compatible endpoint (hosted APIs,
/// Ollama, LM Studio). The request timeout is mandatory: a stalled completion
/// call must not hang a webhook request.
pub struct OpenAiChatClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<SecretString>,
}

impl OpenAiChatClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self, CompletionError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| CompletionError::Request(error.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, CompletionError> {
        Self::new(
            config.base_url.clone(),
            config.model.clone(),
            config.api_key.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl CompletionClient for OpenAiChatClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError> {
        let url = format!("{}/chat/completions", self.base_url);
        let payload = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
        };

        let mut request = self.http.post(&url).json(&payload);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|error| CompletionError::Request(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status { status: status.as_u16(), body });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|error| CompletionError::Request(error.to_string()))?;

        debug!(
            event_name = "llm.completion.parsed",
            choice_count = parsed.choices.len(),
            "completion response parsed"
        );

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(CompletionError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::{ChatMessage, ChatRequest, ChatResponse};

    #[test]
    fn request_payload_matches_the_chat_completions_shape() {
        let payload = ChatRequest {
            model: "llama3.1",
            messages: [
                ChatMessage { role: "system", content: "persona" },
                ChatMessage { role: "user", content: "context" },
            ],
        };

        let json = serde_json::to_value(&payload).expect("serialize");
        assert_eq!(json["model"], "llama3.1");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "context");
    }

    #[test]
    fn response_content_is_read_from_the_first_choice() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"hello"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).expect("parse");

        let content = parsed.choices.into_iter().next().and_then(|c| c.message.content);
        assert_eq!(content.as_deref(), Some("hello"));
    }

    #[test]
    fn responses_without_choices_parse_to_an_empty_list() {
        let parsed: ChatResponse = serde_json::from_str("{}").expect("parse");
        assert!(parsed.choices.is_empty());
    }
}
