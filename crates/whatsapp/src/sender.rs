use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use haggle_core::config::WhatsappConfig;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{debug, info};

const SEND_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum SendError {
    #[error("message send request failed: {0}")]
    Request(String),
    #[error("message provider returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("message sender is not configured")]
    NotConfigured,
}

/// Outbound dispatch boundary. Success or failure must be observable to the
/// webhook handler so it can report send status, but a failed send never
/// aborts reply composition.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, body: &str, to: &str) -> Result<(), SendError>;
}

/// Stand-in used when provider credentials are absent; the reply still
/// travels back in the webhook HTTP response.
#[derive(Default)]
pub struct NoopSender;

#[async_trait]
impl MessageSender for NoopSender {
    async fn send(&self, body: &str, to: &str) -> Result<(), SendError> {
        debug!(
            event_name = "whatsapp.send.noop",
            to,
            reply_chars = body.len(),
            "outbound send skipped, no provider credentials configured"
        );
        Ok(())
    }
}

/// Twilio REST sender: form-encoded POST to the Messages endpoint with basic
/// auth.
pub struct TwilioSender {
    http: reqwest::Client,
    api_base_url: String,
    account_sid: String,
    auth_token: SecretString,
    from_number: String,
}

impl TwilioSender {
    /// Returns `None` unless the config carries full provider credentials.
    pub fn from_config(config: &WhatsappConfig) -> Option<Result<Self, SendError>> {
        if !config.send_enabled() {
            return None;
        }

        let (Some(account_sid), Some(auth_token), Some(from_number)) =
            (&config.account_sid, &config.auth_token, &config.from_number)
        else {
            return Some(Err(SendError::NotConfigured));
        };

        let http = match reqwest::Client::builder().timeout(SEND_TIMEOUT).build() {
            Ok(http) => http,
            Err(error) => return Some(Err(SendError::Request(error.to_string()))),
        };

        Some(Ok(Self {
            http,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            account_sid: account_sid.clone(),
            auth_token: auth_token.clone(),
            from_number: from_number.clone(),
        }))
    }

    fn messages_url(&self) -> String {
        format!("{}/2010-04-01/Accounts/{}/Messages.json", self.api_base_url, self.account_sid)
    }
}

#[async_trait]
impl MessageSender for TwilioSender {
    async fn send(&self, body: &str, to: &str) -> Result<(), SendError> {
        let response = self
            .http
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .form(&[("To", to), ("From", self.from_number.as_str()), ("Body", body)])
            .send()
            .await
            .map_err(|error| SendError::Request(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SendError::Status { status: status.as_u16(), body });
        }

        info!(event_name = "whatsapp.send.ok", to, "outbound message accepted by provider");
        Ok(())
    }
}

/// In-memory sender for handler tests: records every dispatch.
#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self { sent: Mutex::new(Vec::new()), fail: true }
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().expect("sent lock").clone()
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send(&self, body: &str, to: &str) -> Result<(), SendError> {
        if self.fail {
            return Err(SendError::Request("simulated provider outage".to_string()));
        }
        self.sent.lock().expect("sent lock").push((to.to_string(), body.to_string()));
        Ok(())
    }
}
