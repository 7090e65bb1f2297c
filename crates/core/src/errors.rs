use thiserror::Error;

/// Boundary error for the webhook handler. Everything that can go wrong past
/// the matcher/selector/composer pipeline is folded into one of these and
/// converted to reply text; nothing propagates to the transport layer.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum HandlerError {
    #[error("malformed inbound payload: {message}")]
    MalformedInput { message: String, correlation_id: String },
    #[error("external service failure: {message}")]
    ExternalService { message: String, correlation_id: String },
}

impl HandlerError {
    pub fn malformed(message: impl Into<String>, correlation_id: impl Into<String>) -> Self {
        Self::MalformedInput { message: message.into(), correlation_id: correlation_id.into() }
    }

    pub fn external(message: impl Into<String>, correlation_id: impl Into<String>) -> Self {
        Self::ExternalService { message: message.into(), correlation_id: correlation_id.into() }
    }

    /// User-visible apology text. Deterministic and free of internal detail.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MalformedInput { .. } => {
                "Sorry, I couldn't read your message. Please send it again as plain text."
            }
            Self::ExternalService { .. } => {
                "Sorry, something went wrong on my side. Please try again in a moment."
            }
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::MalformedInput { correlation_id, .. }
            | Self::ExternalService { correlation_id, .. } => correlation_id,
        }
    }
}
