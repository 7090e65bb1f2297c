use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use haggle_agent::BotRuntime;
use haggle_core::errors::HandlerError;
use haggle_whatsapp::{decode, InboundError, MessageSender};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<BotRuntime>,
    pub sender: Arc<dyn MessageSender>,
}

pub fn router(state: AppState) -> Router {
    Router::new().route("/", get(index)).route("/webhook", post(webhook)).with_state(state)
}

async fn index() -> &'static str {
    "Welcome to Haggle! The API is running."
}

#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
}

/// One request, one reply. Every failure past this point is converted to
/// reply text; the inbound caller always gets a 200 acknowledgment once the
/// payload was readable enough to answer.
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<WebhookResponse>) {
    let correlation_id = Uuid::new_v4().to_string();
    let content_type = headers.get(CONTENT_TYPE).and_then(|value| value.to_str().ok());

    let message = match decode(content_type, &body) {
        Ok(message) => message,
        Err(InboundError::NoMessages) => {
            info!(
                event_name = "webhook.no_messages",
                correlation_id,
                "inbound payload carried no messages"
            );
            return (
                StatusCode::OK,
                Json(WebhookResponse { status: "No messages received.", reply: None }),
            );
        }
        Err(error) => {
            let handler_error = HandlerError::malformed(error.to_string(), correlation_id.clone());
            warn!(
                event_name = "webhook.malformed",
                correlation_id,
                error = %handler_error,
                "rejecting malformed inbound payload with an apology reply"
            );
            return (
                StatusCode::OK,
                Json(WebhookResponse {
                    status: "Malformed message",
                    reply: Some(handler_error.user_message().to_string()),
                }),
            );
        }
    };

    info!(
        event_name = "webhook.received",
        correlation_id,
        sender = %message.sender_id,
        query_chars = message.query_text.len(),
        "inbound message accepted"
    );

    let reply = state.runtime.handle(&message.query_text, &correlation_id).await;

    let status = match state.sender.send(&reply, &message.sender_id).await {
        Ok(()) => "Message sent",
        Err(error) => {
            let handler_error = HandlerError::external(error.to_string(), correlation_id.clone());
            warn!(
                event_name = "webhook.send_failed",
                correlation_id,
                error = %handler_error,
                "outbound send failed, reply returned in the webhook response only"
            );
            "Failed to send message"
        }
    };

    (StatusCode::OK, Json(WebhookResponse { status, reply: Some(reply) }))
}
