use serde::Deserialize;
use thiserror::Error;

/// Everything the pipeline needs from an inbound webhook payload, regardless
/// of which provider shape delivered it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundMessage {
    pub sender_id: String,
    pub query_text: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InboundError {
    #[error("inbound payload is missing the sender identifier")]
    MissingSender,
    #[error("inbound payload is missing the message body")]
    MissingBody,
    #[error("inbound payload carried no messages")]
    NoMessages,
    #[error("unrecognized inbound payload shape: {0}")]
    UnrecognizedShape(String),
}

/// Twilio-style form post: `From` and `Body` fields.
#[derive(Debug, Default, Deserialize)]
struct TwilioForm {
    #[serde(rename = "From")]
    from: Option<String>,
    #[serde(rename = "Body")]
    body: Option<String>,
}

/// Cloud-API-style JSON post: `{"messages":[{"from":..,"text":{"body":..}}]}`.
#[derive(Debug, Default, Deserialize)]
struct CloudApiPayload {
    #[serde(default)]
    messages: Vec<CloudApiMessage>,
}

#[derive(Debug, Default, Deserialize)]
struct CloudApiMessage {
    from: Option<String>,
    text: Option<CloudApiText>,
}

#[derive(Debug, Default, Deserialize)]
struct CloudApiText {
    body: Option<String>,
}

/// Decodes either provider shape into an `InboundMessage`. The content type
/// decides the parser; absent a content type, a leading `{` selects JSON.
pub fn decode(content_type: Option<&str>, body: &[u8]) -> Result<InboundMessage, InboundError> {
    let looks_like_json = match content_type {
        Some(value) => value.contains("json"),
        None => body.iter().find(|b| !b.is_ascii_whitespace()) == Some(&b'{'),
    };

    if looks_like_json {
        decode_cloud_api(body)
    } else {
        decode_form(body)
    }
}

fn decode_form(body: &[u8]) -> Result<InboundMessage, InboundError> {
    let form: TwilioForm = serde_urlencoded::from_bytes(body)
        .map_err(|error| InboundError::UnrecognizedShape(error.to_string()))?;

    build_message(form.from, form.body)
}

fn decode_cloud_api(body: &[u8]) -> Result<InboundMessage, InboundError> {
    let payload: CloudApiPayload = serde_json::from_slice(body)
        .map_err(|error| InboundError::UnrecognizedShape(error.to_string()))?;

    // Only the first message is answered; each webhook delivery is handled
    // independently and statelessly.
    let message = payload.messages.into_iter().next().ok_or(InboundError::NoMessages)?;
    build_message(message.from, message.text.and_then(|text| text.body))
}

fn build_message(
    sender: Option<String>,
    body: Option<String>,
) -> Result<InboundMessage, InboundError> {
    let sender_id = sender
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(InboundError::MissingSender)?;
    let query_text = body
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(InboundError::MissingBody)?;

    Ok(InboundMessage { sender_id, query_text })
}
