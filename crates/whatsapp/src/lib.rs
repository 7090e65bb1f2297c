//! WhatsApp transport boundary: decoding inbound webhook payloads (Twilio
//! form posts and Cloud-API JSON) and dispatching outbound replies.

pub mod inbound;
pub mod sender;

pub use inbound::{decode, InboundError, InboundMessage};
pub use sender::{MessageSender, NoopSender, RecordingSender, SendError, TwilioSender};
