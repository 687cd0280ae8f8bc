//! Inbound event from a channel, already decoded from the platform's webhook body.

use crate::nlp::EntitySet;

/// One event from one sender: a typed message or a button postback.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    pub sender_id: String,
    pub kind: InboundKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InboundKind {
    Message(InboundMessage),
    /// Payload string of a button click or quick reply.
    Postback(String),
}

/// A typed message. `text` is `None` for attachment-only messages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InboundMessage {
    pub text: Option<String>,
    pub entities: EntitySet,
}
