//! Dispatchers: resolve an inbound event to exactly one reply payload.
//!
//! Typed messages go through NLP intent routing, button clicks through the
//! postback table. Both end in [`resolve_or_default`], so every event gets a
//! reply.

mod message;
mod postback;

pub use message::{dispatch_entities, dispatch_message};
pub use postback::dispatch_postback;

use crate::channels::{InboundEvent, InboundKind};
use crate::payload::ResponsePayload;
use crate::responses::Responder;

/// Route one decoded event to its reply.
pub fn dispatch_event(responder: &Responder, event: &InboundEvent) -> ResponsePayload {
    match &event.kind {
        InboundKind::Message(message) => dispatch_message(responder, &event.sender_id, message),
        InboundKind::Postback(payload) => dispatch_postback(responder, &event.sender_id, payload),
    }
}

/// A route that produced nothing gets the fallback reply.
pub(crate) fn resolve_or_default(
    responder: &Responder,
    resolved: Option<ResponsePayload>,
) -> ResponsePayload {
    resolved.unwrap_or_else(|| responder.fallback().clone())
}
