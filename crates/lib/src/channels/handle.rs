//! Outbound side of a channel: deliver a reply payload to a recipient.

use crate::channels::SendError;
use crate::payload::ResponsePayload;
use async_trait::async_trait;

/// A reply queued for delivery.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub recipient_id: String,
    pub payload: ResponsePayload,
}

/// Handle to a channel that can send replies.
#[async_trait]
pub trait ChannelHandle: Send + Sync {
    /// Channel id (e.g. "messenger").
    fn id(&self) -> &str;
    /// Send one payload to one recipient.
    async fn send_payload(&self, recipient_id: &str, payload: &ResponsePayload) -> Result<(), SendError>;
}
