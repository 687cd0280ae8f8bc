//! Communication channels (Facebook Messenger).
//!
//! Inbound webhook bodies are decoded into [`InboundEvent`]s for the dispatchers;
//! replies leave through a [`ChannelHandle`].

mod handle;
mod inbound;
mod messenger;

pub use handle::{ChannelHandle, OutboundMessage};
pub use inbound::{InboundEvent, InboundKind, InboundMessage};
pub use messenger::{MessengerChannel, SendError, WebhookBody};
