//! MINDS Messenger bot library: NLP entity model, intent and postback routing,
//! reply builders, the Messenger channel, and the webhook gateway used by the CLI.

pub mod catalog;
pub mod channels;
pub mod config;
pub mod dispatch;
pub mod gateway;
pub mod init;
pub mod intent;
pub mod nlp;
pub mod payload;
pub mod responses;
