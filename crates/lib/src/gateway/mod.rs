//! Gateway: Messenger webhook HTTP server.
//!
//! `GET /webhook` answers the subscription handshake, `POST /webhook` receives
//! events and queues replies for delivery, `GET /` is a health probe.

mod server;
mod verify;

pub use server::{router, run_gateway, spawn_delivery, GatewayState};
pub use verify::{verify_subscription, Verification, VerifyQuery};
