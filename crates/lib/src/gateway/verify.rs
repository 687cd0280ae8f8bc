//! Webhook subscription handshake (`GET /webhook?hub.mode=..&hub.verify_token=..&hub.challenge=..`).

use serde::Deserialize;

const SUBSCRIBE_MODE: &str = "subscribe";

/// Handshake query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct VerifyQuery {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// Outcome of a handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// Echo this challenge with 200.
    Verified(String),
    /// Wrong mode or token, or no token configured: 403.
    Rejected,
    /// Mode or token missing from the request.
    Incomplete,
}

/// Accept when mode is `subscribe` and the token equals `expected`.
pub fn verify_subscription(query: &VerifyQuery, expected: Option<&str>) -> Verification {
    let (Some(mode), Some(token)) = (query.mode.as_deref(), query.verify_token.as_deref()) else {
        return Verification::Incomplete;
    };
    match expected {
        Some(expected) if mode == SUBSCRIBE_MODE && token == expected => {
            Verification::Verified(query.challenge.clone().unwrap_or_default())
        }
        _ => Verification::Rejected,
    }
}
