//! Gateway HTTP server (webhook + health on a single port).

use crate::channels::{ChannelHandle, MessengerChannel, OutboundMessage, WebhookBody};
use crate::config::{self, Config};
use crate::dispatch;
use crate::gateway::verify::{verify_subscription, Verification, VerifyQuery};
use crate::responses::Responder;
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Acknowledgement body for accepted webhook events.
const EVENT_RECEIVED: &str = "EVENT_RECEIVED";

/// Replies waiting for delivery. When full, new replies are dropped.
const OUTBOUND_QUEUE_CAPACITY: usize = 64;

/// Shared state for the gateway handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub config: Arc<Config>,
    /// Resolved webhook verify token. When None every handshake is rejected.
    pub verify_token: Option<String>,
    pub responder: Arc<Responder>,
    /// Replies for the delivery task.
    pub outbound_tx: mpsc::Sender<OutboundMessage>,
}

/// Routes: `GET /`, `GET /webhook`, `POST /webhook`.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(health_http))
        .route("/webhook", get(verify_webhook).post(receive_webhook))
        .with_state(state)
}

/// Drain the outbound queue into `channel`. Failures are logged and not retried.
/// The task ends when every sender has been dropped.
pub fn spawn_delivery(
    channel: Arc<dyn ChannelHandle>,
    mut outbound_rx: mpsc::Receiver<OutboundMessage>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = outbound_rx.recv().await {
            match channel.send_payload(&msg.recipient_id, &msg.payload).await {
                Ok(()) => log::debug!(
                    "{}: sent {} reply to {}",
                    channel.id(),
                    msg.payload.kind(),
                    msg.recipient_id
                ),
                Err(e) => log::warn!(
                    "{}: unable to send reply to {}: {}",
                    channel.id(),
                    msg.recipient_id,
                    e
                ),
            }
        }
        log::info!("{}: delivery queue closed", channel.id());
    })
}

/// Run the gateway server; binds to config.gateway.bind:config.gateway.port.
/// Missing Messenger secrets are logged but do not stop start-up.
/// Blocks until shutdown (e.g. Ctrl+C), then drains queued replies.
pub async fn run_gateway(config: Config) -> Result<()> {
    let page_access_token = config::resolve_page_access_token(&config);
    if page_access_token.is_none() {
        log::warn!("page access token not configured (set PAGE_ACCESS_TOKEN); replies will not be delivered");
    }
    let verify_token = config::resolve_verify_token(&config);
    if verify_token.is_none() {
        log::warn!("verify token not configured (set VERIFY_TOKEN); webhook handshakes will be rejected");
    }

    let channel = Arc::new(MessengerChannel::new(
        page_access_token,
        config.messenger.api_base.clone(),
    ));
    log::info!("messenger channel sending to {}", channel.api_base());
    let (outbound_tx, outbound_rx) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);
    let delivery = spawn_delivery(channel, outbound_rx);

    let bind_addr = format!("{}:{}", config.gateway.bind.trim(), config.gateway.port);
    let state = GatewayState {
        config: Arc::new(config),
        verify_token,
        responder: Arc::new(Responder::default()),
        outbound_tx,
    };
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("gateway listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("gateway server exited")?;

    // The router (and every outbound sender) is gone; wait for queued replies.
    finish_delivery(delivery).await;
    log::info!("gateway stopped");
    Ok(())
}

/// Wait for the delivery task. A panic or cancellation is logged, not propagated.
async fn finish_delivery(delivery: JoinHandle<()>) {
    if let Err(e) = delivery.await {
        log::warn!("delivery task ended abnormally: {}", e);
    }
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received, draining connections");
}

/// GET / returns a simple health JSON (for probes).
async fn health_http(State(state): State<GatewayState>) -> Json<serde_json::Value> {
    Json(json!({
        "runtime": "running",
        "port": state.config.gateway.port,
    }))
}

/// GET /webhook: subscription handshake; echoes hub.challenge when the token matches.
async fn verify_webhook(
    State(state): State<GatewayState>,
    Query(query): Query<VerifyQuery>,
) -> Response {
    match verify_subscription(&query, state.verify_token.as_deref()) {
        Verification::Verified(challenge) => {
            log::info!("webhook verified");
            (StatusCode::OK, challenge).into_response()
        }
        Verification::Rejected => {
            log::warn!("webhook verification rejected");
            StatusCode::FORBIDDEN.into_response()
        }
        Verification::Incomplete => StatusCode::BAD_REQUEST.into_response(),
    }
}

/// POST /webhook: receives page events; dispatches each and queues the reply.
async fn receive_webhook(State(state): State<GatewayState>, body: Bytes) -> Response {
    let body = match WebhookBody::decode(&body) {
        Ok(Some(b)) => b,
        Ok(None) => return StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            log::debug!("webhook: undecodable body: {}", e);
            return StatusCode::BAD_REQUEST.into_response();
        }
    };
    for event in body.into_events() {
        let payload = dispatch::dispatch_event(&state.responder, &event);
        let outbound = OutboundMessage {
            recipient_id: event.sender_id,
            payload,
        };
        if let Err(e) = state.outbound_tx.try_send(outbound) {
            log::warn!("webhook: dropping reply: {}", e);
        }
    }
    (StatusCode::OK, EVENT_RECEIVED).into_response()
}
