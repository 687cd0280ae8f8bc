//! Messenger channel: decode webhook POST bodies and send replies via the Send API.

use crate::channels::handle::ChannelHandle;
use crate::channels::inbound::{InboundEvent, InboundKind, InboundMessage};
use crate::nlp::EntitySet;
use crate::payload::ResponsePayload;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const GRAPH_API_BASE: &str = "https://graph.facebook.com/v2.6";

/// Object type of webhook bodies from a page subscription.
pub const PAGE_OBJECT: &str = "page";

/// Webhook POST body of a page subscription.
#[derive(Debug, Deserialize)]
pub struct WebhookBody {
    #[serde(default)]
    pub entry: Vec<WebhookEntry>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookEntry {
    #[serde(default)]
    pub messaging: Vec<MessagingEvent>,
}

#[derive(Debug, Deserialize)]
pub struct MessagingEvent {
    pub sender: Participant,
    #[serde(default)]
    pub message: Option<MessengerMessage>,
    #[serde(default)]
    pub postback: Option<MessengerPostback>,
}

#[derive(Debug, Deserialize)]
pub struct Participant {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct MessengerMessage {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub quick_reply: Option<MessengerQuickReply>,
    #[serde(default)]
    pub nlp: Option<MessengerNlp>,
}

#[derive(Debug, Deserialize)]
pub struct MessengerQuickReply {
    pub payload: String,
}

#[derive(Debug, Deserialize)]
pub struct MessengerNlp {
    #[serde(default)]
    pub entities: EntitySet,
}

#[derive(Debug, Deserialize)]
pub struct MessengerPostback {
    #[serde(default)]
    pub payload: String,
}

impl WebhookBody {
    /// Decode a POST body. `Ok(None)` for any JSON whose `object` is not a page,
    /// whatever the rest of its shape. Errors are bytes that are not JSON, or a
    /// page body whose entries cannot be decoded.
    pub fn decode(bytes: &[u8]) -> Result<Option<Self>, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_slice(bytes)?;
        let object = value.get("object");
        if object.and_then(serde_json::Value::as_str) != Some(PAGE_OBJECT) {
            log::debug!("messenger: ignoring webhook object {:?}", object);
            return Ok(None);
        }
        serde_json::from_value(value).map(Some)
    }

    /// First messaging event of each entry, decoded. Entries carrying neither a
    /// message nor a postback (delivery and read receipts) are skipped.
    pub fn into_events(self) -> Vec<InboundEvent> {
        self.entry
            .into_iter()
            .filter_map(|entry| entry.messaging.into_iter().next())
            .filter_map(MessagingEvent::into_inbound)
            .collect()
    }
}

impl MessagingEvent {
    /// A message wins over a postback. Quick-reply taps carry a postback payload
    /// inside the message and are routed as postbacks. The button label is not
    /// sent through NLP; the payload names the action exactly.
    pub fn into_inbound(self) -> Option<InboundEvent> {
        let sender_id = self.sender.id;
        let kind = if let Some(message) = self.message {
            match message.quick_reply {
                Some(quick_reply) => InboundKind::Postback(quick_reply.payload),
                None => InboundKind::Message(InboundMessage {
                    text: message.text,
                    entities: message.nlp.map(|nlp| nlp.entities).unwrap_or_default(),
                }),
            }
        } else if let Some(postback) = self.postback {
            InboundKind::Postback(postback.payload)
        } else {
            log::debug!("messenger: ignoring event without message or postback from {}", sender_id);
            return None;
        };
        Some(InboundEvent { sender_id, kind })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("page access token not configured")]
    MissingToken,
    #[error("send api request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("send api error: {status} {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
}

#[derive(Serialize)]
struct SendRequest<'a> {
    recipient: Recipient<'a>,
    message: &'a ResponsePayload,
}

#[derive(Serialize)]
struct Recipient<'a> {
    id: &'a str,
}

/// Messenger connector: posts replies to the Send API with the page access token.
pub struct MessengerChannel {
    id: String,
    page_access_token: Option<String>,
    api_base: String,
    client: reqwest::Client,
}

impl MessengerChannel {
    /// `api_base` defaults to the Graph API; tests point it at a local stub.
    pub fn new(page_access_token: Option<String>, api_base: Option<String>) -> Self {
        let api_base = api_base
            .map(|u| u.trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| GRAPH_API_BASE.to_string());
        Self {
            id: "messenger".to_string(),
            page_access_token,
            api_base,
            client: reqwest::Client::new(),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// POST /me/messages with `{recipient: {id}, message}`.
    pub async fn send_message(
        &self,
        recipient_id: &str,
        payload: &ResponsePayload,
    ) -> Result<(), SendError> {
        let token = self
            .page_access_token
            .as_deref()
            .ok_or(SendError::MissingToken)?;
        let url = format!("{}/me/messages", self.api_base);
        let body = SendRequest {
            recipient: Recipient { id: recipient_id },
            message: payload,
        };
        let res = self
            .client
            .post(&url)
            .query(&[("access_token", token)])
            .json(&body)
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(SendError::Api { status, body });
        }
        Ok(())
    }
}

#[async_trait]
impl ChannelHandle for MessengerChannel {
    fn id(&self) -> &str {
        &self.id
    }

    async fn send_payload(
        &self,
        recipient_id: &str,
        payload: &ResponsePayload,
    ) -> Result<(), SendError> {
        MessengerChannel::send_message(self, recipient_id, payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::kind;

    #[test]
    fn decodes_message_with_nlp_entities() {
        let body = WebhookBody::decode(
            r#"{
                "object": "page",
                "entry": [{
                    "id": "page-1",
                    "time": 1458692752478,
                    "messaging": [{
                        "sender": { "id": "1254459154682919" },
                        "recipient": { "id": "page-1" },
                        "message": {
                            "mid": "m1",
                            "text": "hello",
                            "nlp": { "entities": { "greetings": [{ "value": "true", "confidence": 0.99 }] } }
                        }
                    }]
                }]
            }"#
            .as_bytes(),
        )
        .unwrap()
        .expect("page body");
        let events = body.into_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].sender_id, "1254459154682919");
        let InboundKind::Message(ref message) = events[0].kind else {
            panic!("expected message, got {:?}", events[0].kind);
        };
        assert_eq!(message.text.as_deref(), Some("hello"));
        assert!(message.entities.pick_best(kind::GREETINGS).unwrap().exceeds(0.8));
    }

    #[test]
    fn only_first_messaging_event_of_each_entry_is_used() {
        let body: WebhookBody = serde_json::from_str(
            r#"{
                "object": "page",
                "entry": [
                    { "messaging": [
                        { "sender": { "id": "a" }, "postback": { "payload": "cart_view" } },
                        { "sender": { "id": "b" }, "postback": { "payload": "checkout" } }
                    ]},
                    { "messaging": [
                        { "sender": { "id": "c" }, "message": { "text": "hi" } }
                    ]},
                    { "messaging": [] }
                ]
            }"#,
        )
        .unwrap();
        let events = body.into_events();
        let senders: Vec<_> = events.iter().map(|e| e.sender_id.as_str()).collect();
        assert_eq!(senders, ["a", "c"]);
        assert_eq!(events[0].kind, InboundKind::Postback("cart_view".to_string()));
        let InboundKind::Message(ref message) = events[1].kind else {
            panic!("expected message");
        };
        assert_eq!(message.entities, EntitySet::new());
    }

    #[test]
    fn quick_reply_tap_is_routed_as_postback() {
        let event: MessagingEvent = serde_json::from_str(
            r#"{
                "sender": { "id": "a" },
                "message": { "text": "View Cart", "quick_reply": { "payload": "cart_view" } }
            }"#,
        )
        .unwrap();
        let inbound = event.into_inbound().unwrap();
        assert_eq!(inbound.kind, InboundKind::Postback("cart_view".to_string()));
    }

    #[test]
    fn delivery_receipts_are_skipped() {
        let event: MessagingEvent = serde_json::from_str(
            r#"{ "sender": { "id": "a" }, "delivery": { "watermark": 1 } }"#,
        )
        .unwrap();
        assert!(event.into_inbound().is_none());
    }

    #[test]
    fn non_page_json_of_any_shape_is_not_a_page_body() {
        for raw in [
            r#"{ "object": "user" }"#,
            r#"{ "object": "user", "entry": [{ "messaging": [{ "foo": 1 }] }] }"#,
            r#"{ "object": 5 }"#,
            r#"{ "object": "instagram", "entry": { "x": 1 } }"#,
            r#"[1, 2]"#,
        ] {
            assert!(WebhookBody::decode(raw.as_bytes()).unwrap().is_none(), "{}", raw);
        }
    }

    #[test]
    fn undecodable_bytes_and_malformed_page_entries_are_errors() {
        assert!(WebhookBody::decode(b"{ not json").is_err());
        assert!(WebhookBody::decode(br#"{ "object": "page", "entry": { "x": 1 } }"#).is_err());
    }

    #[test]
    fn api_base_defaults_to_graph_api() {
        assert_eq!(MessengerChannel::new(None, None).api_base(), GRAPH_API_BASE);
        assert_eq!(
            MessengerChannel::new(None, Some("http://127.0.0.1:9/".to_string())).api_base(),
            "http://127.0.0.1:9"
        );
    }

    #[tokio::test]
    async fn send_without_token_fails_before_request() {
        let channel = MessengerChannel::new(None, Some("http://127.0.0.1:9".to_string()));
        let err = channel
            .send_message("a", &ResponsePayload::text("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, SendError::MissingToken));
    }
}
