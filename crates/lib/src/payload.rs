//! Send API message payloads.
//!
//! These serialize to the exact JSON shapes the Messenger platform accepts for
//! text, quick replies, and generic/button/receipt templates.

use serde::Serialize;

/// The `message` object of a Send API request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponsePayload {
    /// `{text}`
    Text { text: String },
    /// `{text, quick_replies}`
    QuickReplies {
        text: String,
        quick_replies: Vec<QuickReply>,
    },
    /// `{attachment: {type: "template", payload}}`
    Attachment { attachment: Attachment },
}

impl ResponsePayload {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn quick_replies(text: impl Into<String>, quick_replies: Vec<QuickReply>) -> Self {
        Self::QuickReplies {
            text: text.into(),
            quick_replies,
        }
    }

    /// Carousel of cards.
    pub fn generic(elements: Vec<GenericElement>) -> Self {
        Self::template(Template::Generic { elements })
    }

    pub fn buttons(text: impl Into<String>, buttons: Vec<TemplateButton>) -> Self {
        Self::template(Template::Button {
            text: text.into(),
            buttons,
        })
    }

    pub fn receipt(receipt: ReceiptTemplate) -> Self {
        Self::template(Template::Receipt(receipt))
    }

    fn template(payload: Template) -> Self {
        Self::Attachment {
            attachment: Attachment {
                kind: AttachmentKind::Template,
                payload,
            },
        }
    }

    /// Short name of the payload shape, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::QuickReplies { .. } => "quick_replies",
            Self::Attachment { attachment } => match attachment.payload {
                Template::Generic { .. } => "generic",
                Template::Button { .. } => "button",
                Template::Receipt(_) => "receipt",
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickReply {
    pub content_type: ContentType,
    pub title: String,
    pub payload: String,
}

impl QuickReply {
    pub fn text(title: impl Into<String>, payload: impl ToString) -> Self {
        Self {
            content_type: ContentType::Text,
            title: title.into(),
            payload: payload.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    Template,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attachment {
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
    pub payload: Template,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "template_type", rename_all = "snake_case")]
pub enum Template {
    Generic {
        elements: Vec<GenericElement>,
    },
    Button {
        text: String,
        buttons: Vec<TemplateButton>,
    },
    Receipt(ReceiptTemplate),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonKind {
    Postback,
}

/// A carousel card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenericElement {
    pub title: String,
    pub subtitle: String,
    pub image_url: String,
    pub buttons: Vec<PostbackButton>,
}

/// Card button: `{type: "postback", title, payload}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostbackButton {
    #[serde(rename = "type")]
    pub kind: ButtonKind,
    pub title: String,
    pub payload: String,
}

impl PostbackButton {
    pub fn new(title: impl Into<String>, payload: impl ToString) -> Self {
        Self {
            kind: ButtonKind::Postback,
            title: title.into(),
            payload: payload.to_string(),
        }
    }
}

/// Button template button. Labelled by `text`, not `title`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateButton {
    #[serde(rename = "type")]
    pub kind: ButtonKind,
    pub text: String,
    pub payload: String,
}

impl TemplateButton {
    pub fn postback(text: impl Into<String>, payload: impl ToString) -> Self {
        Self {
            kind: ButtonKind::Postback,
            text: text.into(),
            payload: payload.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceiptTemplate {
    pub recipient_name: String,
    pub order_number: String,
    pub currency: String,
    pub payment_method: String,
    pub summary: ReceiptSummary,
    pub elements: Vec<ReceiptElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceiptSummary {
    pub subtotal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceiptElement {
    pub title: String,
    pub subtitle: String,
    pub quantity: u32,
    pub price: f64,
    pub currency: String,
    pub image_url: String,
}
