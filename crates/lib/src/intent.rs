//! Parsed intents: NLP intent values and button postback payloads.
//!
//! Both are parsed once at the boundary into closed enums so routing is a plain
//! `match` instead of string comparisons.

use std::fmt;

/// Subcategory of an `enquiry` intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnquiryTopic {
    Product,
    General,
    Delivery,
}

impl EnquiryTopic {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "product" => Some(Self::Product),
            "general" => Some(Self::General),
            "delivery" => Some(Self::Delivery),
            _ => None,
        }
    }
}

/// Subcategory of a `cart` intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartAction {
    Add,
    View,
}

impl CartAction {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "add" => Some(Self::Add),
            "view" => Some(Self::View),
            _ => None,
        }
    }
}

/// Intent value `category[_subcategory]`. A missing or unknown subcategory is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Recommendation,
    Enquiry(Option<EnquiryTopic>),
    Cart(Option<CartAction>),
    /// Any other category; holds the raw intent value.
    Unrecognized(String),
}

impl Intent {
    /// Split on the first `_` into category and subcategory.
    pub fn parse(value: &str) -> Self {
        let (category, subcategory) = match value.split_once('_') {
            Some((category, sub)) => (category, Some(sub)),
            None => (value, None),
        };
        match category {
            "recommendation" => Self::Recommendation,
            "enquiry" => Self::Enquiry(subcategory.and_then(EnquiryTopic::parse)),
            "cart" => Self::Cart(subcategory.and_then(CartAction::parse)),
            _ => Self::Unrecognized(value.to_string()),
        }
    }
}

const CART_ADD: &str = "cart_add";
const CART_REMOVE: &str = "cart_remove";
const CART_VIEW: &str = "cart_view";
const ENQUIRY_PRODUCT: &str = "enquiry_product";
const CHECKOUT: &str = "checkout";
const PAID: &str = "paid";
const RECEIPT_VIEW: &str = "receipt_view";

/// Button/quick-reply payload: a keyword, then a space and a free-text argument.
///
/// `Display` renders the payload string, so the buttons we emit and the
/// payloads we parse share one definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostbackAction {
    CartAdd(String),
    /// Emitted by the cart carousel; no handler yet.
    CartRemove(String),
    CartView,
    EnquiryProduct(String),
    Checkout,
    Paid,
    ReceiptView,
    /// Unknown keyword; holds the whole raw payload.
    Unrecognized(String),
}

impl PostbackAction {
    /// Keyword is everything before the first space; argument is the remainder (possibly empty).
    pub fn parse(payload: &str) -> Self {
        let (keyword, argument) = payload.split_once(' ').unwrap_or((payload, ""));
        match keyword {
            CART_ADD => Self::CartAdd(argument.to_string()),
            CART_REMOVE => Self::CartRemove(argument.to_string()),
            CART_VIEW => Self::CartView,
            ENQUIRY_PRODUCT => Self::EnquiryProduct(argument.to_string()),
            CHECKOUT => Self::Checkout,
            PAID => Self::Paid,
            RECEIPT_VIEW => Self::ReceiptView,
            _ => Self::Unrecognized(payload.to_string()),
        }
    }
}

impl fmt::Display for PostbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CartAdd(name) => write!(f, "{} {}", CART_ADD, name),
            Self::CartRemove(name) => write!(f, "{} {}", CART_REMOVE, name),
            Self::CartView => f.write_str(CART_VIEW),
            Self::EnquiryProduct(name) => write!(f, "{} {}", ENQUIRY_PRODUCT, name),
            Self::Checkout => f.write_str(CHECKOUT),
            Self::Paid => f.write_str(PAID),
            Self::ReceiptView => f.write_str(RECEIPT_VIEW),
            Self::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_splits_on_first_underscore() {
        assert_eq!(Intent::parse("recommendation"), Intent::Recommendation);
        assert_eq!(
            Intent::parse("enquiry_delivery"),
            Intent::Enquiry(Some(EnquiryTopic::Delivery))
        );
        assert_eq!(Intent::parse("cart_add"), Intent::Cart(Some(CartAction::Add)));
        // "add_more" is the whole subcategory, which is unknown.
        assert_eq!(Intent::parse("cart_add_more"), Intent::Cart(None));
        assert_eq!(Intent::parse("enquiry"), Intent::Enquiry(None));
    }

    #[test]
    fn unknown_category_keeps_raw_value() {
        assert_eq!(
            Intent::parse("weather_today"),
            Intent::Unrecognized("weather_today".to_string())
        );
        assert_eq!(Intent::parse(""), Intent::Unrecognized(String::new()));
    }

    #[test]
    fn postback_argument_is_remainder_after_first_space() {
        assert_eq!(
            PostbackAction::parse("cart_add Earl Grey Sunflower Seeds Cookies"),
            PostbackAction::CartAdd("Earl Grey Sunflower Seeds Cookies".to_string())
        );
        assert_eq!(
            PostbackAction::parse("enquiry_product"),
            PostbackAction::EnquiryProduct(String::new())
        );
        assert_eq!(PostbackAction::parse("checkout"), PostbackAction::Checkout);
    }

    #[test]
    fn postback_keyword_match_is_exact() {
        assert_eq!(
            PostbackAction::parse("Checkout"),
            PostbackAction::Unrecognized("Checkout".to_string())
        );
        assert_eq!(
            PostbackAction::parse("unknown_thing foo"),
            PostbackAction::Unrecognized("unknown_thing foo".to_string())
        );
    }

    #[test]
    fn postback_display_renders_payload_string() {
        assert_eq!(
            PostbackAction::CartRemove("Cookies".to_string()).to_string(),
            "cart_remove Cookies"
        );
        assert_eq!(PostbackAction::ReceiptView.to_string(), "receipt_view");
        let action = PostbackAction::EnquiryProduct("Dark Chocolate Oatmeal Cookies".to_string());
        assert_eq!(PostbackAction::parse(&action.to_string()), action);
    }
}
