//! Typed-message routing over NLP entities.

use crate::channels::InboundMessage;
use crate::dispatch::resolve_or_default;
use crate::intent::{CartAction, EnquiryTopic, Intent};
use crate::nlp::{kind, EntitySet, GREETING_THRESHOLD, INTENT_THRESHOLD, PRODUCT_TYPE_THRESHOLD};
use crate::payload::ResponsePayload;
use crate::responses::{
    Responder, DELIVERY_ARRIVAL_TEXT, DELIVERY_COST_TEXT, DELIVERY_GENERAL_TEXT,
    DELIVERY_STATUS_TEXT, GENERAL_ANSWERS,
};

/// Reply to a typed message. Messages without text get the fallback.
pub fn dispatch_message(
    responder: &Responder,
    sender_id: &str,
    message: &InboundMessage,
) -> ResponsePayload {
    let Some(text) = message.text.as_deref() else {
        log::debug!("message from {} has no text", sender_id);
        return responder.fallback().clone();
    };
    log::info!("received message from {}: {:?}", sender_id, text);
    dispatch_entities(responder, sender_id, &message.entities)
}

/// Reply chosen from the entity set alone.
///
/// A qualifying intent (confidence > 0.5) is routed; otherwise a greeting
/// (confidence > 0.8) gets the greeting; otherwise the fallback.
pub fn dispatch_entities(
    responder: &Responder,
    sender_id: &str,
    entities: &EntitySet,
) -> ResponsePayload {
    let intent = entities
        .pick_best(kind::INTENT)
        .filter(|e| e.exceeds(INTENT_THRESHOLD));
    match intent {
        Some(entity) => {
            let intent = Intent::parse(&entity.value);
            log::debug!(
                "intent {:?} ({:.2}) parsed as {:?}",
                entity.value,
                entity.confidence,
                intent
            );
            resolve_or_default(responder, route(responder, sender_id, &intent, entities))
        }
        None if is_greeting(entities) => responder.greeting(),
        None => {
            log::debug!("no qualifying intent or greeting from {}", sender_id);
            responder.fallback().clone()
        }
    }
}

fn is_greeting(entities: &EntitySet) -> bool {
    entities
        .pick_best(kind::GREETINGS)
        .is_some_and(|e| e.exceeds(GREETING_THRESHOLD))
}

fn route(
    responder: &Responder,
    sender_id: &str,
    intent: &Intent,
    entities: &EntitySet,
) -> Option<ResponsePayload> {
    match intent {
        Intent::Recommendation => Some(responder.recommendations(&product_type_filters(entities))),
        Intent::Enquiry(Some(EnquiryTopic::Product)) => {
            let product = entities.pick_best(kind::PRODUCT)?;
            let attribute = entities.pick_best(kind::ATTRIBUTE)?;
            responder.product_enquiry(product, attribute)
        }
        Intent::Enquiry(Some(EnquiryTopic::General)) => GENERAL_ANSWERS
            .iter()
            .find(|(keyword, _)| entities.contains(keyword))
            .map(|(_, answer)| ResponsePayload::text(*answer)),
        Intent::Enquiry(Some(EnquiryTopic::Delivery)) => {
            Some(ResponsePayload::text(DeliveryQuestion::from_entities(entities).answer()))
        }
        Intent::Cart(Some(CartAction::Add)) => {
            let product = entities.pick_best(kind::PRODUCT)?;
            let quantity = entities
                .pick_best(kind::NUMBER)
                .and_then(|n| parse_quantity(&n.value))
                .unwrap_or(1);
            Some(responder.add_to_cart(sender_id, &product.value, quantity))
        }
        Intent::Cart(Some(CartAction::View)) => Some(responder.view_cart(sender_id)),
        Intent::Enquiry(None) | Intent::Cart(None) | Intent::Unrecognized(_) => None,
    }
}

/// `product_type` values above the threshold, trimmed, empties dropped.
fn product_type_filters(entities: &EntitySet) -> Vec<String> {
    entities
        .candidates(kind::PRODUCT_TYPE)
        .iter()
        .filter(|e| e.exceeds(PRODUCT_TYPE_THRESHOLD))
        .map(|e| e.value.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Positive whole number from a `number` entity value ("2", "3.0").
fn parse_quantity(value: &str) -> Option<u32> {
    let n: f64 = value.trim().parse().ok()?;
    if n >= 1.0 && n.fract() == 0.0 && n <= f64::from(u32::MAX) {
        Some(n as u32)
    } else {
        None
    }
}

/// Delivery enquiry, checked in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeliveryQuestion {
    Status,
    EstimatedArrival,
    Cost,
    General,
}

impl DeliveryQuestion {
    fn from_entities(entities: &EntitySet) -> Self {
        if entities.contains(kind::STATUS) {
            Self::Status
        } else if entities.contains(kind::ESTIMATED_ARRIVAL) {
            Self::EstimatedArrival
        } else if entities.contains(kind::COST) {
            Self::Cost
        } else {
            Self::General
        }
    }

    // TODO: fill <status> and <date> from order tracking once orders are stored.
    fn answer(self) -> &'static str {
        match self {
            Self::Status => DELIVERY_STATUS_TEXT,
            Self::EstimatedArrival => DELIVERY_ARRIVAL_TEXT,
            Self::Cost => DELIVERY_COST_TEXT,
            Self::General => DELIVERY_GENERAL_TEXT,
        }
    }
}
