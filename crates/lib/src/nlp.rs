//! NLP entities attached to inbound messages by the platform's built-in NLP.
//!
//! Entities are grouped by kind into ranked candidate lists. Only the first
//! candidate of a kind is ever consulted (see [`EntitySet::pick_best`]).

use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

/// An `intent` entity must score strictly above this to be routed.
pub const INTENT_THRESHOLD: f64 = 0.5;
/// A `greetings` entity must score strictly above this to count as a greeting.
pub const GREETING_THRESHOLD: f64 = 0.8;
/// `product_type` candidates scoring strictly above this become recommendation filters.
pub const PRODUCT_TYPE_THRESHOLD: f64 = 0.5;

/// Entity kinds the dispatcher looks at.
pub mod kind {
    pub const INTENT: &str = "intent";
    pub const GREETINGS: &str = "greetings";
    pub const PRODUCT_TYPE: &str = "product_type";
    pub const PRODUCT: &str = "product";
    pub const ATTRIBUTE: &str = "attribute";
    pub const NUMBER: &str = "number";
    pub const PROFIT: &str = "profit";
    pub const MANUFACTURER: &str = "manufacturer";
    pub const PRODUCTS: &str = "products";
    pub const STATUS: &str = "status";
    pub const ESTIMATED_ARRIVAL: &str = "estimated_arrival";
    pub const COST: &str = "cost";
}

/// One classification candidate.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Entity {
    /// Textual value. Numeric NLP values (e.g. `number`) are kept as their JSON text.
    #[serde(default, deserialize_with = "deserialize_value")]
    pub value: String,
    #[serde(default)]
    pub confidence: f64,
}

impl Entity {
    pub fn new(value: impl Into<String>, confidence: f64) -> Self {
        Self {
            value: value.into(),
            confidence,
        }
    }

    /// True when the confidence is strictly above `threshold`.
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.confidence > threshold
    }
}

fn deserialize_value<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Entities of one message, keyed by kind. Candidate order is the NLP ranking.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct EntitySet(HashMap<String, Vec<Entity>>);

impl EntitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a candidate for `kind` (lowest rank so far).
    pub fn with(mut self, kind: &str, value: impl Into<String>, confidence: f64) -> Self {
        self.0
            .entry(kind.to_string())
            .or_default()
            .push(Entity::new(value, confidence));
        self
    }

    /// First-ranked candidate for `kind`. Lower-ranked candidates are never
    /// consulted, whatever their confidence.
    pub fn pick_best(&self, kind: &str) -> Option<&Entity> {
        self.0.get(kind).and_then(|candidates| candidates.first())
    }

    /// All candidates for `kind` in rank order.
    pub fn candidates(&self, kind: &str) -> &[Entity] {
        self.0.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when at least one candidate of `kind` is present, regardless of confidence.
    pub fn contains(&self, kind: &str) -> bool {
        !self.candidates(kind).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pick_best_returns_first_candidate_not_highest() {
        let entities = EntitySet::new()
            .with(kind::INTENT, "cart_view", 0.3)
            .with(kind::INTENT, "recommendation", 0.99);
        let best = entities.pick_best(kind::INTENT).unwrap();
        assert_eq!(best.value, "cart_view");
        assert!(!best.exceeds(INTENT_THRESHOLD));
    }

    #[test]
    fn exceeds_is_strict() {
        assert!(!Entity::new("x", 0.5).exceeds(0.5));
        assert!(Entity::new("x", 0.51).exceeds(0.5));
    }

    #[test]
    fn deserializes_messenger_nlp_entities() {
        let json = r#"{
            "intent": [{"value": "cart_add", "confidence": 0.93}],
            "number": [{"value": 2, "confidence": 1.0, "type": "value"}],
            "greetings": [{"value": "true", "confidence": 0.99}]
        }"#;
        let entities: EntitySet = serde_json::from_str(json).unwrap();
        assert_eq!(entities.pick_best(kind::INTENT).unwrap().value, "cart_add");
        assert_eq!(entities.pick_best(kind::NUMBER).unwrap().value, "2");
        assert!(entities.contains(kind::GREETINGS));
        assert!(!entities.contains(kind::PRODUCT));
    }

    #[test]
    fn empty_candidate_list_is_absent() {
        let entities: EntitySet = serde_json::from_str(r#"{"status": []}"#).unwrap();
        assert!(!entities.contains(kind::STATUS));
        assert!(entities.pick_best(kind::STATUS).is_none());
    }
}
