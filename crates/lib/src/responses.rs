//! Reply builders: map a resolved intent to a Send API payload.
//!
//! Builders are pure. They read the shared [`Catalog`] and never fail; a builder
//! that has nothing to say returns `None` and the dispatcher substitutes the
//! fallback reply.

use crate::catalog::Catalog;
use crate::intent::PostbackAction;
use crate::nlp::Entity;
use crate::payload::{
    GenericElement, PostbackButton, QuickReply, ReceiptElement, ReceiptSummary, ReceiptTemplate,
    ResponsePayload, TemplateButton,
};

pub const FALLBACK_TEXT: &str =
    "We could not understand your message. Kindly rephrase your message and send us again.";
pub const GREETING_TEXT: &str = "Hi there! Welcome to MINDS. How can I help you?";
pub const CHECKOUT_TEXT: &str = "Click on the button below to pay.";
pub const ORDER_CONFIRMED_TEXT: &str = "Your order (order no.) is confirmed.";

/// Answers to general enquiries, in the order their keyword entities are checked.
pub const GENERAL_ANSWERS: [(&str, &str); 3] = [
    (
        crate::nlp::kind::PROFIT,
        "All net revenue earned from the sale of our products and services go towards paying a monthly allowance for our clients' work, as well as their lunch expenses while undergoing training.",
    ),
    (
        crate::nlp::kind::MANUFACTURER,
        "We support adults with intellectual disabilities. We started a range of social enterprise projects to provide alternative work engagement for our adult trainees.",
    ),
    (
        crate::nlp::kind::PRODUCTS,
        "We sell craft and baker goods.",
    ),
];

pub const DELIVERY_STATUS_TEXT: &str = "Your latest order is <status>.";
pub const DELIVERY_ARRIVAL_TEXT: &str = "The average delivery time takes 5-7 working days. Your ordered was sent on <date>. It is estimated to arrive on <date + 7 working days>.";
pub const DELIVERY_COST_TEXT: &str = "It is a flat fee of $2 for every order.";
pub const DELIVERY_GENERAL_TEXT: &str =
    "We deliver islandwide. The average delivery time takes 5-7 working days.";

/// Builds replies from the catalog. Constructed once at start-up and shared read-only.
#[derive(Debug, Clone)]
pub struct Responder {
    catalog: Catalog,
    fallback: ResponsePayload,
    greeting: ResponsePayload,
}

impl Default for Responder {
    fn default() -> Self {
        Self::new(Catalog::mock())
    }
}

impl Responder {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            fallback: ResponsePayload::text(FALLBACK_TEXT),
            greeting: ResponsePayload::text(GREETING_TEXT),
        }
    }

    /// The "could not understand" reply.
    pub fn fallback(&self) -> &ResponsePayload {
        &self.fallback
    }

    pub fn greeting(&self) -> ResponsePayload {
        self.greeting.clone()
    }

    /// Carousel of recommended products. `product_types` is accepted but not
    /// applied yet: every product in the catalog is recommended.
    pub fn recommendations(&self, product_types: &[String]) -> ResponsePayload {
        if !product_types.is_empty() {
            log::debug!(
                "recommendation filter {:?} not applied; returning full catalog",
                product_types
            );
        }
        let elements = self
            .catalog
            .products()
            .iter()
            .map(|product| GenericElement {
                title: product.name.clone(),
                subtitle: format!("${}", product.price),
                image_url: product.image_url.clone(),
                buttons: vec![
                    PostbackButton::new(
                        "Learn More",
                        PostbackAction::EnquiryProduct(product.name.clone()),
                    ),
                    PostbackButton::new("Add to Cart", PostbackAction::CartAdd(product.name.clone())),
                ],
            })
            .collect();
        ResponsePayload::generic(elements)
    }

    /// Confirmation with View Cart / Checkout quick replies. The cart itself is not stored yet.
    pub fn add_to_cart(&self, sender_id: &str, product_name: &str, quantity: u32) -> ResponsePayload {
        log::debug!("add to cart for {}: {} x {}", sender_id, quantity, product_name);
        ResponsePayload::quick_replies(
            format!("Added {} {} to cart.", quantity, product_name),
            vec![
                QuickReply::text("View Cart", PostbackAction::CartView),
                QuickReply::text("Checkout", PostbackAction::Checkout),
            ],
        )
    }

    /// Carousel of the sender's cart lines.
    pub fn view_cart(&self, sender_id: &str) -> ResponsePayload {
        let elements = self
            .catalog
            .cart_for(sender_id)
            .iter()
            .map(|line| GenericElement {
                title: line.product.name.clone(),
                subtitle: format!("Qty: {} (${} each)", line.quantity, line.product.price),
                image_url: line.product.image_url.clone(),
                buttons: vec![
                    PostbackButton::new("Add 1", PostbackAction::CartAdd(line.product.name.clone())),
                    PostbackButton::new(
                        "Remove All",
                        PostbackAction::CartRemove(line.product.name.clone()),
                    ),
                ],
            })
            .collect();
        ResponsePayload::generic(elements)
    }

    /// Receipt for the sender's latest order.
    pub fn receipt(&self, sender_id: &str) -> ResponsePayload {
        let order = self.catalog.latest_order_for(sender_id);
        let lines = self.catalog.cart_for(sender_id);
        let elements = lines
            .iter()
            .map(|line| ReceiptElement {
                title: line.product.name.clone(),
                subtitle: String::new(),
                quantity: line.quantity,
                price: line.product.price,
                currency: order.currency.clone(),
                image_url: line.product.image_url.clone(),
            })
            .collect();
        ResponsePayload::receipt(ReceiptTemplate {
            recipient_name: order.recipient_name.clone(),
            order_number: order.order_number.clone(),
            currency: order.currency.clone(),
            payment_method: order.payment_method.clone(),
            summary: ReceiptSummary {
                subtotal: order.subtotal,
            },
            elements,
        })
    }

    /// Answer about one attribute of one product. No product data source exists
    /// yet, so there is never an answer.
    pub fn product_enquiry(&self, product: &Entity, attribute: &Entity) -> Option<ResponsePayload> {
        log::debug!(
            "product enquiry about {:?} of {:?} has no answer",
            attribute.value,
            product.value
        );
        None
    }

    /// Follow-up question after "Learn More" on a product card.
    pub fn product_follow_up(&self, product_name: &str) -> ResponsePayload {
        ResponsePayload::text(format!(
            "What would you like to know about our {}?",
            product_name
        ))
    }

    pub fn checkout_prompt(&self) -> ResponsePayload {
        ResponsePayload::buttons(
            CHECKOUT_TEXT,
            vec![TemplateButton::postback("Pay", PostbackAction::Paid)],
        )
    }

    /// Shown after payment. The order is not recorded.
    pub fn order_confirmation(&self) -> ResponsePayload {
        ResponsePayload::buttons(
            ORDER_CONFIRMED_TEXT,
            vec![TemplateButton::postback("View Receipt", PostbackAction::ReceiptView)],
        )
    }
}
