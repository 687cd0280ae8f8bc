//! Button postback routing. Stateless: the same payload always gets the same reply.

use crate::dispatch::resolve_or_default;
use crate::intent::PostbackAction;
use crate::payload::ResponsePayload;
use crate::responses::Responder;

/// Reply to a postback payload string (`keyword[ argument]`).
pub fn dispatch_postback(responder: &Responder, sender_id: &str, payload: &str) -> ResponsePayload {
    log::info!("received postback from {}: {:?}", sender_id, payload);
    let response = match PostbackAction::parse(payload) {
        PostbackAction::CartAdd(product_name) => {
            Some(responder.add_to_cart(sender_id, &product_name, 1))
        }
        PostbackAction::CartView => Some(responder.view_cart(sender_id)),
        PostbackAction::EnquiryProduct(product_name) => {
            Some(responder.product_follow_up(&product_name))
        }
        PostbackAction::Checkout => Some(responder.checkout_prompt()),
        PostbackAction::Paid => Some(responder.order_confirmation()),
        PostbackAction::ReceiptView => Some(responder.receipt(sender_id)),
        PostbackAction::CartRemove(product_name) => {
            log::debug!("cart_remove {:?} is not handled", product_name);
            None
        }
        PostbackAction::Unrecognized(raw) => {
            log::debug!("unrecognized postback {:?}", raw);
            None
        }
    };
    resolve_or_default(responder, response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::responses::{CHECKOUT_TEXT, FALLBACK_TEXT, ORDER_CONFIRMED_TEXT};

    fn reply(payload: &str) -> ResponsePayload {
        dispatch_postback(&Responder::default(), "sender-1", payload)
    }

    #[test]
    fn cart_add_confirms_one_with_two_quick_replies() {
        let v = serde_json::to_value(reply("cart_add ProductX")).unwrap();
        assert!(v["text"].as_str().unwrap().contains("Added 1 ProductX to cart."));
        let quick_replies = v["quick_replies"].as_array().unwrap();
        assert_eq!(quick_replies.len(), 2);
        assert_eq!(quick_replies[0]["payload"], "cart_view");
        assert_eq!(quick_replies[1]["payload"], "checkout");
        assert_eq!(quick_replies[0]["content_type"], "text");
    }

    #[test]
    fn same_postback_twice_is_byte_identical() {
        for payload in ["cart_add ProductX", "cart_view", "receipt_view", "paid", "nope"] {
            let first = serde_json::to_string(&reply(payload)).unwrap();
            let second = serde_json::to_string(&reply(payload)).unwrap();
            assert_eq!(first, second, "payload {:?}", payload);
        }
    }

    #[test]
    fn unmatched_keyword_falls_back() {
        assert_eq!(reply("unknown_thing foo"), ResponsePayload::text(FALLBACK_TEXT));
        assert_eq!(reply(""), ResponsePayload::text(FALLBACK_TEXT));
        assert_eq!(
            reply("cart_remove Earl Grey Sunflower Seeds Cookies"),
            ResponsePayload::text(FALLBACK_TEXT)
        );
    }

    #[test]
    fn enquiry_product_asks_follow_up() {
        assert_eq!(
            reply("enquiry_product Dark Chocolate Oatmeal Cookies"),
            ResponsePayload::text(
                "What would you like to know about our Dark Chocolate Oatmeal Cookies?"
            )
        );
    }

    #[test]
    fn checkout_pay_receipt_flow() {
        let checkout = serde_json::to_value(reply("checkout")).unwrap();
        assert_eq!(checkout["attachment"]["payload"]["template_type"], "button");
        assert_eq!(checkout["attachment"]["payload"]["text"], CHECKOUT_TEXT);
        let next = checkout["attachment"]["payload"]["buttons"][0]["payload"]
            .as_str()
            .unwrap()
            .to_string();

        let paid = serde_json::to_value(reply(&next)).unwrap();
        assert_eq!(paid["attachment"]["payload"]["text"], ORDER_CONFIRMED_TEXT);
        let next = paid["attachment"]["payload"]["buttons"][0]["payload"]
            .as_str()
            .unwrap()
            .to_string();

        assert_eq!(reply(&next).kind(), "receipt");
    }

    #[test]
    fn cart_view_shows_cart() {
        assert_eq!(reply("cart_view"), Responder::default().view_cart("sender-1"));
    }
}
