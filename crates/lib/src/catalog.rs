//! Mock catalog, cart, and order data.
//!
//! There is no product database yet: every sender sees the same three products,
//! the same cart, and the same latest order.

const COOKIE_IMAGE_URL: &str =
    "https://static.wixstatic.com/media/768979_3fccb2bb837a44caa80bb4fc5dddd119~mv2_d_1800_1800_s_2.jpg";

/// Currency used for prices and receipts.
pub const CURRENCY: &str = "SGD";

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub price: f64,
    pub image_url: String,
    pub attributes: ProductAttributes,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductAttributes {
    pub allergens: Vec<String>,
    pub colour: Option<String>,
}

impl Product {
    fn new(id: u32, name: &str, price: f64) -> Self {
        Self {
            id,
            name: name.to_string(),
            price,
            image_url: COOKIE_IMAGE_URL.to_string(),
            attributes: ProductAttributes::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

/// Receipt header of a confirmed order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    pub recipient_name: String,
    pub order_number: String,
    pub currency: String,
    pub payment_method: String,
    /// Stated subtotal of the order, not derived from its lines.
    pub subtotal: f64,
}

/// Read-only product and order data shared by all requests.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    cart: Vec<CartLine>,
    order: OrderSummary,
}

impl Catalog {
    /// The fixed three-cookie catalog with a cart holding 1, 2 and 1 of each.
    pub fn mock() -> Self {
        let mut dark_chocolate = Product::new(1, "Dark Chocolate Oatmeal Cookies", 3.5);
        dark_chocolate.attributes.allergens = vec!["eggs".to_string(), "nut".to_string()];
        let products = vec![
            dark_chocolate,
            Product::new(2, "Cranberry Sweetheart Cookies (Eggless)", 3.5),
            Product::new(3, "Earl Grey Sunflower Seeds Cookies", 3.5),
        ];
        let cart = products
            .iter()
            .zip([1, 2, 1])
            .map(|(product, quantity)| CartLine {
                product: product.clone(),
                quantity,
            })
            .collect();
        Self {
            products,
            cart,
            order: OrderSummary {
                recipient_name: "<name>".to_string(),
                order_number: "<order_number>".to_string(),
                currency: CURRENCY.to_string(),
                payment_method: "PayPal".to_string(),
                subtotal: 75.0,
            },
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Cart contents for a sender. Carts are not stored yet, so this is the mock cart.
    pub fn cart_for(&self, _sender_id: &str) -> &[CartLine] {
        &self.cart
    }

    /// Latest confirmed order for a sender (mock).
    pub fn latest_order_for(&self, _sender_id: &str) -> &OrderSummary {
        &self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_catalog_has_three_products() {
        let catalog = Catalog::mock();
        let names: Vec<_> = catalog.products().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "Dark Chocolate Oatmeal Cookies",
                "Cranberry Sweetheart Cookies (Eggless)",
                "Earl Grey Sunflower Seeds Cookies",
            ]
        );
        assert_eq!(catalog.products()[0].attributes.allergens, ["eggs", "nut"]);
    }

    #[test]
    fn cart_and_order_are_the_same_for_every_sender() {
        let catalog = Catalog::mock();
        let quantities: Vec<u32> = catalog.cart_for("a").iter().map(|l| l.quantity).collect();
        assert_eq!(quantities, [1, 2, 1]);
        assert_eq!(catalog.cart_for("a"), catalog.cart_for("b"));
        assert_eq!(catalog.latest_order_for("a"), catalog.latest_order_for("b"));
        assert_eq!(catalog.latest_order_for("a").subtotal, 75.0);
    }
}
