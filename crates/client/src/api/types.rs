//! Request and response bodies of the storefront API.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_core::pricing::{OrderTotals, PricedLine};

use crate::store::CartLine;

/// Product fields embedded in a cart row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartProduct {
    /// Display name.
    pub name: String,

    /// URL slug of the product page.
    pub slug: String,

    /// Current unit price in minor units.
    pub price: u64,

    /// Image URLs, primary first.
    #[serde(default)]
    pub images: Vec<String>,

    /// Units available.
    pub stock: u32,
}

/// A persisted cart row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Row id, used by update and remove.
    pub id: Uuid,

    /// Product in the row.
    pub product_id: Uuid,

    /// Units in the row.
    pub quantity: u32,

    /// Current product data.
    pub product: CartProduct,
}

impl From<CartItem> for CartLine {
    fn from(item: CartItem) -> Self {
        Self {
            product_id: item.product_id,
            name: item.product.name,
            slug: item.product.slug,
            unit_price: item.product.price,
            image_url: item.product.images.into_iter().next(),
            quantity: item.quantity,
            stock: item.product.stock,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CartItemsEnvelope {
    pub items: Vec<CartItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CartItemEnvelope {
    pub item: CartItem,
}

#[derive(Debug, Serialize)]
pub(crate) struct AddToCart {
    pub product_id: Uuid,
    pub quantity: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateCartItem {
    pub quantity: u32,
}

/// Address book entry to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressInput {
    /// Recipient.
    pub full_name: String,

    /// Contact number for the courier.
    pub phone: Option<String>,

    /// Street and number.
    pub address_line1: String,

    /// Apartment, floor or similar.
    pub address_line2: Option<String>,

    /// City.
    pub city: String,

    /// State or province.
    pub state: Option<String>,

    /// Postal code.
    pub postal_code: String,

    /// Country.
    pub country: String,

    /// Make this the default address, unsetting any other.
    #[serde(default)]
    pub is_default: bool,
}

/// A stored address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Address id, referenced by orders.
    pub id: Uuid,

    /// Recipient.
    pub full_name: String,

    /// Contact number for the courier.
    pub phone: Option<String>,

    /// Street and number.
    pub address_line1: String,

    /// Apartment, floor or similar.
    pub address_line2: Option<String>,

    /// City.
    pub city: String,

    /// State or province.
    pub state: Option<String>,

    /// Postal code.
    pub postal_code: String,

    /// Country.
    pub country: String,

    /// Whether this is the default address.
    pub is_default: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddressEnvelope {
    pub address: Address,
}

/// One submitted order line, priced at the amount the shopper saw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineInput {
    /// Product ordered.
    pub product_id: Uuid,

    /// Product name shown to the shopper.
    pub name: String,

    /// Product images shown to the shopper.
    #[serde(default)]
    pub images: Vec<String>,

    /// Units ordered.
    pub quantity: u32,

    /// Unit price shown to the shopper, in minor units.
    pub price: u64,
}

impl From<&CartLine> for OrderLineInput {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id,
            name: line.name.clone(),
            images: line.image_url.iter().cloned().collect(),
            quantity: line.quantity,
            price: line.unit_price,
        }
    }
}

impl PricedLine for OrderLineInput {
    fn unit_price(&self) -> u64 {
        self.price
    }

    fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// Body of `POST /api/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    /// Lines to order.
    pub items: Vec<OrderLineInput>,

    /// Address the order ships to.
    pub shipping_address_id: Uuid,

    /// Billing address; the shipping address when absent.
    pub billing_address_id: Option<Uuid>,

    /// `cod`, `bank_transfer` or `card`
    pub payment_method: String,

    /// Free-text instructions.
    pub notes: Option<String>,
}

/// Order header as returned after placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    /// Order id.
    pub id: Uuid,

    /// Human-readable number, `ORD-YYYYMMDD-NNNNNN`.
    pub order_number: String,

    /// Fulfilment status.
    pub status: String,

    /// Payment status.
    pub payment_status: String,

    /// How the order is paid.
    pub payment_method: String,

    /// Sum of line totals.
    pub subtotal: u64,

    /// Tax on the subtotal.
    pub tax: u64,

    /// Shipping fee.
    pub shipping: u64,

    /// Amount charged.
    pub total: u64,
}

impl OrderSummary {
    /// The charged amounts as [`OrderTotals`].
    #[must_use]
    pub const fn totals(&self) -> OrderTotals {
        OrderTotals {
            subtotal: self.subtotal,
            tax: self.tax,
            shipping: self.shipping,
            total: self.total,
        }
    }
}

/// A persisted order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedOrderItem {
    /// Line id.
    pub id: Uuid,

    /// Product ordered; cleared if the product is later deleted.
    pub product_id: Option<Uuid>,

    /// Product name at order time.
    pub product_name: String,

    /// Product image at order time.
    pub product_image: Option<String>,

    /// Unit price charged.
    pub price: u64,

    /// Units ordered.
    pub quantity: u32,

    /// `price × quantity`.
    pub total: u64,
}

/// Response of `POST /api/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedOrder {
    /// Order header.
    pub order: OrderSummary,

    /// Order lines.
    pub items: Vec<PlacedOrderItem>,
}
