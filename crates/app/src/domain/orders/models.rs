//! Order Models

use jiff::Timestamp;
use storefront_core::{
    orders::{OrderStatus, PaymentMethod, PaymentStatus},
    pagination::{PageRequest, Pagination},
    pricing::{OrderTotals, PricedLine},
};

use crate::{
    auth::UserUuid,
    domain::{
        addresses::models::{Address, AddressUuid},
        catalog::models::ProductUuid,
    },
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItem>;

/// Order Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub order_number: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub totals: OrderTotals,
    pub shipping_address_uuid: Option<AddressUuid>,
    pub billing_address_uuid: Option<AddressUuid>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Order line item, denormalised from the product at placement time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub uuid: OrderItemUuid,
    pub order_uuid: OrderUuid,
    pub product_uuid: Option<ProductUuid>,
    pub product_name: String,
    pub product_image: Option<String>,
    pub price: u64,
    pub quantity: u32,
    pub total: u64,
}

/// An order with its line items and addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDetail {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub shipping_address: Option<Address>,
    pub billing_address: Option<Address>,
}

/// One line submitted with a new order.
///
/// `price` is the unit price the shopper was shown; it must still match the live price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewOrderLine {
    pub product_uuid: ProductUuid,
    pub price: u64,
    pub quantity: u32,
}

impl PricedLine for NewOrderLine {
    fn unit_price(&self) -> u64 {
        self.price
    }

    fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// New Order Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub items: Vec<NewOrderLine>,
    pub shipping_address_uuid: AddressUuid,
    /// Defaults to the shipping address.
    pub billing_address_uuid: Option<AddressUuid>,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

/// Status change requested by an admin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderStatusUpdate {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
}

/// Admin order listing filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderQuery {
    pub page: PageRequest,
    pub status: Option<OrderStatus>,
}

/// One page of orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub pagination: Pagination,
}

/// A line after validation against its locked product row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidatedLine {
    pub product_uuid: ProductUuid,
    pub product_name: String,
    pub product_image: Option<String>,
    pub price: u64,
    pub quantity: u32,
}

impl PricedLine for ValidatedLine {
    fn unit_price(&self) -> u64 {
        self.price
    }

    fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// Values written to the `orders` row at placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NewOrderRow<'a> {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub order_number: &'a str,
    pub payment_method: PaymentMethod,
    pub totals: OrderTotals,
    pub shipping_address_uuid: AddressUuid,
    pub billing_address_uuid: AddressUuid,
    pub notes: Option<&'a str>,
}

/// Live product state read under a row lock during placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LockedProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub price: u64,
    pub stock: u32,
    pub images: Vec<String>,
    pub is_orderable: bool,
}
