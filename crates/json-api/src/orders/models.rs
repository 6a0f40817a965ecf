//! Order request and response models.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::{
    addresses::models::AddressUuid,
    catalog::models::ProductUuid,
    orders::models::{Order, OrderDetail, OrderItem},
};

use crate::addresses::AddressResponse;

/// Order Response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub id: Uuid,
    pub user_id: Uuid,

    /// Human readable number, `ORD-YYYYMMDD-NNNNNN`
    pub order_number: String,

    pub status: String,
    pub payment_status: String,
    pub payment_method: String,
    pub subtotal: u64,
    pub tax: u64,
    pub shipping: u64,
    pub total: u64,
    pub shipping_address_id: Option<Uuid>,
    pub billing_address_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.uuid.into_uuid(),
            user_id: order.user_uuid.into_uuid(),
            order_number: order.order_number,
            status: order.status.to_string(),
            payment_status: order.payment_status.to_string(),
            payment_method: order.payment_method.to_string(),
            subtotal: order.totals.subtotal,
            tax: order.totals.tax,
            shipping: order.totals.shipping,
            total: order.totals.total,
            shipping_address_id: order.shipping_address_uuid.map(AddressUuid::into_uuid),
            billing_address_id: order.billing_address_uuid.map(AddressUuid::into_uuid),
            notes: order.notes,
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

/// Order Item Response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub id: Uuid,

    /// Absent once the product has been removed from the catalog
    pub product_id: Option<Uuid>,

    pub product_name: String,
    pub product_image: Option<String>,
    pub price: u64,
    pub quantity: u32,
    pub total: u64,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            id: item.uuid.into_uuid(),
            product_id: item.product_uuid.map(ProductUuid::into_uuid),
            product_name: item.product_name,
            product_image: item.product_image,
            price: item.price,
            quantity: item.quantity,
            total: item.total,
        }
    }
}

/// Order Detail Response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderDetailResponse {
    pub order: OrderResponse,
    pub items: Vec<OrderItemResponse>,
    pub shipping_address: Option<AddressResponse>,
    pub billing_address: Option<AddressResponse>,
}

impl From<OrderDetail> for OrderDetailResponse {
    fn from(detail: OrderDetail) -> Self {
        Self {
            order: detail.order.into(),
            items: detail.items.into_iter().map(Into::into).collect(),
            shipping_address: detail.shipping_address.map(Into::into),
            billing_address: detail.billing_address.map(Into::into),
        }
    }
}
