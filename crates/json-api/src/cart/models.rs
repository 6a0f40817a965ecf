//! Cart response models.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::carts::models::{CartItem, CartProduct};

/// Live product data shown next to a cart line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartProductResponse {
    pub name: String,
    pub slug: String,
    pub price: u64,
    pub images: Vec<String>,
    pub stock: u32,
}

impl From<CartProduct> for CartProductResponse {
    fn from(product: CartProduct) -> Self {
        Self {
            name: product.name,
            slug: product.slug,
            price: product.price,
            images: product.images,
            stock: product.stock,
        }
    }
}

/// Cart Item Response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: u32,
    pub product: CartProductResponse,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        Self {
            id: item.uuid.into_uuid(),
            product_id: item.product_uuid.into_uuid(),
            quantity: item.quantity,
            product: item.product.into(),
        }
    }
}

/// Single cart line envelope
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemEnvelope {
    pub item: CartItemResponse,
}

impl From<CartItem> for CartItemEnvelope {
    fn from(item: CartItem) -> Self {
        Self { item: item.into() }
    }
}
