//! Storefront API client.

use async_trait::async_trait;
use mockall::automock;

use storefront_core::pricing::PricingPolicy;

mod error;
mod http;
mod types;

pub use error::*;
pub use http::ApiClient;
pub use types::*;

/// The API calls checkout is composed from.
#[automock]
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// Tax and shipping rules the server prices orders with.
    async fn pricing(&self) -> ApiResult<PricingPolicy>;

    /// Save an address to the signed-in user's address book.
    async fn create_address(&self, address: &AddressInput) -> ApiResult<Address>;

    /// Create an order and its lines in one transaction; the server cart is emptied.
    async fn place_order(&self, order: &PlaceOrderRequest) -> ApiResult<PlacedOrder>;
}
