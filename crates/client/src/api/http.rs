//! reqwest implementation of the API traits.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;
use uuid::Uuid;

use storefront_core::pricing::PricingPolicy;

use crate::sync::CartMirror;

use super::{
    Address, AddressInput, ApiError, ApiResult, PlaceOrderRequest, PlacedOrder, StorefrontApi,
    types::{AddToCart, AddressEnvelope, CartItem, CartItemEnvelope, CartItemsEnvelope, UpdateCartItem},
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the storefront JSON API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Option<Session>,
}

/// Credentials returned by login or signup.
#[derive(Debug, Clone)]
struct Session {
    user_id: Uuid,
    token: String,
}

impl ApiClient {
    /// Client for the API rooted at `base_url`, e.g. `https://shop.example.com`.
    ///
    /// # Errors
    ///
    /// Returns an error when the TLS backend cannot be initialised.
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        let client = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            session: None,
        })
    }

    /// Attach the session of `user_id`; authenticated calls send `token` as a bearer token.
    #[must_use]
    pub fn with_session(mut self, user_id: Uuid, token: impl Into<String>) -> Self {
        self.session = Some(Session {
            user_id,
            token: token.into(),
        });
        self
    }

    /// The bearer token, if signed in.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|session| session.token.as_str())
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn authorized(&self, request: RequestBuilder) -> ApiResult<RequestBuilder> {
        let token = self.token().ok_or(ApiError::Unauthenticated)?;

        Ok(request.bearer_auth(token))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.client.get(self.url(path)).send().await?;

        Self::json(response).await
    }

    async fn get_authorized<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.authorized(self.client.get(self.url(path)))?.send().await?;

        Self::json(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(&self, path: &str, body: &B) -> ApiResult<T> {
        let request = self.client.post(self.url(path)).json(body);
        let response = self.authorized(request)?.send().await?;

        Self::json(response).await
    }

    async fn patch<T: DeserializeOwned, B: Serialize + Sync>(&self, path: &str, body: &B) -> ApiResult<T> {
        let request = self.client.patch(self.url(path)).json(body);
        let response = self.authorized(request)?.send().await?;

        Self::json(response).await
    }

    async fn delete(&self, path: &str) -> ApiResult<()> {
        let response = self
            .authorized(self.client.delete(self.url(path)))?
            .send()
            .await?;

        Self::success(response).await.map(drop)
    }

    async fn success(response: Response) -> ApiResult<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(%status, "storefront API rejected request");

        Err(ApiError::Status { status, body })
    }

    async fn json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        Ok(Self::success(response).await?.json().await?)
    }
}

#[async_trait]
impl StorefrontApi for ApiClient {
    async fn pricing(&self) -> ApiResult<PricingPolicy> {
        self.get("api/pricing").await
    }

    async fn create_address(&self, address: &AddressInput) -> ApiResult<Address> {
        let envelope: AddressEnvelope = self.post("api/addresses", address).await?;

        Ok(envelope.address)
    }

    async fn place_order(&self, order: &PlaceOrderRequest) -> ApiResult<PlacedOrder> {
        self.post("api/orders", order).await
    }
}

#[async_trait]
impl CartMirror for ApiClient {
    fn account(&self) -> Option<Uuid> {
        self.session.as_ref().map(|session| session.user_id)
    }

    fn sign_out(&mut self) {
        self.session = None;
    }

    async fn fetch_cart(&self) -> ApiResult<Vec<CartItem>> {
        let envelope: CartItemsEnvelope = self.get_authorized("api/cart").await?;

        Ok(envelope.items)
    }

    async fn add_item(&self, product_id: Uuid, quantity: u32) -> ApiResult<CartItem> {
        let envelope: CartItemEnvelope = self
            .post("api/cart", &AddToCart {
                product_id,
                quantity,
            })
            .await?;

        Ok(envelope.item)
    }

    async fn update_item(&self, item_id: Uuid, quantity: u32) -> ApiResult<CartItem> {
        let envelope: CartItemEnvelope = self
            .patch(&format!("api/cart/{item_id}"), &UpdateCartItem { quantity })
            .await?;

        Ok(envelope.item)
    }

    async fn remove_item(&self, item_id: Uuid) -> ApiResult<()> {
        self.delete(&format!("api/cart/{item_id}")).await
    }

    async fn clear(&self) -> ApiResult<()> {
        self.delete("api/cart/clear").await
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn urls_join_without_duplicate_slashes() -> TestResult {
        let client = ApiClient::new("https://shop.example.com/")?;

        assert_eq!(client.url("/api/cart"), "https://shop.example.com/api/cart");
        assert_eq!(client.url("api/pricing"), "https://shop.example.com/api/pricing");

        Ok(())
    }

    #[test]
    fn sessions_carry_the_account() -> TestResult {
        let user_id = Uuid::now_v7();
        let mut client = ApiClient::new("https://shop.example.com")?;
        assert_eq!(client.account(), None);

        client = client.with_session(user_id, "sf_v1_abc.def");
        assert_eq!(client.account(), Some(user_id));
        assert_eq!(client.token(), Some("sf_v1_abc.def"));

        client.sign_out();
        assert_eq!(client.account(), None);
        assert_eq!(client.token(), None);

        Ok(())
    }

    #[tokio::test]
    async fn cart_calls_without_session_fail_before_sending() -> TestResult {
        let client = ApiClient::new("http://127.0.0.1:9")?;

        let result = client.fetch_cart().await;

        assert!(matches!(result, Err(ApiError::Unauthenticated)));

        Ok(())
    }
}
