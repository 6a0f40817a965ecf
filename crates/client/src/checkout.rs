//! Checkout
//!
//! Turns the local cart into a placed order: addresses first, then totals previewed with
//! the server's pricing policy, then the order itself. The local cart is discarded only
//! once the order exists.

use std::fmt;

use thiserror::Error;
use tracing::{error, info, warn};

use storefront_core::{
    orders::PaymentMethod,
    pricing::{OrderTotals, PricingError},
};

use crate::{
    api::{AddressInput, ApiError, OrderLineInput, PlaceOrderRequest, PlacedOrder, StorefrontApi},
    sync::{CartMirror, CartSync, OutboxStore},
};

/// What the shopper submits at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    /// Where the order ships.
    pub shipping: AddressInput,

    /// `None` bills the shipping address.
    pub billing: Option<AddressInput>,

    /// How the shopper pays.
    pub payment_method: PaymentMethod,

    /// Free-text instructions for the order.
    pub notes: Option<String>,
}

/// Stages of a checkout, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStep {
    /// Refuse an empty cart.
    Guard,

    /// Save the shipping and billing addresses.
    CollectAddresses,

    /// Preview totals with the server's pricing policy.
    ComputeTotals,

    /// Submit the order.
    CreateOrder,

    /// Discard the local cart.
    ClearCart,

    /// Nothing left to do.
    Completed,
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Guard => "guard",
            Self::CollectAddresses => "collect_addresses",
            Self::ComputeTotals => "compute_totals",
            Self::CreateOrder => "create_order",
            Self::ClearCart => "clear_cart",
            Self::Completed => "completed",
        })
    }
}

/// A placed order with the totals shown to the shopper before submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutReceipt {
    /// The order as the server stored it.
    pub order: PlacedOrder,

    /// Totals computed locally before the order was submitted.
    pub previewed: OrderTotals,
}

/// Result of [`CheckoutComposer::checkout`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Nothing to order; nothing was created.
    EmptyCart,

    /// The order was created and the local cart discarded.
    Placed(Box<CheckoutReceipt>),
}

/// Why a checkout stopped. Addresses created before the failure are kept.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// An address could not be created.
    #[error("failed to save checkout address: {0}")]
    Addresses(#[source] ApiError),

    /// The pricing policy could not be fetched.
    #[error("failed to fetch pricing policy: {0}")]
    Pricing(#[source] ApiError),

    /// The cart total overflowed.
    #[error("cart total out of range: {0}")]
    Totals(#[source] PricingError),

    /// The server refused the order.
    #[error("failed to place order: {0}")]
    PlaceOrder(#[source] ApiError),
}

impl CheckoutError {
    /// The stage that failed.
    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        match self {
            Self::Addresses(_) => CheckoutStep::CollectAddresses,
            Self::Pricing(_) | Self::Totals(_) => CheckoutStep::ComputeTotals,
            Self::PlaceOrder(_) => CheckoutStep::CreateOrder,
        }
    }
}

/// Drives a checkout against the storefront API.
#[derive(Debug, Clone)]
pub struct CheckoutComposer<A> {
    api: A,
}

impl<A: StorefrontApi> CheckoutComposer<A> {
    /// Composer placing orders through `api`.
    pub const fn new(api: A) -> Self {
        Self { api }
    }

    /// Place an order for everything in `cart`.
    ///
    /// # Errors
    ///
    /// Returns the failing step. The cart is left as it was.
    #[tracing::instrument(
        name = "checkout.place_order",
        skip(self, cart, request),
        fields(payment_method = %request.payment_method),
        err
    )]
    pub async fn checkout<M, S>(
        &self,
        cart: &mut CartSync<M, S>,
        request: CheckoutRequest,
    ) -> Result<CheckoutOutcome, CheckoutError>
    where
        M: CartMirror,
        S: OutboxStore,
    {
        let snapshot = cart.store().snapshot();

        if snapshot.is_empty() {
            return Ok(CheckoutOutcome::EmptyCart);
        }

        let shipping = self
            .api
            .create_address(&request.shipping)
            .await
            .map_err(CheckoutError::Addresses)?;

        let billing = match &request.billing {
            Some(address) => Some(
                self.api
                    .create_address(address)
                    .await
                    .map_err(CheckoutError::Addresses)?,
            ),
            None => None,
        };

        let items: Vec<OrderLineInput> = snapshot.lines.iter().map(OrderLineInput::from).collect();

        let policy = self.api.pricing().await.map_err(CheckoutError::Pricing)?;
        let previewed = policy
            .totals_for_lines(&items)
            .map_err(CheckoutError::Totals)?;

        let order = self
            .api
            .place_order(&PlaceOrderRequest {
                items,
                shipping_address_id: shipping.id,
                billing_address_id: billing.map(|address| address.id),
                payment_method: request.payment_method.to_string(),
                notes: request.notes,
            })
            .await
            .map_err(CheckoutError::PlaceOrder)?;

        if order.order.totals() != previewed {
            warn!(
                order_number = %order.order.order_number,
                previewed = previewed.total,
                charged = order.order.total,
                "order total differs from checkout preview"
            );
        }

        if let Err(source) = cart.discard_local() {
            error!("order placed but local cart could not be cleared: {source}");
        }

        info!(order_number = %order.order.order_number, total = order.order.total, "order placed");

        Ok(CheckoutOutcome::Placed(Box::new(CheckoutReceipt { order, previewed })))
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use storefront_core::pricing::PricingPolicy;
    use testresult::TestResult;
    use uuid::Uuid;

    use crate::{
        api::{Address, MockStorefrontApi, OrderSummary, PlacedOrderItem},
        store::{CartStore, tests::line},
        sync::{MemoryOutboxStore, MockCartMirror, RetryPolicy},
    };

    use super::*;

    fn address_input(full_name: &str) -> AddressInput {
        AddressInput {
            full_name: full_name.to_string(),
            phone: None,
            address_line1: "12 St James's Square".to_string(),
            address_line2: None,
            city: "London".to_string(),
            state: None,
            postal_code: "SW1Y 4JH".to_string(),
            country: "GB".to_string(),
            is_default: false,
        }
    }

    fn stored(input: &AddressInput) -> Address {
        Address {
            id: Uuid::now_v7(),
            full_name: input.full_name.clone(),
            phone: input.phone.clone(),
            address_line1: input.address_line1.clone(),
            address_line2: input.address_line2.clone(),
            city: input.city.clone(),
            state: input.state.clone(),
            postal_code: input.postal_code.clone(),
            country: input.country.clone(),
            is_default: input.is_default,
        }
    }

    fn placed(request: &PlaceOrderRequest, totals: OrderTotals) -> PlacedOrder {
        PlacedOrder {
            order: OrderSummary {
                id: Uuid::now_v7(),
                order_number: "ORD-20260301-000001".to_string(),
                status: "pending".to_string(),
                payment_status: "pending".to_string(),
                payment_method: request.payment_method.clone(),
                subtotal: totals.subtotal,
                tax: totals.tax,
                shipping: totals.shipping,
                total: totals.total,
            },
            items: request
                .items
                .iter()
                .map(|item| PlacedOrderItem {
                    id: Uuid::now_v7(),
                    product_id: Some(item.product_id),
                    product_name: item.name.clone(),
                    product_image: item.images.first().cloned(),
                    price: item.price,
                    quantity: item.quantity,
                    total: item.price * u64::from(item.quantity),
                })
                .collect(),
        }
    }

    fn request(billing: Option<AddressInput>) -> CheckoutRequest {
        CheckoutRequest {
            shipping: address_input("Ada Lovelace"),
            billing,
            payment_method: PaymentMethod::Cod,
            notes: Some("Leave at the door".to_string()),
        }
    }

    /// A signed-in cart holding two kettles at 100000 and one teapot at 50000.
    async fn filled_cart() -> TestResult<CartSync<MockCartMirror, MemoryOutboxStore>> {
        let mut mirror = MockCartMirror::new();
        mirror.expect_account().return_const(Some(Uuid::now_v7()));
        mirror.expect_fetch_cart().returning(|| Ok(vec![]));

        let mut cart = CartSync::new(CartStore::new(), mirror, MemoryOutboxStore::default())?
            .with_retry(RetryPolicy::immediate(1));

        cart.hydrate().await?;
        cart.add_item(line(Uuid::now_v7(), 100_000, 2))?;
        cart.add_item(line(Uuid::now_v7(), 50_000, 1))?;

        Ok(cart)
    }

    const EXPECTED: OrderTotals = OrderTotals {
        subtotal: 250_000,
        tax: 25_000,
        shipping: 30_000,
        total: 305_000,
    };

    #[tokio::test]
    async fn places_order_with_previewed_totals() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_create_address()
            .once()
            .returning(|input| Ok(stored(input)));

        api.expect_pricing()
            .once()
            .returning(|| Ok(PricingPolicy::default()));

        api.expect_place_order()
            .once()
            .withf(|order| {
                order.items.len() == 2
                    && order.billing_address_id.is_none()
                    && order.payment_method == "cod"
                    && order.notes.as_deref() == Some("Leave at the door")
            })
            .returning(|order| Ok(placed(order, EXPECTED)));

        let mut cart = filled_cart().await?;
        let outcome = CheckoutComposer::new(api).checkout(&mut cart, request(None)).await?;

        let CheckoutOutcome::Placed(receipt) = outcome else {
            return Err("expected a placed order".into());
        };

        assert_eq!(receipt.previewed, EXPECTED);
        assert_eq!(receipt.order.order.totals(), EXPECTED);
        assert_eq!(receipt.order.items.len(), 2);
        assert!(cart.store().is_empty(), "local cart cleared");
        assert!(cart.outbox().is_empty(), "pending mirror operations discarded");

        Ok(())
    }

    #[tokio::test]
    async fn separate_billing_address_is_created() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_create_address()
            .times(2)
            .returning(|input| Ok(stored(input)));

        api.expect_pricing()
            .once()
            .returning(|| Ok(PricingPolicy::default()));

        api.expect_place_order()
            .once()
            .withf(|order| {
                order
                    .billing_address_id
                    .is_some_and(|billing| billing != order.shipping_address_id)
            })
            .returning(|order| Ok(placed(order, EXPECTED)));

        let mut cart = filled_cart().await?;
        let outcome = CheckoutComposer::new(api)
            .checkout(&mut cart, request(Some(address_input("Accounts Payable"))))
            .await?;

        assert!(matches!(outcome, CheckoutOutcome::Placed(_)));

        Ok(())
    }

    #[tokio::test]
    async fn empty_cart_creates_nothing() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_create_address().never();
        api.expect_place_order().never();

        let mut cart = CartSync::new(
            CartStore::new(),
            MockCartMirror::new(),
            MemoryOutboxStore::default(),
        )?;

        let outcome = CheckoutComposer::new(api).checkout(&mut cart, request(None)).await?;

        assert_eq!(outcome, CheckoutOutcome::EmptyCart);

        Ok(())
    }

    #[tokio::test]
    async fn address_failure_stops_before_the_order() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_create_address().once().returning(|_| {
            Err(ApiError::Status {
                status: StatusCode::BAD_REQUEST,
                body: r#"{"brief":"Missing required field","detail":"postal_code"}"#.to_string(),
            })
        });
        api.expect_pricing().never();
        api.expect_place_order().never();

        let mut cart = filled_cart().await?;
        let result = CheckoutComposer::new(api).checkout(&mut cart, request(None)).await;

        let Err(error) = result else {
            return Err("expected checkout to fail".into());
        };

        assert_eq!(error.step(), CheckoutStep::CollectAddresses);
        assert_eq!(cart.store().item_count(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn rejected_order_keeps_the_cart() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_create_address()
            .once()
            .returning(|input| Ok(stored(input)));

        api.expect_pricing()
            .once()
            .returning(|| Ok(PricingPolicy::default()));

        api.expect_place_order().once().returning(|_| {
            Err(ApiError::Status {
                status: StatusCode::CONFLICT,
                body: r#"{"brief":"price changed"}"#.to_string(),
            })
        });

        let mut cart = filled_cart().await?;
        let result = CheckoutComposer::new(api).checkout(&mut cart, request(None)).await;

        assert!(matches!(
            result,
            Err(ref error) if error.step() == CheckoutStep::CreateOrder
        ));
        assert_eq!(cart.store().total()?, 250_000);
        assert_eq!(cart.outbox().len(), 2, "queued mirror operations kept");

        Ok(())
    }
}
