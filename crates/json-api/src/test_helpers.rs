//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use storefront_app::{
    auth::{MockAuthService, Principal, UserUuid},
    context::AppContext,
    domain::{
        addresses::{MockAddressesService, models::Address, models::AddressUuid},
        admin::MockAdminService,
        carts::MockCartsService,
        catalog::{
            MockCatalogService,
            models::{Product, ProductUuid},
        },
        deals::MockDealsService,
        orders::{
            MockOrdersService,
            models::{Order, OrderUuid},
        },
        reviews::MockReviewsService,
    },
};
use storefront_core::{
    orders::{OrderStatus, PaymentMethod, PaymentStatus},
    pricing::{OrderTotals, PricingPolicy},
};
use uuid::Uuid;

use crate::{extensions::*, state::State};

pub(crate) const CUSTOMER: Principal = Principal::customer(UserUuid::from_uuid(Uuid::nil()));
pub(crate) const ADMIN: Principal = Principal::admin(UserUuid::from_uuid(Uuid::max()));

/// Service mocks for one test. Unconfigured mocks fail the test on any call.
#[derive(Default)]
pub(crate) struct Mocks {
    pub auth: MockAuthService,
    pub catalog: MockCatalogService,
    pub carts: MockCartsService,
    pub addresses: MockAddressesService,
    pub orders: MockOrdersService,
    pub reviews: MockReviewsService,
    pub deals: MockDealsService,
    pub admin: MockAdminService,
}

impl Mocks {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::shared(AppContext {
            auth: Arc::new(self.auth),
            catalog: Arc::new(self.catalog),
            carts: Arc::new(self.carts),
            addresses: Arc::new(self.addresses),
            orders: Arc::new(self.orders),
            reviews: Arc::new(self.reviews),
            deals: Arc::new(self.deals),
            admin: Arc::new(self.admin),
            pricing: PricingPolicy::default(),
        })
    }
}

#[salvo::handler]
pub(crate) async fn as_customer(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_principal(CUSTOMER);
    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn as_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_principal(ADMIN);
    ctrl.call_next(req, depot, res).await;
}

/// A storage failure as the services report it.
pub(crate) fn storage_error() -> sqlx::Error {
    sqlx::Error::PoolTimedOut
}

/// A service with no principal, for public routes.
pub(crate) fn public_service(mocks: Mocks, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(mocks.into_state())).push(route))
}

/// A service whose requests are made by [`CUSTOMER`].
pub(crate) fn customer_service(mocks: Mocks, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mocks.into_state()))
            .hoop(as_customer)
            .push(route),
    )
}

/// A service whose requests are made by [`ADMIN`].
pub(crate) fn admin_service(mocks: Mocks, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mocks.into_state()))
            .hoop(as_admin)
            .push(route),
    )
}

pub(crate) fn make_product(uuid: ProductUuid, name: &str, price: u64, stock: u32) -> Product {
    Product {
        uuid,
        category_uuid: None,
        category_name: None,
        category_slug: None,
        name: name.to_string(),
        slug: name.to_lowercase().replace(' ', "-"),
        description: None,
        price,
        compare_at_price: None,
        images: vec![],
        stock,
        is_active: true,
        is_featured: false,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}

pub(crate) fn make_address(uuid: AddressUuid, is_default: bool) -> Address {
    Address {
        uuid,
        user_uuid: CUSTOMER.user,
        full_name: "Ada Lovelace".to_string(),
        phone: None,
        address_line1: "12 St James's Square".to_string(),
        address_line2: None,
        city: "London".to_string(),
        state: None,
        postal_code: "SW1Y 4JH".to_string(),
        country: "GB".to_string(),
        is_default,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_order(uuid: OrderUuid, status: OrderStatus) -> Order {
    Order {
        uuid,
        user_uuid: CUSTOMER.user,
        order_number: "ORD-20260301-000001".to_string(),
        status,
        payment_status: PaymentStatus::Pending,
        payment_method: PaymentMethod::Cod,
        totals: OrderTotals {
            subtotal: 250_000,
            tax: 25_000,
            shipping: 30_000,
            total: 305_000,
        },
        shipping_address_uuid: None,
        billing_address_uuid: None,
        notes: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
