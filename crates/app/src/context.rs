//! App Context

use std::sync::Arc;

use storefront_core::pricing::PricingPolicy;
use thiserror::Error;
use tracing::warn;

use crate::{
    auth::{AuthService, AuthSettings, PgAuthService, VerificationNotifier},
    database::{self, Db},
    domain::{
        addresses::{AddressesService, PgAddressesService},
        admin::{AdminService, DEFAULT_LOW_STOCK_THRESHOLD, PgAdminService},
        carts::{CartsService, PgCartsService},
        catalog::{CatalogService, PgCatalogService},
        deals::{DealsService, PgDealsService},
        orders::{OrdersService, PgOrdersService},
        reviews::{PgReviewsService, ReviewsService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("database role bypasses row-level security; connect with an application role")]
    RlsBypass,
}

/// Runtime settings shared by the services.
#[derive(Debug, Clone, Copy)]
pub struct AppOptions {
    pub pricing: PricingPolicy,
    pub auth: AuthSettings,
    pub low_stock_threshold: u32,

    /// Permit a superuser or `BYPASSRLS` role, for local development only.
    pub allow_rls_bypass: bool,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            pricing: PricingPolicy::default(),
            auth: AuthSettings::default(),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            allow_rls_bypass: false,
        }
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub auth: Arc<dyn AuthService>,
    pub catalog: Arc<dyn CatalogService>,
    pub carts: Arc<dyn CartsService>,
    pub addresses: Arc<dyn AddressesService>,
    pub orders: Arc<dyn OrdersService>,
    pub reviews: Arc<dyn ReviewsService>,
    pub deals: Arc<dyn DealsService>,
    pub admin: Arc<dyn AdminService>,
    pub pricing: PricingPolicy,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails, or when the
    /// connected role bypasses row-level security and that was not explicitly allowed.
    pub async fn from_database_url(
        url: &str,
        notifier: Arc<dyn VerificationNotifier>,
        options: AppOptions,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let bypasses_rls = database::role_bypasses_rls(&pool)
            .await
            .map_err(AppInitError::Database)?;

        if bypasses_rls {
            if !options.allow_rls_bypass {
                return Err(AppInitError::RlsBypass);
            }

            warn!("database role bypasses row-level security; per-user isolation is not enforced");
        }

        Ok(Self::from_db(Db::new(pool), notifier, options))
    }

    /// Wire every service against an existing database handle.
    #[must_use]
    pub fn from_db(db: Db, notifier: Arc<dyn VerificationNotifier>, options: AppOptions) -> Self {
        Self {
            auth: Arc::new(PgAuthService::new(db.clone(), notifier, options.auth)),
            catalog: Arc::new(PgCatalogService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone())),
            addresses: Arc::new(PgAddressesService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(db.clone(), options.pricing)),
            reviews: Arc::new(PgReviewsService::new(db.clone())),
            deals: Arc::new(PgDealsService::new(db.clone())),
            admin: Arc::new(PgAdminService::new(db, options.low_stock_threshold)),
            pricing: options.pricing,
        }
    }
}
