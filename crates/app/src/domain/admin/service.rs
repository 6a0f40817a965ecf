//! Admin service.

use async_trait::async_trait;
use mockall::automock;
use storefront_core::pagination::PageRequest;

use crate::{
    auth::Principal,
    database::Db,
    domain::admin::{
        errors::AdminServiceError,
        models::{AdminStats, CustomerPage, RECENT_ORDERS, counts_for_every_status},
        repository::PgAdminRepository,
    },
};

/// Stock level at or below which products are reported.
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 5;

#[derive(Debug, Clone)]
pub struct PgAdminService {
    db: Db,
    repository: PgAdminRepository,
    low_stock_threshold: u32,
}

impl PgAdminService {
    #[must_use]
    pub fn new(db: Db, low_stock_threshold: u32) -> Self {
        Self {
            db,
            repository: PgAdminRepository::new(),
            low_stock_threshold,
        }
    }
}

#[async_trait]
impl AdminService for PgAdminService {
    #[tracing::instrument(
        name = "admin.service.stats",
        skip(self),
        fields(user_uuid = %principal.user),
        err
    )]
    async fn stats(&self, principal: Principal) -> Result<AdminStats, AdminServiceError> {
        if !principal.is_admin() {
            return Err(AdminServiceError::Forbidden);
        }

        let mut tx = self.db.begin_principal_transaction(principal).await?;

        let (order_count, total_revenue) = self.repository.order_totals(&mut tx).await?;
        let grouped = self.repository.orders_by_status(&mut tx).await?;
        let (customer_count, active_product_count) =
            self.repository.catalog_counts(&mut tx).await?;

        let low_stock_products = self
            .repository
            .low_stock_products(&mut tx, self.low_stock_threshold)
            .await?;

        let recent_orders = self
            .repository
            .recent_orders(&mut tx, RECENT_ORDERS)
            .await?;

        tx.commit().await?;

        Ok(AdminStats {
            total_revenue,
            order_count,
            orders_by_status: counts_for_every_status(&grouped),
            customer_count,
            active_product_count,
            low_stock_threshold: self.low_stock_threshold,
            low_stock_products,
            recent_orders,
        })
    }

    #[tracing::instrument(
        name = "admin.service.list_customers",
        skip(self),
        fields(user_uuid = %principal.user),
        err
    )]
    async fn list_customers(
        &self,
        principal: Principal,
        page: PageRequest,
    ) -> Result<CustomerPage, AdminServiceError> {
        if !principal.is_admin() {
            return Err(AdminServiceError::Forbidden);
        }

        let mut tx = self.db.begin_principal_transaction(principal).await?;

        let total = self.repository.count_customers(&mut tx).await?;
        let customers = self.repository.list_customers(&mut tx, page).await?;

        tx.commit().await?;

        Ok(CustomerPage {
            customers,
            pagination: page.paginate(total),
        })
    }
}

#[automock]
#[async_trait]
pub trait AdminService: Send + Sync {
    /// Dashboard figures across all users.
    async fn stats(&self, principal: Principal) -> Result<AdminStats, AdminServiceError>;

    /// Customers with their order count and total spent, newest first.
    async fn list_customers(
        &self,
        principal: Principal,
        page: PageRequest,
    ) -> Result<CustomerPage, AdminServiceError>;
}
