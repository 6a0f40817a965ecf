//! Admin Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use storefront_core::{orders::OrderStatus, pagination::PageRequest};

use crate::{
    auth::UserUuid,
    database::{count_param, try_get_amount, try_get_count, try_get_total},
    domain::{
        admin::models::{CustomerSummary, LowStockProduct, StatusCount},
        catalog::models::ProductUuid,
        orders::models::Order,
    },
};

const ORDER_TOTALS_SQL: &str = include_str!("sql/order_totals.sql");
const ORDERS_BY_STATUS_SQL: &str = include_str!("sql/orders_by_status.sql");
const CATALOG_COUNTS_SQL: &str = include_str!("sql/catalog_counts.sql");
const LOW_STOCK_PRODUCTS_SQL: &str = include_str!("sql/low_stock_products.sql");
const RECENT_ORDERS_SQL: &str = include_str!("sql/recent_orders.sql");
const LIST_CUSTOMERS_SQL: &str = include_str!("sql/list_customers.sql");
const COUNT_CUSTOMERS_SQL: &str = include_str!("sql/count_customers.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAdminRepository;

impl PgAdminRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Order count and paid revenue.
    pub(crate) async fn order_totals(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<(u64, u64), sqlx::Error> {
        let row = query(ORDER_TOTALS_SQL).fetch_one(&mut **tx).await?;

        Ok((
            try_get_total(&row, "order_count")?,
            try_get_amount(&row, "total_revenue")?,
        ))
    }

    pub(crate) async fn orders_by_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<StatusCount>, sqlx::Error> {
        query_as::<Postgres, StatusCount>(ORDERS_BY_STATUS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    /// Customer and active product counts.
    pub(crate) async fn catalog_counts(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<(u64, u64), sqlx::Error> {
        let row = query(CATALOG_COUNTS_SQL).fetch_one(&mut **tx).await?;

        Ok((
            try_get_total(&row, "customer_count")?,
            try_get_total(&row, "active_product_count")?,
        ))
    }

    pub(crate) async fn low_stock_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        threshold: u32,
    ) -> Result<Vec<LowStockProduct>, sqlx::Error> {
        query_as::<Postgres, LowStockProduct>(LOW_STOCK_PRODUCTS_SQL)
            .bind(count_param(threshold, "stock")?)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn recent_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        limit: u32,
    ) -> Result<Vec<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(RECENT_ORDERS_SQL)
            .bind(i64::from(limit))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_customers(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        page: PageRequest,
    ) -> Result<Vec<CustomerSummary>, sqlx::Error> {
        query_as::<Postgres, CustomerSummary>(LIST_CUSTOMERS_SQL)
            .bind(page.limit())
            .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_customers(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<u64, sqlx::Error> {
        let row = query(COUNT_CUSTOMERS_SQL).fetch_one(&mut **tx).await?;

        try_get_total(&row, "total")
    }
}

impl<'r> FromRow<'r, PgRow> for StatusCount {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;

        Ok(Self {
            status: status
                .parse::<OrderStatus>()
                .map_err(|e| sqlx::Error::ColumnDecode {
                    index: "status".to_string(),
                    source: Box::new(e),
                })?,
            count: try_get_total(row, "total")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for LowStockProduct {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
            stock: try_get_count(row, "stock")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CustomerSummary {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: UserUuid::from_uuid(row.try_get("uuid")?),
            email: row.try_get("email")?,
            full_name: row.try_get("full_name")?,
            phone: row.try_get("phone")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            order_count: try_get_total(row, "order_count")?,
            total_spent: try_get_amount(row, "total_spent")?,
        })
    }
}
