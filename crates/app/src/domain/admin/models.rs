//! Admin Models

use jiff::Timestamp;
use storefront_core::{orders::OrderStatus, pagination::Pagination};

use crate::{
    auth::UserUuid,
    domain::{catalog::models::ProductUuid, orders::models::Order},
};

/// Number of recent orders included in the dashboard.
pub const RECENT_ORDERS: u32 = 5;

/// Orders in one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: u64,
}

/// A product at or below the low-stock threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LowStockProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub slug: String,
    pub stock: u32,
}

/// Dashboard figures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminStats {
    /// Sum of order totals with payment status `paid`.
    pub total_revenue: u64,
    pub order_count: u64,
    /// One entry per status, in lifecycle order, including zero counts.
    pub orders_by_status: Vec<StatusCount>,
    pub customer_count: u64,
    pub active_product_count: u64,
    pub low_stock_threshold: u32,
    pub low_stock_products: Vec<LowStockProduct>,
    pub recent_orders: Vec<Order>,
}

/// A customer with order aggregates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerSummary {
    pub uuid: UserUuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub created_at: Timestamp,
    pub order_count: u64,
    /// Sum of totals of orders that were not cancelled.
    pub total_spent: u64,
}

/// One page of customers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerPage {
    pub customers: Vec<CustomerSummary>,
    pub pagination: Pagination,
}

/// Expand grouped counts to every status, in lifecycle order.
#[must_use]
pub fn counts_for_every_status(grouped: &[StatusCount]) -> Vec<StatusCount> {
    OrderStatus::ALL
        .into_iter()
        .map(|status| StatusCount {
            status,
            count: grouped
                .iter()
                .find(|entry| entry.status == status)
                .map_or(0, |entry| entry.count),
        })
        .collect()
}
