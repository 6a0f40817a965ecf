//! Admin response models.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::admin::models::{
    AdminStats, CustomerSummary, LowStockProduct, StatusCount,
};

use crate::orders::OrderResponse;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct StatusCountResponse {
    pub status: String,
    pub count: u64,
}

impl From<StatusCount> for StatusCountResponse {
    fn from(entry: StatusCount) -> Self {
        Self {
            status: entry.status.to_string(),
            count: entry.count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct LowStockProductResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub stock: u32,
}

impl From<LowStockProduct> for LowStockProductResponse {
    fn from(product: LowStockProduct) -> Self {
        Self {
            id: product.uuid.into_uuid(),
            name: product.name,
            slug: product.slug,
            stock: product.stock,
        }
    }
}

/// Admin Stats Response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct StatsResponse {
    /// Sum of totals of paid orders
    pub total_revenue: u64,

    pub order_count: u64,

    /// Every status in lifecycle order, including empty ones
    pub orders_by_status: Vec<StatusCountResponse>,

    pub customer_count: u64,
    pub active_product_count: u64,
    pub low_stock_threshold: u32,
    pub low_stock_products: Vec<LowStockProductResponse>,
    pub recent_orders: Vec<OrderResponse>,
}

impl From<AdminStats> for StatsResponse {
    fn from(stats: AdminStats) -> Self {
        Self {
            total_revenue: stats.total_revenue,
            order_count: stats.order_count,
            orders_by_status: stats.orders_by_status.into_iter().map(Into::into).collect(),
            customer_count: stats.customer_count,
            active_product_count: stats.active_product_count,
            low_stock_threshold: stats.low_stock_threshold,
            low_stock_products: stats.low_stock_products.into_iter().map(Into::into).collect(),
            recent_orders: stats.recent_orders.into_iter().map(Into::into).collect(),
        }
    }
}

/// Customer Response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct CustomerResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub created_at: String,
    pub order_count: u64,

    /// Sum of totals of orders that were not cancelled
    pub total_spent: u64,
}

impl From<CustomerSummary> for CustomerResponse {
    fn from(customer: CustomerSummary) -> Self {
        Self {
            id: customer.uuid.into_uuid(),
            email: customer.email,
            full_name: customer.full_name,
            phone: customer.phone,
            created_at: customer.created_at.to_string(),
            order_count: customer.order_count,
            total_spent: customer.total_spent,
        }
    }
}
