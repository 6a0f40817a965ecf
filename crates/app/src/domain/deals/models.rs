//! Deal Models

use jiff::Timestamp;
use storefront_core::{
    deals::{self, DealDiscount, DealScope, DealStatus, DealWindow, RemainingTime},
    money::MoneyError,
};
use uuid::Uuid;

use crate::{
    domain::catalog::models::{CategoryUuid, ProductUuid},
    uuids::TypedUuid,
};

/// Deal UUID
pub type DealUuid = TypedUuid<Deal>;

/// Deal Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    pub uuid: DealUuid,
    pub title: String,
    pub description: Option<String>,
    pub discount: DealDiscount,
    pub min_purchase_amount: Option<u64>,
    pub window: DealWindow,
    pub scope: DealScope<Uuid>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Deal {
    /// Active status and `now` inside the window.
    #[must_use]
    pub fn is_active(&self, now: Timestamp) -> bool {
        self.window.is_active(now)
    }

    /// Whether the deal targets the product directly or through its category.
    #[must_use]
    pub fn applies_to(&self, product: ProductUuid, category: Option<CategoryUuid>) -> bool {
        self.scope.applies_to(
            &product.into_uuid(),
            category.map(CategoryUuid::into_uuid).as_ref(),
        )
    }

    /// Whether `subtotal` clears the minimum purchase amount, if any.
    #[must_use]
    pub fn meets_minimum(&self, subtotal: u64) -> bool {
        deals::meets_minimum(self.min_purchase_amount, subtotal)
    }

    /// Discounted price.
    ///
    /// # Errors
    ///
    /// Returns an error when the discount calculation overflows.
    pub fn effective_price(&self, price: u64) -> Result<u64, MoneyError> {
        self.discount.effective_price(price)
    }

    /// Time left before the deal ends.
    #[must_use]
    pub fn remaining(&self, now: Timestamp) -> RemainingTime {
        self.window.remaining(now)
    }

    /// Product ids in scope.
    pub fn product_uuids(&self) -> impl Iterator<Item = ProductUuid> + '_ {
        self.scope
            .products
            .iter()
            .copied()
            .map(ProductUuid::from_uuid)
    }

    /// Category ids in scope.
    pub fn category_uuids(&self) -> impl Iterator<Item = CategoryUuid> + '_ {
        self.scope
            .categories
            .iter()
            .copied()
            .map(CategoryUuid::from_uuid)
    }
}

/// Deal definition submitted by an admin, used for both create and full update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDeal {
    pub title: String,
    pub description: Option<String>,
    pub discount_percentage: Option<u8>,
    pub discount_amount: Option<u64>,
    pub max_discount_amount: Option<u64>,
    pub min_purchase_amount: Option<u64>,
    pub status: DealStatus,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub product_uuids: Vec<ProductUuid>,
    pub category_uuids: Vec<CategoryUuid>,
}
