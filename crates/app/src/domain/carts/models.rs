//! Cart Models

use jiff::Timestamp;
use storefront_core::pricing::{self, OrderTotals, PricedLine, PricingError, PricingPolicy};

use crate::{domain::catalog::models::ProductUuid, uuids::TypedUuid};

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItem>;

/// Live product data shown next to a cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartProduct {
    pub name: String,
    pub slug: String,
    pub price: u64,
    pub images: Vec<String>,
    pub stock: u32,
}

/// Persisted Cart Item Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub uuid: CartItemUuid,
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub product: CartProduct,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PricedLine for CartItem {
    fn unit_price(&self) -> u64 {
        self.product.price
    }

    fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// New Cart Item Model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewCartItem {
    pub product_uuid: ProductUuid,
    pub quantity: u32,
}

/// A user's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Sum of line totals at live prices.
    ///
    /// # Errors
    ///
    /// Returns an error when the sum overflows.
    pub fn subtotal(&self) -> Result<u64, PricingError> {
        pricing::subtotal(&self.items)
    }

    /// Totals the cart would be charged under `policy`.
    ///
    /// # Errors
    ///
    /// Returns an error when any amount overflows.
    pub fn totals(&self, policy: &PricingPolicy) -> Result<OrderTotals, PricingError> {
        policy.totals_for_lines(&self.items)
    }

    /// Number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn item(price: u64, quantity: u32) -> CartItem {
        CartItem {
            uuid: CartItemUuid::new(),
            product_uuid: ProductUuid::new(),
            quantity,
            product: CartProduct {
                name: "Item".to_string(),
                slug: "item".to_string(),
                price,
                images: Vec::new(),
                stock: 10,
            },
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn totals_use_live_prices() -> TestResult {
        let cart = Cart {
            items: vec![item(100_000, 2), item(50_000, 1)],
        };

        let totals = cart.totals(&PricingPolicy::default())?;

        assert_eq!(cart.subtotal()?, 250_000);
        assert_eq!(totals.total, 305_000);
        assert_eq!(cart.item_count(), 3);

        Ok(())
    }
}
