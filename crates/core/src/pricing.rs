//! Order pricing
//!
//! One set of formulas is used both when a cart is displayed and when an order row is
//! persisted, so the amount a shopper sees is the amount that gets charged:
//!
//! - `subtotal = Σ unit_price × quantity`
//! - `tax = subtotal × tax_rate`
//! - `shipping = 0` when `subtotal > free_shipping_threshold`, otherwise the flat fee
//! - `total = subtotal + tax + shipping`

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::{self, MoneyError};

/// Errors that can occur while pricing an order.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// Wrapped minor-unit arithmetic error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A priced line of a cart or order.
pub trait PricedLine {
    /// Unit price in minor units.
    fn unit_price(&self) -> u64;

    /// Number of units.
    fn quantity(&self) -> u32;

    /// Unit price multiplied by quantity.
    ///
    /// # Errors
    ///
    /// Returns an error when the line total overflows.
    fn line_total(&self) -> Result<u64, MoneyError> {
        money::line_total(self.unit_price(), self.quantity())
    }
}

impl PricedLine for (u64, u32) {
    fn unit_price(&self) -> u64 {
        self.0
    }

    fn quantity(&self) -> u32 {
        self.1
    }
}

/// Tax and shipping rules applied to a subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    /// Flat tax rate in basis points (1000 = 10%).
    pub tax_rate_bps: u32,

    /// Subtotals strictly above this amount ship for free.
    pub free_shipping_threshold: u64,

    /// Shipping fee charged at or below the threshold.
    pub flat_shipping_fee: u64,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            tax_rate_bps: 1_000,
            free_shipping_threshold: 500_000,
            flat_shipping_fee: 30_000,
        }
    }
}

impl PricingPolicy {
    /// Shipping charged for the given subtotal.
    #[must_use]
    pub const fn shipping_for(&self, subtotal: u64) -> u64 {
        if subtotal > self.free_shipping_threshold {
            0
        } else {
            self.flat_shipping_fee
        }
    }

    /// Tax charged for the given subtotal.
    ///
    /// # Errors
    ///
    /// Returns an error when the tax cannot be represented in minor units.
    pub fn tax_for(&self, subtotal: u64) -> Result<u64, PricingError> {
        Ok(money::basis_points_of(subtotal, self.tax_rate_bps)?)
    }

    /// Price a subtotal.
    ///
    /// # Errors
    ///
    /// Returns an error when any component overflows.
    pub fn totals(&self, subtotal: u64) -> Result<OrderTotals, PricingError> {
        let tax = self.tax_for(subtotal)?;
        let shipping = self.shipping_for(subtotal);
        let total = money::checked_sum([subtotal, tax, shipping])?;

        Ok(OrderTotals {
            subtotal,
            tax,
            shipping,
            total,
        })
    }

    /// Price a set of lines.
    ///
    /// # Errors
    ///
    /// Returns an error when any line total or component overflows.
    pub fn totals_for_lines<L: PricedLine>(&self, lines: &[L]) -> Result<OrderTotals, PricingError> {
        self.totals(subtotal(lines)?)
    }
}

/// Sum of every line's `unit_price × quantity`.
///
/// # Errors
///
/// Returns an error when the sum overflows.
pub fn subtotal<L: PricedLine>(lines: &[L]) -> Result<u64, PricingError> {
    let totals = lines
        .iter()
        .map(PricedLine::line_total)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(money::checked_sum(totals)?)
}

/// The four derived amounts of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    /// Sum of line totals.
    pub subtotal: u64,

    /// Tax on the subtotal.
    pub tax: u64,

    /// Shipping fee.
    pub shipping: u64,

    /// Subtotal plus tax plus shipping.
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn cents_policy() -> PricingPolicy {
        PricingPolicy {
            tax_rate_bps: 1_000,
            free_shipping_threshold: 50_00,
            flat_shipping_fee: 5_00,
        }
    }

    #[test]
    fn empty_subtotal_pays_flat_fee() -> TestResult {
        let totals = cents_policy().totals(0)?;

        assert_eq!(
            totals,
            OrderTotals {
                subtotal: 0,
                tax: 0,
                shipping: 5_00,
                total: 5_00,
            }
        );

        Ok(())
    }

    #[test]
    fn subtotal_below_threshold_pays_shipping() -> TestResult {
        let totals = cents_policy().totals(49_99)?;

        assert_eq!(totals.shipping, 5_00);
        assert_eq!(totals.tax, 5_00);
        assert_eq!(totals.total, 49_99 + 5_00 + 5_00);

        Ok(())
    }

    #[test]
    fn subtotal_above_threshold_ships_free() -> TestResult {
        let totals = cents_policy().totals(50_01)?;

        assert_eq!(totals.shipping, 0);
        assert_eq!(totals.tax, 5_00);
        assert_eq!(totals.total, 50_01 + 5_00);

        Ok(())
    }

    #[test]
    fn subtotal_equal_to_threshold_still_pays_shipping() -> TestResult {
        let totals = cents_policy().totals(50_00)?;

        assert_eq!(totals.shipping, 5_00, "threshold is exclusive");
        assert_eq!(totals.total, 50_00 + 5_00 + 5_00);

        Ok(())
    }

    #[test]
    fn two_line_cart_matches_expected_order_amounts() -> TestResult {
        let lines = [(100_000_u64, 2_u32), (50_000, 1)];

        let totals = PricingPolicy::default().totals_for_lines(&lines)?;

        assert_eq!(
            totals,
            OrderTotals {
                subtotal: 250_000,
                tax: 25_000,
                shipping: 30_000,
                total: 305_000,
            }
        );

        Ok(())
    }

    #[test]
    fn overflowing_lines_are_rejected() {
        let lines = [(u64::MAX, 1_u32), (1, 1)];

        assert!(subtotal(&lines).is_err());
    }
}
