//! Deals
//!
//! Time-boxed promotions that lower the price of specific products or whole categories.

use std::{fmt, str::FromStr};

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::{self, MoneyError};

/// Errors raised while validating a deal definition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DealError {
    /// Neither or both discount kinds were supplied.
    #[error("exactly one of discount percentage or discount amount is required")]
    AmbiguousDiscount,

    /// Percentage outside `1..=100`.
    #[error("discount percentage must be between 1 and 100")]
    PercentageOutOfRange,

    /// Fixed amount of zero.
    #[error("discount amount must be greater than zero")]
    ZeroAmount,

    /// The window ends before it starts.
    #[error("deal must end after it starts")]
    InvalidWindow,

    /// Unknown status string.
    #[error("unknown deal status")]
    UnknownStatus,
}

/// Publication status of a deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealStatus {
    /// Being prepared; never shown.
    Draft,

    /// Shown while inside its window.
    Active,

    /// Temporarily withdrawn.
    Paused,
}

impl DealStatus {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Paused => "paused",
        }
    }
}

impl fmt::Display for DealStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DealStatus {
    type Err = DealError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "paused" => Ok(Self::Paused),
            _ => Err(DealError::UnknownStatus),
        }
    }
}

/// How a deal lowers a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DealDiscount {
    /// Percentage off, optionally capped.
    Percentage {
        /// Whole percent, `1..=100`.
        percentage: u8,

        /// Largest discount granted in minor units.
        max_discount_amount: Option<u64>,
    },

    /// Fixed amount off in minor units.
    FixedAmount {
        /// Amount subtracted from the price.
        amount: u64,
    },

    /// A deal without a discount. Prices pass through unchanged.
    None,
}

impl DealDiscount {
    /// Build a discount from the nullable storage columns.
    ///
    /// A positive percentage wins over an amount, matching how deals are evaluated.
    #[must_use]
    pub fn from_columns(
        percentage: Option<u8>,
        amount: Option<u64>,
        max_discount_amount: Option<u64>,
    ) -> Self {
        match (percentage, amount) {
            (Some(percentage), _) if percentage > 0 => Self::Percentage {
                percentage,
                max_discount_amount,
            },
            (_, Some(amount)) => Self::FixedAmount { amount },
            _ => Self::None,
        }
    }

    /// Validate a discount supplied by an administrator.
    ///
    /// # Errors
    ///
    /// Returns an error unless exactly one discount kind with a sensible value is given.
    pub fn validated(
        percentage: Option<u8>,
        amount: Option<u64>,
        max_discount_amount: Option<u64>,
    ) -> Result<Self, DealError> {
        match (percentage, amount) {
            (Some(percentage), None) => {
                if !(1..=100).contains(&percentage) {
                    return Err(DealError::PercentageOutOfRange);
                }

                Ok(Self::Percentage {
                    percentage,
                    max_discount_amount,
                })
            }
            (None, Some(amount)) => {
                if amount == 0 {
                    return Err(DealError::ZeroAmount);
                }

                Ok(Self::FixedAmount { amount })
            }
            _ => Err(DealError::AmbiguousDiscount),
        }
    }

    /// Amount taken off `price`.
    ///
    /// Never exceeds `price`.
    ///
    /// # Errors
    ///
    /// Returns an error when the percentage calculation overflows.
    pub fn discount_on(&self, price: u64) -> Result<u64, MoneyError> {
        let discount = match *self {
            Self::Percentage {
                percentage,
                max_discount_amount,
            } => {
                let discount = money::basis_points_of(price, u32::from(percentage) * 100)?;

                max_discount_amount.map_or(discount, |cap| discount.min(cap))
            }
            Self::FixedAmount { amount } => amount,
            Self::None => 0,
        };

        Ok(discount.min(price))
    }

    /// Price after the discount, floored at zero.
    ///
    /// # Errors
    ///
    /// Returns an error when the percentage calculation overflows.
    pub fn effective_price(&self, price: u64) -> Result<u64, MoneyError> {
        Ok(price.saturating_sub(self.discount_on(price)?))
    }
}

/// The time window and targeting of a deal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealWindow {
    /// Publication status.
    pub status: DealStatus,

    /// First instant the deal applies.
    pub start: Timestamp,

    /// Last instant the deal applies.
    pub end: Timestamp,
}

impl DealWindow {
    /// Validate a window.
    ///
    /// # Errors
    ///
    /// Returns [`DealError::InvalidWindow`] when `end` is not after `start`.
    pub fn new(status: DealStatus, start: Timestamp, end: Timestamp) -> Result<Self, DealError> {
        if end <= start {
            return Err(DealError::InvalidWindow);
        }

        Ok(Self { status, start, end })
    }

    /// Active deals have `active` status and contain `now` in `[start, end]`.
    #[must_use]
    pub fn is_active(&self, now: Timestamp) -> bool {
        self.status == DealStatus::Active && self.start <= now && now <= self.end
    }

    /// Time left until the deal ends.
    #[must_use]
    pub fn remaining(&self, now: Timestamp) -> RemainingTime {
        RemainingTime::until(self.end, now)
    }
}

/// Coarsest non-zero unit of time left before a deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "snake_case")]
pub enum RemainingTime {
    /// Whole days left.
    Days(i64),

    /// Whole hours left, less than a day.
    Hours(i64),

    /// Whole minutes left, less than an hour.
    Minutes(i64),

    /// The deadline has passed or is less than a minute away.
    Ended,
}

impl RemainingTime {
    /// Time left from `now` until `end`.
    #[must_use]
    pub fn until(end: Timestamp, now: Timestamp) -> Self {
        let left: SignedDuration = end.duration_since(now);
        let seconds = left.as_secs();

        let days = seconds / 86_400;
        let hours = seconds / 3_600;
        let minutes = seconds / 60;

        if days > 0 {
            Self::Days(days)
        } else if hours > 0 {
            Self::Hours(hours)
        } else if minutes > 0 {
            Self::Minutes(minutes)
        } else {
            Self::Ended
        }
    }
}

impl fmt::Display for RemainingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Days(days) => write!(f, "{days}d"),
            Self::Hours(hours) => write!(f, "{hours}h"),
            Self::Minutes(minutes) => write!(f, "{minutes}m"),
            Self::Ended => f.write_str("ended"),
        }
    }
}

/// Products and categories a deal is restricted to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DealScope<Id> {
    /// Explicit product ids.
    pub products: Vec<Id>,

    /// Category ids; every product in them qualifies.
    pub categories: Vec<Id>,
}

impl<Id: PartialEq> DealScope<Id> {
    /// Whether a product, optionally in a category, falls within the scope.
    pub fn applies_to(&self, product: &Id, category: Option<&Id>) -> bool {
        self.products.contains(product)
            || category.is_some_and(|category| self.categories.contains(category))
    }
}

/// Whether a subtotal clears an optional minimum purchase gate.
#[must_use]
pub fn meets_minimum(min_purchase_amount: Option<u64>, subtotal: u64) -> bool {
    min_purchase_amount.is_none_or(|minimum| subtotal >= minimum)
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn percentage_discount_is_taken_off() -> TestResult {
        let deal = DealDiscount::Percentage {
            percentage: 20,
            max_discount_amount: None,
        };

        assert_eq!(deal.effective_price(100_000)?, 80_000);

        Ok(())
    }

    #[test]
    fn percentage_discount_is_capped() -> TestResult {
        let deal = DealDiscount::Percentage {
            percentage: 50,
            max_discount_amount: Some(10_000),
        };

        let price = 100_000;
        let effective = deal.effective_price(price)?;

        assert_eq!(effective, 90_000);
        assert!(effective >= price - 10_000);

        Ok(())
    }

    #[test]
    fn fixed_amount_never_goes_negative() -> TestResult {
        let deal = DealDiscount::FixedAmount { amount: 70_000 };

        assert_eq!(deal.effective_price(50_000)?, 0);
        assert_eq!(deal.effective_price(100_000)?, 30_000);

        Ok(())
    }

    #[test]
    fn no_discount_passes_price_through() -> TestResult {
        assert_eq!(DealDiscount::None.effective_price(12_345)?, 12_345);

        Ok(())
    }

    #[test]
    fn discount_bounds_hold_across_prices() -> TestResult {
        let deal = DealDiscount::Percentage {
            percentage: 100,
            max_discount_amount: Some(2_500),
        };

        for price in [0_u64, 1, 999, 2_500, 2_501, 10_000, 1_000_000] {
            let effective = deal.effective_price(price)?;

            assert!(effective <= price, "discount must not raise the price");
            assert!(
                effective >= price.saturating_sub(2_500),
                "discount must respect the cap for {price}"
            );
        }

        Ok(())
    }

    #[test]
    fn positive_percentage_wins_over_amount_columns() {
        let discount = DealDiscount::from_columns(Some(10), Some(500), None);

        assert!(matches!(
            discount,
            DealDiscount::Percentage { percentage: 10, .. }
        ));

        let discount = DealDiscount::from_columns(Some(0), Some(500), None);

        assert_eq!(discount, DealDiscount::FixedAmount { amount: 500 });
        assert_eq!(DealDiscount::from_columns(None, None, None), DealDiscount::None);
    }

    #[test]
    fn validated_rejects_ambiguous_discounts() {
        assert_eq!(
            DealDiscount::validated(Some(10), Some(500), None),
            Err(DealError::AmbiguousDiscount)
        );
        assert_eq!(
            DealDiscount::validated(None, None, None),
            Err(DealError::AmbiguousDiscount)
        );
        assert_eq!(
            DealDiscount::validated(Some(101), None, None),
            Err(DealError::PercentageOutOfRange)
        );
        assert_eq!(
            DealDiscount::validated(None, Some(0), None),
            Err(DealError::ZeroAmount)
        );
    }

    #[test]
    fn active_window_requires_status_and_time() -> TestResult {
        let now = Timestamp::now();

        let running = DealWindow::new(
            DealStatus::Active,
            now.checked_sub(1.hour())?,
            now.checked_add(1.hour())?,
        )?;

        let ended = DealWindow::new(
            DealStatus::Active,
            now.checked_sub(2.hours())?,
            now.checked_sub(1.hour())?,
        )?;

        let paused = DealWindow {
            status: DealStatus::Paused,
            ..running.clone()
        };

        assert!(running.is_active(now));
        assert!(!ended.is_active(now));
        assert!(!paused.is_active(now));

        Ok(())
    }

    #[test]
    fn window_must_end_after_start() {
        let now = Timestamp::now();

        assert_eq!(
            DealWindow::new(DealStatus::Active, now, now),
            Err(DealError::InvalidWindow)
        );
    }

    #[test]
    fn remaining_time_uses_coarsest_unit() -> TestResult {
        let now = Timestamp::now();

        assert_eq!(
            RemainingTime::until(now.checked_add(50.hours())?, now),
            RemainingTime::Days(2)
        );
        assert_eq!(
            RemainingTime::until(now.checked_add(5.hours().minutes(30))?, now),
            RemainingTime::Hours(5)
        );
        assert_eq!(
            RemainingTime::until(now.checked_add(12.minutes())?, now),
            RemainingTime::Minutes(12)
        );
        assert_eq!(
            RemainingTime::until(now.checked_sub(1.minute())?, now),
            RemainingTime::Ended
        );
        assert_eq!(RemainingTime::Days(3).to_string(), "3d");

        Ok(())
    }

    #[test]
    fn scope_matches_products_and_categories() {
        let scope = DealScope {
            products: vec![1_u32, 2],
            categories: vec![10],
        };

        assert!(scope.applies_to(&1, None));
        assert!(scope.applies_to(&5, Some(&10)));
        assert!(!scope.applies_to(&5, Some(&11)));
        assert!(!scope.applies_to(&5, None));
    }

    #[test]
    fn minimum_purchase_gate() {
        assert!(meets_minimum(None, 0));
        assert!(meets_minimum(Some(1_000), 1_000));
        assert!(!meets_minimum(Some(1_000), 999));
    }
}
