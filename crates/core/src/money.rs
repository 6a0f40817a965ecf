//! Money

use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use thiserror::Error;

/// Basis points in one whole (100%).
pub const BASIS_POINTS_PER_UNIT: u32 = 10_000;

/// Errors raised by minor-unit arithmetic.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    /// The result does not fit in minor units.
    #[error("amount overflowed")]
    Overflow,
}

/// Multiply a unit price by a quantity.
///
/// # Errors
///
/// Returns [`MoneyError::Overflow`] when the product does not fit in a `u64`.
pub fn line_total(unit_price: u64, quantity: u32) -> Result<u64, MoneyError> {
    unit_price
        .checked_mul(u64::from(quantity))
        .ok_or(MoneyError::Overflow)
}

/// Sum a sequence of amounts.
///
/// # Errors
///
/// Returns [`MoneyError::Overflow`] when the sum does not fit in a `u64`.
pub fn checked_sum<I>(amounts: I) -> Result<u64, MoneyError>
where
    I: IntoIterator<Item = u64>,
{
    amounts
        .into_iter()
        .try_fold(0_u64, |acc, amount| acc.checked_add(amount))
        .ok_or(MoneyError::Overflow)
}

/// Calculate `amount × basis_points / 10_000` in minor units.
///
/// Halves are rounded away from zero.
///
/// # Errors
///
/// Returns [`MoneyError::Overflow`] when the result cannot be represented.
pub fn basis_points_of(amount: u64, basis_points: u32) -> Result<u64, MoneyError> {
    let Some(amount) = Decimal::from_u64(amount) else {
        return Err(MoneyError::Overflow);
    };

    let rate = Decimal::from(basis_points) / Decimal::from(BASIS_POINTS_PER_UNIT);

    let applied = amount.checked_mul(rate).ok_or(MoneyError::Overflow)?;

    applied
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .ok_or(MoneyError::Overflow)
}
