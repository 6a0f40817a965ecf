//! Orders
//!
//! Order and payment status machines plus the accepted payment methods.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when parsing or transitioning order state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderStateError {
    /// Unknown order status string.
    #[error("unknown order status: {0}")]
    UnknownStatus(String),

    /// Unknown payment status string.
    #[error("unknown payment status: {0}")]
    UnknownPaymentStatus(String),

    /// Unknown payment method string.
    #[error("unknown payment method: {0}")]
    UnknownPaymentMethod(String),

    /// Transition not allowed by the order status machine.
    #[error("cannot move order from {from} to {to}")]
    InvalidStatusTransition {
        /// Current status.
        from: OrderStatus,

        /// Requested status.
        to: OrderStatus,
    },

    /// Transition not allowed by the payment status machine.
    #[error("cannot move payment from {from} to {to}")]
    InvalidPaymentTransition {
        /// Current status.
        from: PaymentStatus,

        /// Requested status.
        to: PaymentStatus,
    },
}

/// Fulfilment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed, not yet worked on.
    Pending,

    /// Being prepared.
    Processing,

    /// Handed to the carrier.
    Shipped,

    /// Received by the customer.
    Delivered,

    /// Cancelled before shipping.
    Cancelled,
}

impl OrderStatus {
    /// Every status in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether an order in this status may move to `next`.
    ///
    /// Orders move forward one step at a time and can only be cancelled before they ship.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing | Self::Cancelled)
                | (Self::Processing, Self::Shipped | Self::Cancelled)
                | (Self::Shipped, Self::Delivered)
        )
    }

    /// Validate a transition.
    ///
    /// # Errors
    ///
    /// Returns [`OrderStateError::InvalidStatusTransition`] when the move is not allowed.
    pub fn transition_to(self, next: Self) -> Result<Self, OrderStateError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(OrderStateError::InvalidStatusTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Whether reserved stock should be returned when entering this status.
    #[must_use]
    pub const fn restores_stock(self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = OrderStateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| OrderStateError::UnknownStatus(value.to_string()))
    }
}

/// Payment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Awaiting payment.
    Pending,

    /// Paid in full.
    Paid,

    /// Payment attempt failed.
    Failed,

    /// Payment returned to the customer.
    Refunded,
}

impl PaymentStatus {
    /// Every payment status.
    pub const ALL: [Self; 4] = [Self::Pending, Self::Paid, Self::Failed, Self::Refunded];

    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }

    /// Whether a payment in this status may move to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Paid | Self::Failed)
                | (Self::Failed, Self::Paid)
                | (Self::Paid, Self::Refunded)
        )
    }

    /// Validate a transition.
    ///
    /// # Errors
    ///
    /// Returns [`OrderStateError::InvalidPaymentTransition`] when the move is not allowed.
    pub fn transition_to(self, next: Self) -> Result<Self, OrderStateError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(OrderStateError::InvalidPaymentTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = OrderStateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| OrderStateError::UnknownPaymentStatus(value.to_string()))
    }
}

/// How the customer intends to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash on delivery.
    Cod,

    /// Manual bank transfer.
    BankTransfer,

    /// Card payment.
    Card,
}

impl PaymentMethod {
    /// Every accepted method.
    pub const ALL: [Self; 3] = [Self::Cod, Self::BankTransfer, Self::Card];

    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cod => "cod",
            Self::BankTransfer => "bank_transfer",
            Self::Card => "card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = OrderStateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == value)
            .ok_or_else(|| OrderStateError::UnknownPaymentMethod(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn order_status_moves_forward_one_step() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Processing));
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Shipped));
        assert!(OrderStatus::Shipped.can_transition_to(OrderStatus::Delivered));

        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Shipped));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn only_unshipped_orders_can_be_cancelled() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Shipped.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Processing));
    }

    #[test]
    fn invalid_transition_reports_both_ends() {
        let result = OrderStatus::Delivered.transition_to(OrderStatus::Cancelled);

        assert_eq!(
            result,
            Err(OrderStateError::InvalidStatusTransition {
                from: OrderStatus::Delivered,
                to: OrderStatus::Cancelled,
            })
        );
    }

    #[test]
    fn payment_status_machine() {
        assert!(PaymentStatus::Pending.can_transition_to(PaymentStatus::Paid));
        assert!(PaymentStatus::Pending.can_transition_to(PaymentStatus::Failed));
        assert!(PaymentStatus::Failed.can_transition_to(PaymentStatus::Paid));
        assert!(PaymentStatus::Paid.can_transition_to(PaymentStatus::Refunded));

        assert!(!PaymentStatus::Pending.can_transition_to(PaymentStatus::Refunded));
        assert!(!PaymentStatus::Refunded.can_transition_to(PaymentStatus::Paid));
    }

    #[test]
    fn statuses_round_trip_through_strings() -> TestResult {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>()?, status);
        }

        assert_eq!("bank_transfer".parse::<PaymentMethod>()?, PaymentMethod::BankTransfer);
        assert!("bitcoin".parse::<PaymentMethod>().is_err());
        assert!("lost".parse::<OrderStatus>().is_err());

        Ok(())
    }
}
