//! Order and payment status state machines.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Fulfilment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed, awaiting payment or processing.
    Pending,
    /// Paid and being fulfilled.
    Processing,
    /// Fulfilled.
    Complete,
    /// Cancelled by the buyer or the store.
    Cancelled,
}

impl StateMachine for OrderStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use OrderStatus::*;
        matches!(
            (self, target),
            (Pending, Processing)
                | (Pending, Cancelled)
                | (Processing, Complete)
                | (Processing, Cancelled)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use OrderStatus::*;
        match self {
            Pending => vec![Processing, Cancelled],
            Processing => vec![Complete, Cancelled],
            Complete => vec![],
            Cancelled => vec![],
        }
    }
}

/// Payment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// No money received yet.
    Pending,
    /// Funds reserved but not captured.
    Authorized,
    /// Fully paid.
    Paid,
    PartiallyRefunded,
    Refunded,
    Voided,
}

impl StateMachine for PaymentStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use PaymentStatus::*;
        matches!(
            (self, target),
            (Pending, Authorized)
                | (Pending, Paid)
                | (Pending, Voided)
                | (Authorized, Paid)
                | (Authorized, Voided)
                | (Paid, PartiallyRefunded)
                | (Paid, Refunded)
                | (PartiallyRefunded, PartiallyRefunded)
                | (PartiallyRefunded, Refunded)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use PaymentStatus::*;
        match self {
            Pending => vec![Authorized, Paid, Voided],
            Authorized => vec![Paid, Voided],
            Paid => vec![PartiallyRefunded, Refunded],
            PartiallyRefunded => vec![PartiallyRefunded, Refunded],
            Refunded => vec![],
            Voided => vec![],
        }
    }
}
