//! Order aggregate.
//!
//! Only the slice of an order the payment flow needs: identity, the
//! correlation token sent to the gateway, the total, the authorization
//! marker and the two status machines.
//!
//! # Invariants
//!
//! - `authorization_transaction_id`, once set, is never replaced by a
//!   different gateway payment id
//! - `paid_at` is set exactly when `payment_status` becomes `Paid`
//! - `version` increases on every persisted update (optimistic locking)

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    Amount, DomainError, ErrorCode, OrderGuid, OrderId, StateMachine, Timestamp,
};

use super::{OrderStatus, PaymentStatus};

/// A purchased line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_name: String,
    pub quantity: u32,
}

impl OrderItem {
    pub fn new(product_name: impl Into<String>, quantity: u32) -> Self {
        Self {
            product_name: product_name.into(),
            quantity,
        }
    }
}

/// Order aggregate as seen by the payment flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,

    /// Correlation token echoed back by the gateway.
    pub order_guid: OrderGuid,

    /// Order total, possibly carrying more than two decimals.
    pub total: Amount,

    /// Gateway payment id that paid this order.
    pub authorization_transaction_id: Option<String>,

    pub order_status: OrderStatus,

    pub payment_status: PaymentStatus,

    pub items: Vec<OrderItem>,

    pub created_at: Timestamp,

    pub paid_at: Option<Timestamp>,

    /// Optimistic concurrency token.
    pub version: i32,
}

impl Order {
    /// Creates a freshly placed order awaiting payment.
    pub fn place(id: OrderId, order_guid: OrderGuid, total: Amount, items: Vec<OrderItem>) -> Self {
        Self {
            id,
            order_guid,
            total,
            authorization_transaction_id: None,
            order_status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            items,
            created_at: Timestamp::now(),
            paid_at: None,
            version: 0,
        }
    }

    /// Human-readable summary of the purchased products.
    pub fn item_summary(&self) -> String {
        self.items
            .iter()
            .map(|item| item.product_name.trim())
            .filter(|name| !name.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// True when the order already carries this gateway payment id.
    pub fn is_authorized_by(&self, gateway_payment_id: &str) -> bool {
        self.authorization_transaction_id.as_deref() == Some(gateway_payment_id)
    }

    /// Returns true if the order may be marked as paid.
    pub fn can_mark_as_paid(&self) -> bool {
        self.order_status != OrderStatus::Cancelled
            && self.payment_status.can_transition_to(&PaymentStatus::Paid)
    }

    /// Records the gateway payment id that settles this order.
    ///
    /// # Errors
    ///
    /// `AuthorizationConflict` if a different payment id is already recorded.
    pub fn record_authorization(&mut self, gateway_payment_id: &str) -> Result<(), DomainError> {
        match self.authorization_transaction_id.as_deref() {
            Some(existing) if existing == gateway_payment_id => Ok(()),
            Some(existing) => Err(DomainError::new(
                ErrorCode::AuthorizationConflict,
                "Order already carries a different gateway payment id",
            )
            .with_detail("existing", existing)
            .with_detail("incoming", gateway_payment_id)),
            None => {
                self.authorization_transaction_id = Some(gateway_payment_id.to_string());
                Ok(())
            }
        }
    }

    /// Transitions the order to paid.
    ///
    /// # Errors
    ///
    /// `InvalidStateTransition` if the order is cancelled or already settled.
    pub fn mark_as_paid(&mut self, now: Timestamp) -> Result<(), DomainError> {
        if !self.can_mark_as_paid() {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Order {} cannot be marked as paid (order {:?}, payment {:?})",
                    self.id, self.order_status, self.payment_status
                ),
            ));
        }

        self.payment_status = self
            .payment_status
            .transition_to(PaymentStatus::Paid)
            .map_err(|e| DomainError::new(ErrorCode::InvalidStateTransition, e.to_string()))?;
        self.paid_at = Some(now);

        if self.order_status == OrderStatus::Pending {
            self.order_status = OrderStatus::Processing;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn test_order() -> Order {
        Order::place(
            OrderId::new(7).unwrap(),
            OrderGuid::new(),
            Amount::new(Decimal::new(25000, 2)),
            vec![OrderItem::new("Kettle", 1), OrderItem::new("Mug", 2)],
        )
    }

    #[test]
    fn placed_order_is_pending_and_unpaid() {
        let order = test_order();
        assert_eq!(order.order_status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert!(order.authorization_transaction_id.is_none());
        assert!(order.can_mark_as_paid());
    }

    #[test]
    fn item_summary_joins_product_names() {
        assert_eq!(test_order().item_summary(), "Kettle, Mug");
    }

    #[test]
    fn item_summary_skips_blank_names() {
        let mut order = test_order();
        order.items.push(OrderItem::new("  ", 1));
        assert_eq!(order.item_summary(), "Kettle, Mug");
    }

    #[test]
    fn record_authorization_sets_marker_once() {
        let mut order = test_order();
        order.record_authorization("PF123").unwrap();
        assert!(order.is_authorized_by("PF123"));

        // Same id again is a no-op
        order.record_authorization("PF123").unwrap();
        assert!(order.is_authorized_by("PF123"));
    }

    #[test]
    fn record_authorization_refuses_different_marker() {
        let mut order = test_order();
        order.record_authorization("PF123").unwrap();

        let err = order.record_authorization("PF999").unwrap_err();

        assert_eq!(err.code, ErrorCode::AuthorizationConflict);
        assert!(order.is_authorized_by("PF123"));
    }

    #[test]
    fn mark_as_paid_moves_pending_order_to_processing() {
        let mut order = test_order();
        let now = Timestamp::now();

        order.mark_as_paid(now).unwrap();

        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert_eq!(order.order_status, OrderStatus::Processing);
        assert_eq!(order.paid_at, Some(now));
        assert!(!order.can_mark_as_paid());
    }

    #[test]
    fn mark_as_paid_twice_fails() {
        let mut order = test_order();
        order.mark_as_paid(Timestamp::now()).unwrap();

        let err = order.mark_as_paid(Timestamp::now()).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[test]
    fn cancelled_order_cannot_be_marked_paid() {
        let mut order = test_order();
        order.order_status = OrderStatus::Cancelled;

        assert!(!order.can_mark_as_paid());
        assert!(order.mark_as_paid(Timestamp::now()).is_err());
        assert_eq!(order.payment_status, PaymentStatus::Pending);
    }

    #[test]
    fn authorized_order_can_be_marked_paid() {
        let mut order = test_order();
        order.payment_status = PaymentStatus::Authorized;
        assert!(order.can_mark_as_paid());
    }
}
