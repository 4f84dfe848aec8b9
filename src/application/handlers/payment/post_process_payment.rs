//! PostProcessPaymentHandler - Builds the gateway redirect for an order.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, OrderId, Timestamp};
use crate::domain::payfast::PaymentRedirect;
use crate::ports::{OrderRepository, PaymentMethod};

/// Command to send the buyer to the gateway for an order.
#[derive(Debug, Clone)]
pub struct PostProcessPaymentCommand {
    pub order_id: OrderId,
    /// True when the buyer retries payment for an order placed earlier.
    pub is_retry: bool,
}

/// Handler producing the signed redirect for an unpaid order.
pub struct PostProcessPaymentHandler {
    repository: Arc<dyn OrderRepository>,
    payment_method: Arc<dyn PaymentMethod>,
}

impl PostProcessPaymentHandler {
    pub fn new(repository: Arc<dyn OrderRepository>, payment_method: Arc<dyn PaymentMethod>) -> Self {
        Self {
            repository,
            payment_method,
        }
    }

    /// # Errors
    ///
    /// - `OrderNotFound` if the order does not exist
    /// - `InvalidStateTransition` if the order is already settled or a retry
    ///   comes too soon after the order was placed
    pub async fn handle(&self, cmd: PostProcessPaymentCommand) -> Result<PaymentRedirect, DomainError> {
        let order = self
            .repository
            .find_by_id(cmd.order_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(ErrorCode::OrderNotFound, format!("Order {} not found", cmd.order_id))
            })?;

        if !order.can_mark_as_paid() {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Order {} is not awaiting payment", order.id),
            ));
        }

        if cmd.is_retry
            && !self
                .payment_method
                .can_re_post_process_payment(&order, Timestamp::now())
        {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Order {} cannot be re-posted yet", order.id),
            ));
        }

        let redirect = self.payment_method.post_process_payment(&order).await?;

        tracing::debug!(order_id = %order.id, "Built PayFast payment redirect");

        Ok(redirect)
    }
}
