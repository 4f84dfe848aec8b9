//! Payment method capability port.
//!
//! A store talks to every payment method through the same capability set.
//! Operations a method does not offer answer with
//! [`CapabilityResult::Unsupported`] instead of failing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Amount, DomainError, Timestamp};
use crate::domain::order::Order;
use crate::domain::payfast::PaymentRedirect;

/// How the buyer completes payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodType {
    /// Card details entered on the store's own checkout.
    Standard,
    /// Buyer is sent to a third-party hosted page.
    Redirection,
    /// Nothing to collect.
    Button,
}

/// Recurring billing support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurringPaymentType {
    NotSupported,
    Manual,
    Automatic,
}

/// Optional back-office operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Capture,
    Refund,
    PartialRefund,
    Void,
}

/// Outcome of a capability call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityResult<T> {
    Success(T),
    /// The method does not offer this operation.
    Unsupported(String),
}

impl<T> CapabilityResult<T> {
    pub fn unsupported(message: impl Into<String>) -> Self {
        CapabilityResult::Unsupported(message.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CapabilityResult::Success(_))
    }

    /// Error messages to show the operator; empty on success.
    pub fn errors(&self) -> Vec<String> {
        match self {
            CapabilityResult::Success(_) => Vec::new(),
            CapabilityResult::Unsupported(message) => vec![message.clone()],
        }
    }
}

/// Port implemented by every payment method.
#[async_trait]
pub trait PaymentMethod: Send + Sync {
    /// Stable identifier the store uses to look the method up.
    fn system_name(&self) -> &'static str;

    fn method_type(&self) -> PaymentMethodType;

    fn recurring_type(&self) -> RecurringPaymentType;

    /// Text shown to the buyer at checkout.
    fn description(&self) -> &'static str;

    fn supports(&self, capability: Capability) -> bool;

    /// Called when the order is placed.
    fn process_payment(&self, order: &Order) -> CapabilityResult<()>;

    /// Called after the order is placed to send the buyer to the gateway.
    async fn post_process_payment(&self, order: &Order) -> Result<PaymentRedirect, DomainError>;

    fn capture(&self, order: &Order) -> CapabilityResult<()>;

    fn refund(&self, order: &Order, amount: Amount) -> CapabilityResult<()>;

    fn void(&self, order: &Order) -> CapabilityResult<()>;

    fn process_recurring_payment(&self, order: &Order) -> CapabilityResult<()>;

    fn cancel_recurring_payment(&self, order: &Order) -> CapabilityResult<()>;

    /// Whether the buyer may be sent to the gateway again for an unpaid order.
    fn can_re_post_process_payment(&self, order: &Order, now: Timestamp) -> bool;

    fn hide_payment_method(&self) -> bool;

    fn additional_handling_fee(&self) -> Amount;
}
