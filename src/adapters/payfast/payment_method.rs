//! PayFast redirect payment method.
//!
//! Only the redirect checkout is offered. Back-office operations are answered
//! as unsupported so the store can show the message to the operator.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::foundation::{Amount, DomainError, Timestamp};
use crate::domain::order::Order;
use crate::domain::payfast::{build_payment_redirect, PaymentRedirect};
use crate::ports::{
    Capability, CapabilityResult, GatewaySettingsProvider, PaymentMethod, PaymentMethodType,
    RecurringPaymentType,
};

/// Identifier the store uses to look the method up.
pub const SYSTEM_NAME: &str = "Payments.PayFastStandard";

const DESCRIPTION: &str = "You will be redirected to PayFast to complete the payment";

/// Minimum age of an order before the buyer may be sent to PayFast again.
const RE_POST_DELAY_SECS: i64 = 20;

const RECURRING_NOT_SUPPORTED: &str = "Recurring payment not supported";

/// [`PaymentMethod`] that sends the buyer to the PayFast hosted page.
pub struct PayFastPaymentMethod {
    settings: Arc<dyn GatewaySettingsProvider>,
    store_base_url: String,
    store_scope: Option<String>,
}

impl PayFastPaymentMethod {
    pub fn new(settings: Arc<dyn GatewaySettingsProvider>, store_base_url: impl Into<String>) -> Self {
        Self {
            settings,
            store_base_url: store_base_url.into(),
            store_scope: None,
        }
    }

    /// Resolves merchant settings for the given store instead of the default.
    pub fn with_store_scope(mut self, store_scope: Option<String>) -> Self {
        self.store_scope = store_scope;
        self
    }
}

#[async_trait]
impl PaymentMethod for PayFastPaymentMethod {
    fn system_name(&self) -> &'static str {
        SYSTEM_NAME
    }

    fn method_type(&self) -> PaymentMethodType {
        PaymentMethodType::Redirection
    }

    fn recurring_type(&self) -> RecurringPaymentType {
        RecurringPaymentType::NotSupported
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn supports(&self, _capability: Capability) -> bool {
        false
    }

    fn process_payment(&self, _order: &Order) -> CapabilityResult<()> {
        // Nothing to collect before the redirect.
        CapabilityResult::Success(())
    }

    async fn post_process_payment(&self, order: &Order) -> Result<PaymentRedirect, DomainError> {
        let settings = self.settings.load(self.store_scope.as_deref()).await?;
        Ok(build_payment_redirect(order, &settings, &self.store_base_url))
    }

    fn capture(&self, _order: &Order) -> CapabilityResult<()> {
        CapabilityResult::unsupported("Capture method not supported")
    }

    fn refund(&self, _order: &Order, _amount: Amount) -> CapabilityResult<()> {
        CapabilityResult::unsupported("Refund method not supported")
    }

    fn void(&self, _order: &Order) -> CapabilityResult<()> {
        CapabilityResult::unsupported("Void method not supported")
    }

    fn process_recurring_payment(&self, _order: &Order) -> CapabilityResult<()> {
        CapabilityResult::unsupported(RECURRING_NOT_SUPPORTED)
    }

    fn cancel_recurring_payment(&self, _order: &Order) -> CapabilityResult<()> {
        CapabilityResult::unsupported(RECURRING_NOT_SUPPORTED)
    }

    fn can_re_post_process_payment(&self, order: &Order, now: Timestamp) -> bool {
        now.duration_since(&order.created_at).num_seconds() >= RE_POST_DELAY_SECS
    }

    fn hide_payment_method(&self) -> bool {
        false
    }

    fn additional_handling_fee(&self) -> Amount {
        Amount::ZERO
    }
}
