//! HandlePaymentNotificationHandler - Settles orders from PayFast notifications.
//!
//! Processing order for one notification:
//!
//! 1. Verify the signature over the received fields
//! 2. Parse the well-known fields into a typed payload
//! 3. Take the per-order lock on the correlation token
//! 4. Load the order and run the origin, amount, duplicate and status guards
//! 5. Revalidate with the gateway
//! 6. Check the order may still be marked paid
//! 7. Record the gateway payment id and mark paid, then persist once
//!
//! The lease is held for steps 4 to 7. If the request is dropped midway the
//! lease drops with it, and since nothing is written before step 7 the order
//! is left exactly as it was.
//!
//! Steps that reject the notification answer with an outcome, not an error,
//! so the gateway receives `200 OK` and stops redelivering.

use std::sync::Arc;

use crate::domain::foundation::{ErrorCode, Timestamp};
use crate::domain::payfast::{
    evaluate_guards, verify_notification, GatewaySettings, GuardVerdict, NotificationError,
    NotificationOutcome, NotificationPayload, RawNotification, RejectionReason,
};
use crate::ports::{GatewaySettingsProvider, OrderLock, OrderRepository, PaymentValidator};

/// Command carrying one inbound notification.
#[derive(Debug, Clone)]
pub struct HandlePaymentNotificationCommand {
    /// Raw `application/x-www-form-urlencoded` body.
    pub body: Vec<u8>,
    /// `Referer` header as received.
    pub referer: Option<String>,
    /// Store scope the notification belongs to.
    pub store_scope: Option<String>,
}

/// Handler for PayFast payment notifications.
pub struct HandlePaymentNotificationHandler {
    settings: Arc<dyn GatewaySettingsProvider>,
    repository: Arc<dyn OrderRepository>,
    lock: Arc<dyn OrderLock>,
    validator: Arc<dyn PaymentValidator>,
}

impl HandlePaymentNotificationHandler {
    pub fn new(
        settings: Arc<dyn GatewaySettingsProvider>,
        repository: Arc<dyn OrderRepository>,
        lock: Arc<dyn OrderLock>,
        validator: Arc<dyn PaymentValidator>,
    ) -> Self {
        Self {
            settings,
            repository,
            lock,
            validator,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandlePaymentNotificationCommand,
    ) -> Result<NotificationOutcome, NotificationError> {
        let settings = self
            .settings
            .load(cmd.store_scope.as_deref())
            .await
            .map_err(NotificationError::Settings)?;

        let raw = RawNotification::from_form_body(&cmd.body);

        // 1. Authenticity
        if !verify_notification(&raw, &settings) {
            tracing::warn!(
                pf_payment_id = raw.get("pf_payment_id").unwrap_or_default(),
                "PayFast notification signature mismatch"
            );
            return Ok(NotificationOutcome::Rejected(RejectionReason::InvalidSignature));
        }

        // 2. Typed payload
        let payload = match NotificationPayload::parse(&raw) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed PayFast notification");
                return Ok(NotificationOutcome::Rejected(RejectionReason::MalformedPayload(
                    e.to_string(),
                )));
            }
        };

        // 3. Serialize deliveries for the same order
        let lease = self
            .lock
            .acquire(&payload.order_guid)
            .await
            .map_err(NotificationError::Lock)?;

        let result = self
            .reconcile(&raw, &payload, &settings, cmd.referer.as_deref())
            .await;

        if let Err(e) = self.lock.release(lease).await {
            tracing::warn!(order_guid = %payload.order_guid, error = %e, "Failed to release order lock");
        }

        result
    }

    async fn reconcile(
        &self,
        raw: &RawNotification,
        payload: &NotificationPayload,
        settings: &GatewaySettings,
        referer: Option<&str>,
    ) -> Result<NotificationOutcome, NotificationError> {
        // 4. Order lookup and guards
        let mut order = match self
            .repository
            .find_by_guid(&payload.order_guid)
            .await
            .map_err(NotificationError::Store)?
        {
            Some(order) => order,
            None => {
                tracing::warn!(
                    order_guid = %payload.order_guid,
                    pf_payment_id = %payload.pf_payment_id,
                    "PayFast notification for unknown order"
                );
                return Ok(NotificationOutcome::Rejected(RejectionReason::OrderNotFound));
            }
        };

        match evaluate_guards(&order, payload, referer) {
            GuardVerdict::Proceed => {}
            GuardVerdict::Duplicate => {
                tracing::debug!(
                    order_id = %order.id,
                    pf_payment_id = %payload.pf_payment_id,
                    "Duplicate PayFast notification ignored"
                );
                return Ok(NotificationOutcome::Duplicate);
            }
            GuardVerdict::Reject(reason) => {
                tracing::warn!(
                    order_id = %order.id,
                    pf_payment_id = %payload.pf_payment_id,
                    reason = %reason,
                    "PayFast notification rejected"
                );
                return Ok(NotificationOutcome::Rejected(reason));
            }
        }

        // 5. Revalidation
        if let Err(e) = self
            .validator
            .validate(settings, &raw.revalidation_body())
            .await
        {
            tracing::error!(
                order_id = %order.id,
                pf_payment_id = %payload.pf_payment_id,
                error = %e,
                error_debug = ?e,
                "PayFast notification revalidation failed"
            );
            return Err(e.into());
        }

        // 6. Eligibility
        if !order.can_mark_as_paid() {
            tracing::warn!(
                order_id = %order.id,
                payment_status = ?order.payment_status,
                "Order cannot be marked as paid"
            );
            return Ok(NotificationOutcome::Rejected(RejectionReason::NotEligible));
        }

        // 7. Settlement
        if let Err(e) = order.record_authorization(&payload.pf_payment_id) {
            if e.code == ErrorCode::AuthorizationConflict {
                tracing::warn!(order_id = %order.id, error = %e, "Order settled by another payment");
                return Ok(NotificationOutcome::Rejected(
                    RejectionReason::AuthorizationConflict,
                ));
            }
            return Err(NotificationError::Store(e));
        }
        order
            .mark_as_paid(Timestamp::now())
            .map_err(NotificationError::Store)?;

        // Marker and paid transition land together or not at all, so a
        // failed write never leaves a marker that later reads as a duplicate.
        self.repository
            .update(&mut order)
            .await
            .map_err(NotificationError::Store)?;

        tracing::info!(
            order_id = %order.id,
            pf_payment_id = %payload.pf_payment_id,
            amount = %payload.amount_gross,
            "Order marked as paid"
        );

        Ok(NotificationOutcome::MarkedPaid)
    }
}
