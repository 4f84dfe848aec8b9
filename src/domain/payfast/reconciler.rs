//! Reconciliation guards for a verified notification.
//!
//! Guards run in a fixed order and each one is a hard gate:
//!
//! 1. origin: the referer names a known PayFast host
//! 2. amount: gross amount equals the order total at two decimals
//! 3. duplicate: the order already carries this gateway payment id
//! 4. status: the gateway reports `COMPLETE`
//!
//! Revalidation and the order eligibility check follow in the application
//! handler since they need I/O and a fresh order respectively.

use std::fmt;

use url::Url;

use crate::domain::order::Order;

use super::notification::NotificationPayload;

/// Hosts PayFast sends notifications from.
pub const TRUSTED_HOSTS: [&str; 4] = [
    "www.payfast.co.za",
    "w1w.payfast.co.za",
    "w2w.payfast.co.za",
    "sandbox.payfast.co.za",
];

/// Why a notification was acknowledged without changing the order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    InvalidSignature,
    MalformedPayload(String),
    OrderNotFound,
    UntrustedOrigin,
    AmountMismatch,
    NotComplete(String),
    NotEligible,
    /// Order already carries a different gateway payment id.
    AuthorizationConflict,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::InvalidSignature => write!(f, "signature mismatch"),
            RejectionReason::MalformedPayload(reason) => write!(f, "malformed payload: {}", reason),
            RejectionReason::OrderNotFound => write!(f, "order not found"),
            RejectionReason::UntrustedOrigin => write!(f, "untrusted origin"),
            RejectionReason::AmountMismatch => write!(f, "amount mismatch"),
            RejectionReason::NotComplete(status) => write!(f, "payment status {}", status),
            RejectionReason::NotEligible => write!(f, "order cannot be marked as paid"),
            RejectionReason::AuthorizationConflict => {
                write!(f, "order settled by another payment")
            }
        }
    }
}

/// Result of the pure guard chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardVerdict {
    /// All guards passed; revalidate and settle.
    Proceed,
    /// Already settled by this payment id.
    Duplicate,
    Reject(RejectionReason),
}

/// Terminal outcome of a notification that was answered with `200 OK`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    MarkedPaid,
    Duplicate,
    Rejected(RejectionReason),
}

/// True when the referer header names one of [`TRUSTED_HOSTS`].
///
/// Accepts a full URL or a bare host. Hosts are matched exactly so that
/// look-alike domains such as `www.payfast.co.za.evil.test` fail.
pub fn is_trusted_referer(referer: &str) -> bool {
    let referer = referer.trim();
    if referer.is_empty() {
        return false;
    }

    let parsed = Url::parse(referer).or_else(|_| Url::parse(&format!("https://{}", referer)));
    match parsed.ok().as_ref().and_then(Url::host_str) {
        Some(host) => TRUSTED_HOSTS
            .iter()
            .any(|trusted| host.eq_ignore_ascii_case(trusted)),
        None => false,
    }
}

/// Runs the origin, amount, duplicate and status guards in order.
pub fn evaluate_guards(
    order: &Order,
    payload: &NotificationPayload,
    referer: Option<&str>,
) -> GuardVerdict {
    if !referer.map(is_trusted_referer).unwrap_or(false) {
        return GuardVerdict::Reject(RejectionReason::UntrustedOrigin);
    }

    if !order.total.matches_gateway_amount(&payload.amount_gross) {
        return GuardVerdict::Reject(RejectionReason::AmountMismatch);
    }

    if order.is_authorized_by(&payload.pf_payment_id) {
        return GuardVerdict::Duplicate;
    }

    if !payload.is_complete() {
        return GuardVerdict::Reject(RejectionReason::NotComplete(
            payload.payment_status.clone(),
        ));
    }

    GuardVerdict::Proceed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Amount, OrderGuid, OrderId};
    use crate::domain::order::OrderItem;

    fn order(total: &str) -> Order {
        Order::place(
            OrderId::new(1).unwrap(),
            OrderGuid::new(),
            Amount::parse_invariant(total).unwrap(),
            vec![OrderItem::new("Mug", 1)],
        )
    }

    fn payload(order: &Order, amount: &str, status: &str, pf_id: &str) -> NotificationPayload {
        NotificationPayload {
            payment_status: status.to_string(),
            pf_payment_id: pf_id.to_string(),
            amount_gross: Amount::parse_invariant(amount).unwrap(),
            order_guid: order.order_guid,
            merchant_id: None,
        }
    }

    const REFERER: Option<&str> = Some("https://www.payfast.co.za/eng/process");

    // ══════════════════════════════════════════════════════════════
    // Referer allow-list
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn accepts_known_hosts_as_url_or_bare_host() {
        assert!(is_trusted_referer("https://www.payfast.co.za/eng/process"));
        assert!(is_trusted_referer("https://w1w.payfast.co.za"));
        assert!(is_trusted_referer("w2w.payfast.co.za"));
        assert!(is_trusted_referer("sandbox.payfast.co.za/eng/process"));
        assert!(is_trusted_referer("HTTPS://WWW.PAYFAST.CO.ZA/"));
    }

    #[test]
    fn rejects_look_alike_hosts() {
        assert!(!is_trusted_referer("https://www.payfast.co.za.evil.test/"));
        assert!(!is_trusted_referer("https://evil.test/?r=www.payfast.co.za"));
        assert!(!is_trusted_referer("https://payfast.co.za/"));
        assert!(!is_trusted_referer(""));
    }

    // ══════════════════════════════════════════════════════════════
    // Guard chain
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn all_guards_pass_for_matching_complete_notification() {
        let order = order("250.00");
        let p = payload(&order, "250.00", "COMPLETE", "PF123");
        assert_eq!(evaluate_guards(&order, &p, REFERER), GuardVerdict::Proceed);
    }

    #[test]
    fn missing_referer_is_untrusted() {
        let order = order("250.00");
        let p = payload(&order, "250.00", "COMPLETE", "PF123");
        assert_eq!(
            evaluate_guards(&order, &p, None),
            GuardVerdict::Reject(RejectionReason::UntrustedOrigin)
        );
    }

    #[test]
    fn amount_mismatch_is_rejected() {
        let order = order("100.00");
        let p = payload(&order, "99.99", "COMPLETE", "PF123");
        assert_eq!(
            evaluate_guards(&order, &p, REFERER),
            GuardVerdict::Reject(RejectionReason::AmountMismatch)
        );
    }

    #[test]
    fn same_payment_id_is_duplicate_even_if_not_complete() {
        let mut order = order("250.00");
        order.record_authorization("PF123").unwrap();
        let p = payload(&order, "250.00", "PENDING", "PF123");
        assert_eq!(evaluate_guards(&order, &p, REFERER), GuardVerdict::Duplicate);
    }

    #[test]
    fn different_payment_id_is_not_duplicate() {
        let mut order = order("250.00");
        order.record_authorization("PF001").unwrap();
        let p = payload(&order, "250.00", "COMPLETE", "PF123");
        assert_eq!(evaluate_guards(&order, &p, REFERER), GuardVerdict::Proceed);
    }

    #[test]
    fn non_complete_status_is_rejected() {
        let order = order("250.00");
        let p = payload(&order, "250.00", "CANCELLED", "PF123");
        assert_eq!(
            evaluate_guards(&order, &p, REFERER),
            GuardVerdict::Reject(RejectionReason::NotComplete("CANCELLED".to_string()))
        );
    }

    #[test]
    fn origin_is_checked_before_amount() {
        let order = order("100.00");
        let p = payload(&order, "1.00", "COMPLETE", "PF123");
        assert_eq!(
            evaluate_guards(&order, &p, Some("https://evil.test/")),
            GuardVerdict::Reject(RejectionReason::UntrustedOrigin)
        );
    }

    #[test]
    fn rejection_reasons_display_without_details_leak() {
        assert_eq!(RejectionReason::InvalidSignature.to_string(), "signature mismatch");
        assert_eq!(
            RejectionReason::NotComplete("FAILED".into()).to_string(),
            "payment status FAILED"
        );
    }
}
