//! Inbound ITN (instant transaction notification) field set.
//!
//! The raw form is kept in wire order for signature verification. The typed
//! [`NotificationPayload`] is parsed from it at the boundary so later steps
//! never look fields up by string key.

use url::form_urlencoded;

use crate::domain::foundation::{Amount, OrderGuid, ValidationError};

use super::canonical::{ParameterSet, SpaceEncoding};
use super::request_builder::{CORRELATION_FIELD, SIGNATURE_FIELD};

/// Payment status the gateway reports for a settled payment.
pub const STATUS_COMPLETE: &str = "COMPLETE";

/// Notification fields exactly as received, in wire order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawNotification {
    fields: ParameterSet,
}

impl RawNotification {
    /// Decodes an `application/x-www-form-urlencoded` body.
    ///
    /// Blank fields are dropped; they take no part in the signature.
    pub fn from_form_body(body: &[u8]) -> Self {
        Self {
            fields: ParameterSet::from_pairs(
                form_urlencoded::parse(body).map(|(k, v)| (k.into_owned(), v.into_owned())),
            ),
        }
    }

    pub fn from_fields(fields: ParameterSet) -> Self {
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key)
    }

    /// The signature the gateway sent, if any.
    pub fn signature(&self) -> Option<&str> {
        self.fields.get(SIGNATURE_FIELD)
    }

    /// Every field except the signature, in received order.
    pub fn signed_fields(&self) -> ParameterSet {
        self.fields.without(SIGNATURE_FIELD)
    }

    /// String the signature is verified against (spaces as `%20`).
    pub fn verification_string(&self) -> String {
        self.signed_fields().canonical_string(SpaceEncoding::Percent)
    }

    /// Body posted back to the validation endpoint (spaces as `+`).
    pub fn revalidation_body(&self) -> String {
        self.signed_fields().canonical_string(SpaceEncoding::Plus)
    }
}

/// Well-known notification fields, validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPayload {
    pub payment_status: String,
    pub pf_payment_id: String,
    pub amount_gross: Amount,
    pub order_guid: OrderGuid,
    pub merchant_id: Option<String>,
}

impl NotificationPayload {
    /// Extracts and validates the fields the reconciler relies on.
    ///
    /// # Errors
    ///
    /// `EmptyField` for a missing required field, `InvalidFormat` when the
    /// amount or correlation token cannot be parsed.
    pub fn parse(raw: &RawNotification) -> Result<Self, ValidationError> {
        let required = |field: &'static str| {
            raw.get(field)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ValidationError::empty_field(field))
        };

        let payment_status = required("payment_status")?.to_string();
        let pf_payment_id = required("pf_payment_id")?.to_string();
        let amount_gross = Amount::parse_invariant(required("amount_gross")?)?;
        let order_guid: OrderGuid = required(CORRELATION_FIELD)?.parse()?;

        Ok(Self {
            payment_status,
            pf_payment_id,
            amount_gross,
            order_guid,
            merchant_id: raw.get("merchant_id").map(String::from),
        })
    }

    pub fn is_complete(&self) -> bool {
        self.payment_status == STATUS_COMPLETE
    }
}
