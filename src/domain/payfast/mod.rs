//! PayFast redirect gateway domain.
//!
//! Pure logic shared by the outbound payment redirect and the inbound
//! notification (ITN) flow:
//!
//! - `canonical` - ordered parameter set and the signed string encoding
//! - `signature` - MD5 signing and constant-time verification
//! - `settings` - merchant credentials and endpoint selection
//! - `request_builder` - signed redirect to the hosted payment page
//! - `notification` - raw and typed inbound fields
//! - `verifier` - notification authenticity check
//! - `reconciler` - guard chain deciding whether an order may be settled
//! - `errors` - notification and revalidation errors

mod canonical;
mod errors;
mod notification;
mod reconciler;
mod request_builder;
mod settings;
pub mod signature;
mod verifier;

pub use canonical::{percent_encode, uppercase_escapes, ParameterSet, SpaceEncoding};
pub use errors::{NotificationError, RevalidationError};
pub use notification::{NotificationPayload, RawNotification, STATUS_COMPLETE};
pub use reconciler::{
    evaluate_guards, is_trusted_referer, GuardVerdict, NotificationOutcome, RejectionReason,
    TRUSTED_HOSTS,
};
pub use request_builder::{
    build_payment_redirect, CallbackUrls, PaymentRedirect, CORRELATION_FIELD, SIGNATURE_FIELD,
};
pub use settings::GatewaySettings;
pub use verifier::verify_notification;
