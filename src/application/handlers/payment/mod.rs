//! Payment command handlers.
//!
//! - `post_process_payment` - Signed redirect to the hosted payment page
//! - `handle_payment_notification` - Gateway notification settlement

mod handle_payment_notification;
mod post_process_payment;

pub use handle_payment_notification::{
    HandlePaymentNotificationCommand, HandlePaymentNotificationHandler,
};
pub use post_process_payment::{PostProcessPaymentCommand, PostProcessPaymentHandler};
