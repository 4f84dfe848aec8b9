//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod payment;

pub use payment::{
    HandlePaymentNotificationCommand, HandlePaymentNotificationHandler, PostProcessPaymentCommand,
    PostProcessPaymentHandler,
};
