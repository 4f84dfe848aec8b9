//! HTTP adapters - REST API implementations.

pub mod payment;

pub use payment::{payfast_router, PaymentAppState};
