//! PayFast HTTP adapter.
//!
//! Buyer redirects and the gateway notification endpoint.

mod dto;
mod handlers;
mod routes;

pub use dto::{ErrorResponse, OrderQuery, PayQuery};
pub use handlers::{
    cancel, notify, pay, success, NotificationApiError, PaymentApiError, PaymentAppState,
};
pub use routes::{payfast_router, payment_routes};
