//! Order domain module.
//!
//! - `aggregate` - Order aggregate and line items
//! - `status` - OrderStatus and PaymentStatus state machines

mod aggregate;
mod status;

pub use aggregate::{Order, OrderItem};
pub use status::{OrderStatus, PaymentStatus};
