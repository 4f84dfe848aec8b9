//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `OrderRepository` - Order lookup and optimistic-locked updates
//! - `OrderLock` - Per-order serialization of notification handling
//!
//! ## Gateway Ports
//!
//! - `PaymentValidator` - Server-to-server notification revalidation
//! - `GatewaySettingsProvider` - Per-store merchant settings
//! - `PaymentMethod` - Store-facing payment method capability set

mod order_lock;
mod order_repository;
mod payment_method;
mod payment_validator;
mod settings_provider;

pub use order_lock::{OrderLease, OrderLock};
pub use order_repository::OrderRepository;
pub use payment_method::{
    Capability, CapabilityResult, PaymentMethod, PaymentMethodType, RecurringPaymentType,
};
pub use payment_validator::PaymentValidator;
pub use settings_provider::GatewaySettingsProvider;
