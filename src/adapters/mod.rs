//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `memory` - In-process order store and lock (development, tests)
//! - `payfast` - Gateway revalidation, payment method, merchant settings
//! - `postgres` - Order store
//! - `redis` - Distributed order lock
//! - `http` - Axum endpoints

pub mod http;
pub mod memory;
pub mod payfast;
pub mod postgres;
pub mod redis;

pub use memory::{InMemoryOrderLock, InMemoryOrderRepository};
pub use payfast::{
    ConfiguredSettingsProvider, PayFastPaymentMethod, PayFastValidationClient,
    StaticSettingsProvider,
};
pub use postgres::PostgresOrderRepository;
pub use self::redis::RedisOrderLock;
