//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresOrderRepository` - Orders with optimistic locking on `version`

mod order_repository;

pub use order_repository::PostgresOrderRepository;
