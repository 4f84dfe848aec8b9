//! In-memory adapters for development and tests.

mod order_lock;
mod order_repository;

pub use order_lock::InMemoryOrderLock;
pub use order_repository::InMemoryOrderRepository;
