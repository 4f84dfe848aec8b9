//! Redis adapters.

mod order_lock;

pub use order_lock::RedisOrderLock;
