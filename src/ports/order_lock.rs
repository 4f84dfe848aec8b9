//! Per-order mutual exclusion for notification handling.
//!
//! The gateway may deliver the same notification more than once, possibly
//! concurrently. Holding a lease on the correlation token while the
//! duplicate check, revalidation and settlement run closes the
//! read-then-write race between deliveries.

use std::any::Any;
use std::fmt;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, OrderGuid};

/// A held lock. Release it with [`OrderLock::release`].
///
/// Dropping a lease without releasing it still frees the lock: in-process
/// locks immediately, Redis locks once their TTL runs out. A request that is
/// cancelled while holding a lease therefore never wedges the order.
pub struct OrderLease {
    /// Lock key derived from the correlation token.
    pub key: String,
    /// Unique holder token; only the holder may release.
    pub token: String,
    guard: Option<Box<dyn Any + Send + Sync>>,
}

impl OrderLease {
    pub fn new(key: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            token: token.into(),
            guard: None,
        }
    }

    /// Attaches a value whose drop releases the underlying lock.
    pub fn holding(mut self, guard: impl Any + Send + Sync) -> Self {
        self.guard = Some(Box::new(guard));
        self
    }

    pub fn key_for(guid: &OrderGuid) -> String {
        format!("payfast:order-lock:{}", guid)
    }
}

impl fmt::Debug for OrderLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderLease")
            .field("key", &self.key)
            .field("token", &self.token)
            .field("local", &self.guard.is_some())
            .finish()
    }
}

/// Port for per-order locking.
#[async_trait]
pub trait OrderLock: Send + Sync {
    /// Waits until the lock for `guid` is free and takes it.
    ///
    /// # Errors
    ///
    /// - `LockUnavailable` if the lock could not be taken in time
    async fn acquire(&self, guid: &OrderGuid) -> Result<OrderLease, DomainError>;

    /// Releases a lease. Releasing an expired or foreign lease is a no-op.
    async fn release(&self, lease: OrderLease) -> Result<(), DomainError>;
}
