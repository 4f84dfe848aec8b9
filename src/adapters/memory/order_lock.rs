//! In-process order lock.
//!
//! Serializes notification handling per correlation token within one
//! process. Multi-instance deployments use the Redis lock instead.
//!
//! The mutex guard travels inside the returned lease, so a lease dropped by
//! a cancelled request unlocks the order just like an explicit release.
//! Table entries are pruned once no holder or waiter references them.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, OrderGuid};
use crate::ports::{OrderLease, OrderLock};

const DEFAULT_WAIT: Duration = Duration::from_secs(30);

type LockTable = Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>;

/// Per-key async mutexes, one entry per order currently locked or awaited.
#[derive(Debug)]
pub struct InMemoryOrderLock {
    keys: LockTable,
    wait: Duration,
}

impl Default for InMemoryOrderLock {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryOrderLock {
    pub fn new() -> Self {
        Self::with_wait(DEFAULT_WAIT)
    }

    /// Sets how long `acquire` waits before giving up.
    pub fn with_wait(wait: Duration) -> Self {
        Self {
            keys: Arc::new(Mutex::new(HashMap::new())),
            wait,
        }
    }

    fn mutex_for(&self, key: &str) -> Result<Arc<AsyncMutex<()>>, DomainError> {
        let mut keys = self.keys.lock().map_err(|_| poisoned())?;
        Ok(keys
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone())
    }
}

fn poisoned() -> DomainError {
    DomainError::new(ErrorCode::InternalError, "Order lock table poisoned")
}

/// Drops the entry for `key` when the table holds the only reference.
fn prune(table: &LockTable, key: &str) {
    if let Ok(mut keys) = table.lock() {
        if keys.get(key).is_some_and(|m| Arc::strong_count(m) == 1) {
            keys.remove(key);
        }
    }
}

/// Lock held on behalf of a lease. Unlocks and prunes on drop.
struct HeldKey {
    guard: Option<OwnedMutexGuard<()>>,
    key: String,
    table: LockTable,
}

impl Drop for HeldKey {
    fn drop(&mut self) {
        drop(self.guard.take());
        prune(&self.table, &self.key);
    }
}

#[async_trait]
impl OrderLock for InMemoryOrderLock {
    async fn acquire(&self, guid: &OrderGuid) -> Result<OrderLease, DomainError> {
        let key = OrderLease::key_for(guid);
        let mutex = self.mutex_for(&key)?;

        let guard = match tokio::time::timeout(self.wait, mutex.lock_owned()).await {
            Ok(guard) => guard,
            Err(_) => {
                prune(&self.keys, &key);
                return Err(DomainError::new(
                    ErrorCode::LockUnavailable,
                    format!("Timed out waiting for lock on order {}", guid),
                ));
            }
        };

        let held = HeldKey {
            guard: Some(guard),
            key: key.clone(),
            table: self.keys.clone(),
        };
        Ok(OrderLease::new(key, Uuid::new_v4().to_string()).holding(held))
    }

    async fn release(&self, lease: OrderLease) -> Result<(), DomainError> {
        drop(lease);
        Ok(())
    }
}
