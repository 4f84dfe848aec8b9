//! Redis-backed order lock for multi-instance deployments.
//!
//! Uses the single-instance lock pattern:
//! 1. `SET key token NX PX ttl` takes the lock if it is free
//! 2. a held lock is polled until it frees up or the wait runs out
//! 3. release deletes the key only if it still holds our token
//!
//! The TTL bounds how long a crashed holder blocks redelivered notifications.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, OrderGuid};
use crate::ports::{OrderLease, OrderLock};

/// Deletes the key only when it still carries the caller's token.
const RELEASE_SCRIPT: &str = r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("DEL", KEYS[1])
else
    return 0
end
"#;

/// Distributed [`OrderLock`] over a multiplexed Redis connection.
#[derive(Clone)]
pub struct RedisOrderLock {
    conn: MultiplexedConnection,
    ttl: Duration,
    wait: Duration,
    retry_interval: Duration,
}

impl RedisOrderLock {
    /// Create a lock whose leases expire after `ttl`.
    pub fn new(conn: MultiplexedConnection, ttl: Duration) -> Self {
        Self {
            conn,
            ttl,
            wait: Duration::from_secs(30),
            retry_interval: Duration::from_millis(50),
        }
    }

    /// Set how long `acquire` polls a held lock and how often.
    pub fn with_wait(mut self, wait: Duration, retry_interval: Duration) -> Self {
        self.wait = wait;
        self.retry_interval = retry_interval;
        self
    }

    fn ttl_millis(&self) -> u64 {
        u64::try_from(self.ttl.as_millis()).unwrap_or(u64::MAX).max(1)
    }

    async fn try_set(&self, key: &str, token: &str) -> Result<bool, DomainError> {
        let mut conn = self.conn.clone();
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(token)
            .arg("NX")
            .arg("PX")
            .arg(self.ttl_millis())
            .query_async(&mut conn)
            .await
            .map_err(unavailable)?;
        Ok(reply.is_some())
    }
}

fn unavailable(err: redis::RedisError) -> DomainError {
    DomainError::new(ErrorCode::LockUnavailable, format!("Redis lock error: {}", err))
}

#[async_trait]
impl OrderLock for RedisOrderLock {
    async fn acquire(&self, guid: &OrderGuid) -> Result<OrderLease, DomainError> {
        let key = OrderLease::key_for(guid);
        let token = Uuid::new_v4().to_string();
        let deadline = tokio::time::Instant::now() + self.wait;

        loop {
            if self.try_set(&key, &token).await? {
                return Ok(OrderLease::new(key, token));
            }
            if tokio::time::Instant::now() + self.retry_interval > deadline {
                return Err(DomainError::new(
                    ErrorCode::LockUnavailable,
                    format!("Timed out waiting for lock on order {}", guid),
                ));
            }
            tokio::time::sleep(self.retry_interval).await;
        }
    }

    async fn release(&self, lease: OrderLease) -> Result<(), DomainError> {
        let mut conn = self.conn.clone();
        let deleted: i64 = redis::Script::new(RELEASE_SCRIPT)
            .key(&lease.key)
            .arg(&lease.token)
            .invoke_async(&mut conn)
            .await
            .map_err(unavailable)?;

        if deleted == 0 {
            tracing::warn!(key = %lease.key, "Order lock expired before release");
        }
        Ok(())
    }
}

impl std::fmt::Debug for RedisOrderLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisOrderLock")
            .field("ttl", &self.ttl)
            .field("wait", &self.wait)
            .field("retry_interval", &self.retry_interval)
            .finish_non_exhaustive()
    }
}
