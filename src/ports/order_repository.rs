//! Order repository port.
//!
//! The payment flow reads orders by id (buyer redirect) or by correlation
//! token (gateway notification) and writes back a single mutation when an
//! order is settled.

use crate::domain::foundation::{DomainError, OrderGuid, OrderId};
use crate::domain::order::Order;
use async_trait::async_trait;

/// Repository port for Order persistence.
///
/// Implementations must enforce optimistic locking on `version`.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Find an order by its numeric ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, DomainError>;

    /// Find an order by the correlation token sent to the gateway.
    ///
    /// Returns `None` if not found.
    async fn find_by_guid(&self, guid: &OrderGuid) -> Result<Option<Order>, DomainError>;

    /// Persist changes to an existing order.
    ///
    /// The stored row must still carry `order.version`; on success the
    /// stored version is incremented and `order.version` is updated to match.
    ///
    /// # Errors
    ///
    /// - `OrderNotFound` if the order does not exist
    /// - `ConcurrentModification` if the stored version moved on
    /// - `DatabaseError` on persistence failure
    async fn update(&self, order: &mut Order) -> Result<(), DomainError>;
}
