//! In-memory order repository for development and tests.
//!
//! Enforces the same optimistic locking contract as the Postgres adapter.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, OrderGuid, OrderId};
use crate::domain::order::Order;
use crate::ports::OrderRepository;

/// Order store backed by a HashMap keyed by order id.
#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an order as-is (seeding).
    pub fn insert(&self, order: Order) {
        if let Ok(mut orders) = self.orders.write() {
            orders.insert(order.id, order);
        }
    }

    /// Synchronous lookup by correlation token.
    pub fn get_by_guid(&self, guid: &OrderGuid) -> Option<Order> {
        self.orders
            .read()
            .ok()?
            .values()
            .find(|o| &o.order_guid == guid)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.orders.read().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> DomainError {
    DomainError::new(ErrorCode::InternalError, "Order store lock poisoned")
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, DomainError> {
        let orders = self.orders.read().map_err(|_| poisoned())?;
        Ok(orders.get(&id).cloned())
    }

    async fn find_by_guid(&self, guid: &OrderGuid) -> Result<Option<Order>, DomainError> {
        let orders = self.orders.read().map_err(|_| poisoned())?;
        Ok(orders.values().find(|o| &o.order_guid == guid).cloned())
    }

    async fn update(&self, order: &mut Order) -> Result<(), DomainError> {
        let mut orders = self.orders.write().map_err(|_| poisoned())?;

        let stored = orders.get_mut(&order.id).ok_or_else(|| {
            DomainError::new(ErrorCode::OrderNotFound, format!("Order {} not found", order.id))
        })?;

        if stored.version != order.version {
            return Err(DomainError::new(
                ErrorCode::ConcurrentModification,
                format!("Order {} was modified concurrently", order.id),
            )
            .with_detail("expected_version", order.version.to_string())
            .with_detail("actual_version", stored.version.to_string()));
        }

        order.version += 1;
        *stored = order.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Amount;
    use crate::domain::order::OrderItem;

    fn order(id: i64) -> Order {
        Order::place(
            OrderId::new(id).unwrap(),
            OrderGuid::new(),
            Amount::parse_invariant("10.00").unwrap(),
            vec![OrderItem::new("Mug", 1)],
        )
    }

    #[tokio::test]
    async fn finds_by_id_and_guid() {
        let repo = InMemoryOrderRepository::new();
        let order = order(1);
        repo.insert(order.clone());

        assert_eq!(repo.find_by_id(order.id).await.unwrap(), Some(order.clone()));
        assert_eq!(
            repo.find_by_guid(&order.order_guid).await.unwrap(),
            Some(order)
        );
        assert_eq!(repo.find_by_guid(&OrderGuid::new()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn update_bumps_version() {
        let repo = InMemoryOrderRepository::new();
        let mut order = order(1);
        repo.insert(order.clone());

        order.record_authorization("PF1").unwrap();
        repo.update(&mut order).await.unwrap();

        assert_eq!(order.version, 1);
        let stored = repo.find_by_id(order.id).await.unwrap().unwrap();
        assert_eq!(stored.version, 1);
        assert!(stored.is_authorized_by("PF1"));
    }

    #[tokio::test]
    async fn stale_update_is_concurrent_modification() {
        let repo = InMemoryOrderRepository::new();
        let order = order(1);
        repo.insert(order.clone());

        let mut first = order.clone();
        let mut second = order;
        repo.update(&mut first).await.unwrap();

        let err = repo.update(&mut second).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ConcurrentModification);
        assert_eq!(second.version, 0);
    }

    #[tokio::test]
    async fn update_unknown_order_is_not_found() {
        let repo = InMemoryOrderRepository::new();
        let mut order = order(9);

        let err = repo.update(&mut order).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderNotFound);
    }
}
