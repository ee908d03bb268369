//! Test repositories: `OrderRepository` implementations for tests.

use std::cmp::Reverse;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use courier_core::error::DomainError;
use courier_core::order::Order;
use courier_core::repository::{OrderFilter, OrderRepository};
use uuid::Uuid;

/// An order repository held in memory. Inserts are all-or-nothing and status
/// updates honour the version check, mirroring the `PostgreSQL` store.
#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    orders: Mutex<Vec<Order>>,
    fail_updates: AtomicBool,
}

impl InMemoryOrderRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-loaded with `orders`.
    #[must_use]
    pub fn with_orders(orders: impl IntoIterator<Item = Order>) -> Self {
        Self {
            orders: Mutex::new(orders.into_iter().collect()),
            fail_updates: AtomicBool::new(false),
        }
    }

    /// Makes every subsequent `update_status` call fail with an
    /// infrastructure error.
    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }

    /// Returns a snapshot of all stored orders in insertion order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn orders(&self) -> Vec<Order> {
        self.orders.lock().unwrap().clone()
    }

    /// Returns the stored copy of one order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn get(&self, order_id: Uuid) -> Option<Order> {
        self.orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == order_id)
            .cloned()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn insert_order(&self, order: &Order) -> Result<(), DomainError> {
        let mut orders = self.orders.lock().unwrap();
        if orders.iter().any(|o| o.id == order.id) {
            return Err(DomainError::Infrastructure(format!(
                "duplicate order id {}",
                order.id
            )));
        }
        orders.push(order.clone());
        Ok(())
    }

    async fn find_order(&self, order_id: Uuid) -> Result<Option<Order>, DomainError> {
        Ok(self.get(order_id))
    }

    async fn update_status(&self, order: &Order, expected_version: i64) -> Result<(), DomainError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(DomainError::Infrastructure("connection refused".into()));
        }
        let mut orders = self.orders.lock().unwrap();
        let stored = orders
            .iter_mut()
            .find(|o| o.id == order.id)
            .ok_or(DomainError::OrderNotFound(order.id))?;
        if stored.version != expected_version {
            return Err(DomainError::ConcurrencyConflict {
                aggregate_id: order.id,
                expected: expected_version,
            });
        }
        stored.status = order.status;
        stored.delivery_agent_id = order.delivery_agent_id;
        stored.version = order.version;
        stored.updated_at = order.updated_at;
        Ok(())
    }

    async fn list_orders(&self, filter: OrderFilter) -> Result<Vec<Order>, DomainError> {
        let mut matching: Vec<Order> = self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect();
        // Newest first; insertion order breaks ties.
        matching.reverse();
        matching.sort_by_key(|o| Reverse(o.created_at));
        Ok(matching)
    }
}

/// An order repository that always returns an infrastructure error.
#[derive(Debug)]
pub struct FailingOrderRepository;

#[async_trait]
impl OrderRepository for FailingOrderRepository {
    async fn insert_order(&self, _order: &Order) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn find_order(&self, _order_id: Uuid) -> Result<Option<Order>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn update_status(
        &self,
        _order: &Order,
        _expected_version: i64,
    ) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn list_orders(&self, _filter: OrderFilter) -> Result<Vec<Order>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use courier_core::order::OrderStatus;
    use rust_decimal::Decimal;

    fn pending_order() -> Order {
        Order {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            delivery_agent_id: None,
            status: OrderStatus::Pending,
            total: Decimal::ZERO,
            items: Vec::new(),
            version: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_update_status_rejects_stale_version() {
        let order = pending_order();
        let repo = InMemoryOrderRepository::with_orders([order.clone()]);

        let mut first = order.clone();
        first.status = OrderStatus::Preparing;
        first.version = 2;
        repo.update_status(&first, 1).await.unwrap();

        let mut second = order.clone();
        second.status = OrderStatus::Cancelled;
        second.version = 2;
        let result = repo.update_status(&second, 1).await;

        match result {
            Err(DomainError::ConcurrencyConflict {
                aggregate_id,
                expected,
            }) => {
                assert_eq!(aggregate_id, order.id);
                assert_eq!(expected, 1);
            }
            other => panic!("expected ConcurrencyConflict, got {other:?}"),
        }
        assert_eq!(repo.get(order.id).unwrap().status, OrderStatus::Preparing);
    }
}
