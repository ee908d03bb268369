//! Query handlers for the Order Lifecycle context.

use courier_core::error::DomainError;
use courier_core::identity::Caller;
use courier_core::order::Order;
use courier_core::repository::OrderRepository;

use crate::domain::policy::listing_filter;

/// Lists the orders visible to `caller`, newest first.
///
/// Customers see their own orders. Delivery agents see orders assigned to
/// them plus unassigned orders in `ready`. Admins see every order.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the store fails.
pub async fn list_orders(
    caller: &Caller,
    repo: &dyn OrderRepository,
) -> Result<Vec<Order>, DomainError> {
    repo.list_orders(listing_filter(caller)).await
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use courier_core::identity::{Caller, Role};
    use courier_core::order::{Order, OrderStatus};
    use courier_test_support::{FailingOrderRepository, InMemoryOrderRepository};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use super::*;

    fn order(customer_id: Uuid, agent: Option<Uuid>, status: OrderStatus, minute: i64) -> Order {
        let at = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap() + Duration::minutes(minute);
        Order {
            id: Uuid::new_v4(),
            customer_id,
            delivery_agent_id: agent,
            status,
            total: Decimal::ZERO,
            items: Vec::new(),
            version: 1,
            created_at: at,
            updated_at: at,
        }
    }

    #[tokio::test]
    async fn test_list_orders_scopes_by_role() {
        // Arrange
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let agent = Uuid::new_v4();
        let mine_old = order(alice, None, OrderStatus::Pending, 0);
        let mine_new = order(alice, None, OrderStatus::Ready, 5);
        let theirs = order(bob, Some(agent), OrderStatus::Delivering, 2);
        let claimed_elsewhere = order(bob, Some(Uuid::new_v4()), OrderStatus::Delivering, 3);
        let repo = InMemoryOrderRepository::with_orders([
            mine_old.clone(),
            mine_new.clone(),
            theirs.clone(),
            claimed_elsewhere,
        ]);

        // Act
        let for_alice = list_orders(&Caller::new(alice, Role::Customer), &repo)
            .await
            .unwrap();
        let for_agent = list_orders(&Caller::new(agent, Role::Delivery), &repo)
            .await
            .unwrap();
        let for_admin = list_orders(&Caller::new(Uuid::new_v4(), Role::Admin), &repo)
            .await
            .unwrap();

        // Assert
        let ids = |orders: &[Order]| orders.iter().map(|o| o.id).collect::<Vec<_>>();
        assert_eq!(ids(&for_alice), vec![mine_new.id, mine_old.id]);
        assert_eq!(ids(&for_agent), vec![mine_new.id, theirs.id]);
        assert_eq!(for_admin.len(), 4);
    }

    #[tokio::test]
    async fn test_list_orders_propagates_store_failure() {
        let result = list_orders(
            &Caller::new(Uuid::new_v4(), Role::Admin),
            &FailingOrderRepository,
        )
        .await;
        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }
}
