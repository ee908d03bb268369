//! Authorization policy for order actions.
//!
//! The role × action table lives in [`permits`]; [`authorize_transition`]
//! layers the delivery-claim and state-legality rules on top of it.

use courier_core::error::DomainError;
use courier_core::identity::{Caller, Role};
use courier_core::order::{Order, OrderStatus};
use courier_core::repository::OrderFilter;
use uuid::Uuid;

/// Something a caller may ask to do with orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Place a new order for oneself.
    PlaceOrder,
    /// List the orders visible to the caller.
    ListOrders,
    /// Move an order to the given status.
    Transition(OrderStatus),
}

/// The authorization table.
#[must_use]
pub fn permits(role: Role, action: Action) -> bool {
    match (role, action) {
        (Role::Customer, Action::PlaceOrder)
        | (_, Action::ListOrders)
        | (Role::Admin, Action::Transition(_))
        | (Role::Delivery, Action::Transition(OrderStatus::Delivering | OrderStatus::Delivered)) => {
            true
        }
        (Role::Delivery | Role::Admin, Action::PlaceOrder)
        | (Role::Customer | Role::Delivery, Action::Transition(_)) => false,
    }
}

/// Tunables for transition legality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransitionRules {
    /// When set, admins may neither leave a terminal status nor move an order
    /// backwards along the forward path.
    pub forward_only_for_admin: bool,
}

/// What an authorized transition is allowed to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionGrant {
    /// Target status.
    pub target: OrderStatus,
    /// Agent to record as the order's exclusive handler.
    pub assign_agent: Option<Uuid>,
}

/// Decides whether `caller` may move `order` to `target`.
///
/// # Errors
///
/// - `DomainError::Forbidden` if the role may not request `target`.
/// - `DomainError::Conflict` if a delivery agent targets an order claimed by
///   another agent.
/// - `DomainError::InvalidTransition` if the move is not legal from the
///   order's current status for this role.
pub fn authorize_transition(
    caller: &Caller,
    order: &Order,
    target: OrderStatus,
    rules: TransitionRules,
) -> Result<TransitionGrant, DomainError> {
    if !permits(caller.role, Action::Transition(target)) {
        return Err(DomainError::Forbidden(format!(
            "role {} may not move orders to {target}",
            caller.role
        )));
    }

    match caller.role {
        Role::Admin => {
            if rules.forward_only_for_admin && !is_forward_move(order.status, target) {
                return Err(DomainError::InvalidTransition {
                    from: order.status,
                    to: target,
                });
            }
            Ok(TransitionGrant {
                target,
                assign_agent: None,
            })
        }
        Role::Delivery => {
            if let Some(assigned) = order.delivery_agent_id
                && assigned != caller.user_id
            {
                return Err(DomainError::Conflict(format!(
                    "order {} is already claimed by another delivery agent",
                    order.id
                )));
            }
            let required_from = match target {
                OrderStatus::Delivering => OrderStatus::Ready,
                _ => OrderStatus::Delivering,
            };
            if order.status != required_from {
                return Err(DomainError::InvalidTransition {
                    from: order.status,
                    to: target,
                });
            }
            Ok(TransitionGrant {
                target,
                assign_agent: (target == OrderStatus::Delivering).then_some(caller.user_id),
            })
        }
        // `permits` grants customers no transitions.
        Role::Customer => Err(DomainError::Forbidden(
            "customers may not change order status".to_owned(),
        )),
    }
}

/// Forward along the path, or into `cancelled`, from a non-terminal status.
fn is_forward_move(from: OrderStatus, to: OrderStatus) -> bool {
    if from.is_terminal() {
        return false;
    }
    match (from.rank(), to.rank()) {
        (Some(from_rank), Some(to_rank)) => to_rank > from_rank,
        (_, None) => true,
        (None, Some(_)) => false,
    }
}

/// Which orders `caller` may see.
#[must_use]
pub fn listing_filter(caller: &Caller) -> OrderFilter {
    match caller.role {
        Role::Customer => OrderFilter::Customer(caller.user_id),
        Role::Delivery => OrderFilter::DeliveryAgent(caller.user_id),
        Role::Admin => OrderFilter::All,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn order_in(status: OrderStatus, agent: Option<Uuid>) -> Order {
        Order {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            delivery_agent_id: agent,
            status,
            total: Decimal::ZERO,
            items: Vec::new(),
            version: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn caller(role: Role) -> Caller {
        Caller::new(Uuid::new_v4(), role)
    }

    #[test]
    fn test_table_grants_delivery_only_delivery_targets() {
        let allowed: Vec<_> = OrderStatus::ALL
            .into_iter()
            .filter(|s| permits(Role::Delivery, Action::Transition(*s)))
            .collect();
        assert_eq!(allowed, vec![OrderStatus::Delivering, OrderStatus::Delivered]);
    }

    #[test]
    fn test_table_denies_customers_every_transition() {
        assert!(
            OrderStatus::ALL
                .into_iter()
                .all(|s| !permits(Role::Customer, Action::Transition(s)))
        );
        assert!(permits(Role::Customer, Action::PlaceOrder));
    }

    #[test]
    fn test_table_reserves_placement_for_customers() {
        assert!(!permits(Role::Delivery, Action::PlaceOrder));
        assert!(!permits(Role::Admin, Action::PlaceOrder));
        assert!(
            [Role::Customer, Role::Delivery, Role::Admin]
                .into_iter()
                .all(|role| permits(role, Action::ListOrders))
        );
    }

    #[test]
    fn test_customer_transition_is_forbidden() {
        let order = order_in(OrderStatus::Pending, None);
        let result = authorize_transition(
            &caller(Role::Customer),
            &order,
            OrderStatus::Cancelled,
            TransitionRules::default(),
        );
        assert!(matches!(result, Err(DomainError::Forbidden(_))));
    }

    #[test]
    fn test_delivery_agent_cannot_request_staff_statuses() {
        let order = order_in(OrderStatus::Ready, None);
        for target in [
            OrderStatus::Pending,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Cancelled,
        ] {
            let result = authorize_transition(
                &caller(Role::Delivery),
                &order,
                target,
                TransitionRules::default(),
            );
            assert!(matches!(result, Err(DomainError::Forbidden(_))), "{target}");
        }
    }

    #[test]
    fn test_delivery_claim_assigns_acting_agent() {
        let agent = caller(Role::Delivery);
        let order = order_in(OrderStatus::Ready, None);

        let grant =
            authorize_transition(&agent, &order, OrderStatus::Delivering, TransitionRules::default())
                .unwrap();

        assert_eq!(grant.target, OrderStatus::Delivering);
        assert_eq!(grant.assign_agent, Some(agent.user_id));
    }

    #[test]
    fn test_delivery_claim_on_order_held_by_other_agent_conflicts() {
        let order = order_in(OrderStatus::Delivering, Some(Uuid::new_v4()));
        let result = authorize_transition(
            &caller(Role::Delivery),
            &order,
            OrderStatus::Delivered,
            TransitionRules::default(),
        );
        assert!(matches!(result, Err(DomainError::Conflict(_))));
    }

    #[test]
    fn test_assigned_agent_may_complete_delivery() {
        let agent = caller(Role::Delivery);
        let order = order_in(OrderStatus::Delivering, Some(agent.user_id));

        let grant =
            authorize_transition(&agent, &order, OrderStatus::Delivered, TransitionRules::default())
                .unwrap();

        assert_eq!(grant.assign_agent, None);
    }

    #[test]
    fn test_delivery_agent_cannot_claim_order_not_ready() {
        let order = order_in(OrderStatus::Preparing, None);
        let result = authorize_transition(
            &caller(Role::Delivery),
            &order,
            OrderStatus::Delivering,
            TransitionRules::default(),
        );
        match result {
            Err(DomainError::InvalidTransition { from, to }) => {
                assert_eq!(from, OrderStatus::Preparing);
                assert_eq!(to, OrderStatus::Delivering);
            }
            other => panic!("expected InvalidTransition, got {other:?}"),
        }
    }

    #[test]
    fn test_admin_may_cancel_from_every_non_terminal_status() {
        let admin = caller(Role::Admin);
        for from in OrderStatus::ALL.into_iter().filter(|s| !s.is_terminal()) {
            for rules in [
                TransitionRules::default(),
                TransitionRules {
                    forward_only_for_admin: true,
                },
            ] {
                let order = order_in(from, None);
                let grant =
                    authorize_transition(&admin, &order, OrderStatus::Cancelled, rules).unwrap();
                assert_eq!(grant.target, OrderStatus::Cancelled);
            }
        }
    }

    #[test]
    fn test_admin_may_move_backwards_by_default() {
        let order = order_in(OrderStatus::Delivered, None);
        let result = authorize_transition(
            &caller(Role::Admin),
            &order,
            OrderStatus::Preparing,
            TransitionRules::default(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_forward_only_rules_block_admin_regressions() {
        let rules = TransitionRules {
            forward_only_for_admin: true,
        };
        let admin = caller(Role::Admin);

        let delivered = order_in(OrderStatus::Delivered, None);
        assert!(matches!(
            authorize_transition(&admin, &delivered, OrderStatus::Preparing, rules),
            Err(DomainError::InvalidTransition { .. })
        ));

        let cancelled = order_in(OrderStatus::Cancelled, None);
        assert!(matches!(
            authorize_transition(&admin, &cancelled, OrderStatus::Cancelled, rules),
            Err(DomainError::InvalidTransition { .. })
        ));

        let ready = order_in(OrderStatus::Ready, None);
        assert!(authorize_transition(&admin, &ready, OrderStatus::Delivered, rules).is_ok());
    }

    #[test]
    fn test_listing_filter_per_role() {
        let c = caller(Role::Customer);
        let d = caller(Role::Delivery);
        assert_eq!(listing_filter(&c), OrderFilter::Customer(c.user_id));
        assert_eq!(listing_filter(&d), OrderFilter::DeliveryAgent(d.user_id));
        assert_eq!(listing_filter(&caller(Role::Admin)), OrderFilter::All);
    }
}
