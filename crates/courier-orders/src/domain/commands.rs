//! Commands for the Order Lifecycle context.

use courier_core::command::Command;
use courier_core::identity::Caller;
use courier_core::order::OrderStatus;
use uuid::Uuid;

use super::cart::CartLine;

/// Command to place an order from a cart.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The caller placing the order; becomes the order's customer.
    pub caller: Caller,
    /// Requested lines.
    pub items: Vec<CartLine>,
}

impl Command for CreateOrder {
    fn command_type(&self) -> &'static str {
        "orders.create_order"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn issued_by(&self) -> Uuid {
        self.caller.user_id
    }
}

/// Command to move an order to a new status.
#[derive(Debug, Clone)]
pub struct TransitionStatus {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The caller requesting the change.
    pub caller: Caller,
    /// The order to transition.
    pub order_id: Uuid,
    /// Requested status.
    pub target: OrderStatus,
}

impl Command for TransitionStatus {
    fn command_type(&self) -> &'static str {
        "orders.transition_status"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn issued_by(&self) -> Uuid {
        self.caller.user_id
    }
}
