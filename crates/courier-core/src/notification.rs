//! Notification records.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::order::{Order, OrderStatus};

/// Kind tag for a notification about a newly created order.
pub const ORDER_CREATED_KIND: &str = "order_created";
/// Kind tag for an order moved to `confirmed`.
pub const ORDER_CONFIRMED_KIND: &str = "order_confirmed";
/// Kind tag for an order moved to `preparing`.
pub const ORDER_PREPARING_KIND: &str = "order_preparing";
/// Kind tag for an order moved to `ready`.
pub const ORDER_READY_KIND: &str = "order_ready";
/// Kind tag for an order moved to `delivering`.
pub const ORDER_DELIVERING_KIND: &str = "order_delivering";
/// Kind tag for an order moved to `delivered`.
pub const ORDER_DELIVERED_KIND: &str = "order_delivered";
/// Kind tag for an order moved to `cancelled`.
pub const ORDER_CANCELLED_KIND: &str = "order_cancelled";
/// Default kind tag for diagnostic notifications.
pub const TEST_KIND: &str = "test";

/// Kind tag for a notification about an order entering `status`. An order
/// only enters `pending` when it is created.
#[must_use]
pub fn kind_for_status(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => ORDER_CREATED_KIND,
        OrderStatus::Confirmed => ORDER_CONFIRMED_KIND,
        OrderStatus::Preparing => ORDER_PREPARING_KIND,
        OrderStatus::Ready => ORDER_READY_KIND,
        OrderStatus::Delivering => ORDER_DELIVERING_KIND,
        OrderStatus::Delivered => ORDER_DELIVERED_KIND,
        OrderStatus::Cancelled => ORDER_CANCELLED_KIND,
    }
}

/// A durable notification addressed to one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Notification identifier.
    pub id: Uuid,
    /// Recipient.
    pub user_id: Uuid,
    /// Order that triggered the notification, if any.
    pub order_id: Option<Uuid>,
    /// Kind tag, e.g. `order_ready`.
    pub kind: String,
    /// Short title.
    pub title: String,
    /// Message body.
    pub message: String,
    /// Whether the recipient has marked it read.
    pub is_read: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Aggregate outcome of one fanout call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FanoutReport {
    /// Notifications the engine tried to write.
    pub attempted: usize,
    /// Notifications persisted.
    pub written: usize,
    /// Writes that failed and were skipped.
    pub failed: usize,
}

/// Seam between the lifecycle manager and the fanout engine.
///
/// Called after a status change has been persisted. Failures are reported
/// back but never undo the status change.
#[async_trait]
pub trait OrderStatusNotifier: Send + Sync {
    /// Writes the notifications for `order` having moved to `status`.
    async fn notify_status_change(
        &self,
        order: &Order,
        status: OrderStatus,
    ) -> Result<FanoutReport, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_for_status_follows_order_prefix_convention() {
        for status in OrderStatus::ALL.into_iter().filter(|s| *s != OrderStatus::Pending) {
            assert_eq!(kind_for_status(status), format!("order_{status}"));
        }
    }

    #[test]
    fn test_pending_maps_to_created_kind() {
        assert_eq!(kind_for_status(OrderStatus::Pending), ORDER_CREATED_KIND);
    }
}
