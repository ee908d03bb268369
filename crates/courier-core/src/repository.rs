//! Collaborator abstractions consumed by the core.
//!
//! Each trait is injected so tests can swap `PostgreSQL` for in-memory fakes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::DomainError;
use crate::identity::Role;
use crate::notification::Notification;
use crate::order::{Order, OrderStatus};

/// Price and existence of a catalog product at the moment it was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductSnapshot {
    /// Product identifier.
    pub id: Uuid,
    /// Current catalog price.
    pub price: Decimal,
}

/// Read-only view over the product catalog.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// Returns the product, or `None` if it does not exist.
    async fn get_product(&self, product_id: Uuid) -> Result<Option<ProductSnapshot>, DomainError>;
}

/// Which orders a listing should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderFilter {
    /// Orders placed by this customer.
    Customer(Uuid),
    /// Orders assigned to this agent, plus unassigned orders in `ready`.
    DeliveryAgent(Uuid),
    /// Every order.
    All,
}

impl OrderFilter {
    /// Whether `order` belongs in a listing with this filter.
    #[must_use]
    pub fn matches(&self, order: &Order) -> bool {
        match *self {
            Self::Customer(customer_id) => order.customer_id == customer_id,
            Self::DeliveryAgent(agent_id) => match order.delivery_agent_id {
                Some(assigned) => assigned == agent_id,
                None => order.status == OrderStatus::Ready,
            },
            Self::All => true,
        }
    }
}

/// Durable store of orders and their items.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Writes the order header and every item in a single unit of work. On
    /// failure nothing is persisted.
    async fn insert_order(&self, order: &Order) -> Result<(), DomainError>;

    /// Loads an order with its items.
    async fn find_order(&self, order_id: Uuid) -> Result<Option<Order>, DomainError>;

    /// Persists `status`, `delivery_agent_id`, `version` and `updated_at` of
    /// `order`, but only if the stored version still equals
    /// `expected_version`.
    ///
    /// Returns `DomainError::ConcurrencyConflict` when the stored version has
    /// moved on, and `DomainError::OrderNotFound` when the order is gone.
    async fn update_status(&self, order: &Order, expected_version: i64) -> Result<(), DomainError>;

    /// Lists orders matching `filter`, newest first.
    async fn list_orders(&self, filter: OrderFilter) -> Result<Vec<Order>, DomainError>;
}

/// Result of a scoped mark-read attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkReadOutcome {
    /// The notification belongs to the user and is now read.
    Marked,
    /// The notification exists but belongs to someone else. Nothing changed.
    NotOwned,
    /// No notification has that id.
    Missing,
}

/// Durable store of notifications.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Persists one notification.
    async fn insert_notification(&self, notification: &Notification) -> Result<(), DomainError>;

    /// Notifications for `user_id`, newest first, truncated to `limit` when set.
    async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: Option<u32>,
    ) -> Result<Vec<Notification>, DomainError>;

    /// Number of unread notifications for `user_id`.
    async fn unread_count(&self, user_id: Uuid) -> Result<u64, DomainError>;

    /// Sets the read flag when the notification belongs to `user_id`.
    async fn mark_read(
        &self,
        notification_id: Uuid,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<MarkReadOutcome, DomainError>;

    /// Sets the read flag on every unread notification of `user_id` and
    /// returns how many were updated.
    async fn mark_all_read(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<u64, DomainError>;
}

/// Role-indexed user lookup.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Every user currently holding `role`.
    async fn users_with_role(&self, role: Role) -> Result<Vec<Uuid>, DomainError>;
}
