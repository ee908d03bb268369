//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

use crate::order::OrderStatus;

/// Top-level domain error type.
///
/// Every core operation returns this as its typed failure outcome so the
/// surrounding service layer can distinguish input errors from authorization
/// errors from transient storage errors.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Malformed or out-of-range request data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The order does not exist.
    #[error("order not found: {0}")]
    OrderNotFound(Uuid),

    /// A cart line references a product the catalog does not know.
    #[error("product not found: {0}")]
    ProductNotFound(Uuid),

    /// The notification does not exist.
    #[error("notification not found: {0}")]
    NotificationNotFound(Uuid),

    /// Missing or unusable caller identity.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The caller's role lacks permission for the requested action.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The order has been claimed by another delivery agent.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Optimistic concurrency conflict on a conditional update.
    #[error("concurrency conflict on order {aggregate_id}: expected version {expected}")]
    ConcurrencyConflict {
        /// The order that had the conflict.
        aggregate_id: Uuid,
        /// The version the caller read before writing.
        expected: i64,
    },

    /// The requested move is not defined from the order's current status.
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition {
        /// Status before the attempted transition.
        from: OrderStatus,
        /// Requested target status.
        to: OrderStatus,
    },

    /// No notification template exists for the status.
    #[error("unknown order status for notification: {0}")]
    UnknownStatus(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
