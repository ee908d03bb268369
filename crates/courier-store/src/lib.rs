//! `PostgreSQL` storage for the Courier order lifecycle engine.
//!
//! Implements the collaborator traits from `courier-core` over a shared
//! `sqlx` connection pool.

pub mod pg_catalog;
pub mod pg_notification_repository;
pub mod pg_order_repository;
pub mod pg_user_directory;
pub mod schema;

use courier_core::error::DomainError;
use uuid::Uuid;

/// Maps a driver error onto the domain's infrastructure variant.
pub(crate) fn infrastructure(err: &sqlx::Error) -> DomainError {
    tracing::error!(error = %err, "database operation failed");
    DomainError::Infrastructure(err.to_string())
}

/// Like [`infrastructure`], but a violation of `user_fkey` (a foreign key onto
/// `users`) means `user_id` has no `users` row.
pub(crate) fn unprovisioned_user(
    err: &sqlx::Error,
    user_fkey: &str,
    user_id: Uuid,
) -> DomainError {
    if err
        .as_database_error()
        .is_some_and(|db| db.is_foreign_key_violation() && db.constraint() == Some(user_fkey))
    {
        tracing::warn!(%user_id, "write rejected for unprovisioned user");
        return DomainError::Unauthorized(format!("user {user_id} is not provisioned"));
    }
    infrastructure(err)
}
