//! Query handlers for the Notification inbox.
//!
//! Every query is scoped to the caller's own user id.

use courier_core::error::DomainError;
use courier_core::identity::Caller;
use courier_core::notification::Notification;
use courier_core::repository::NotificationRepository;

/// Default inbox page size.
pub const DEFAULT_LIST_LIMIT: u32 = 20;

/// Resolves a raw `limit` query value.
///
/// Absent or non-numeric values fall back to `default`; zero or negative
/// values disable truncation.
#[must_use]
pub fn resolve_limit(raw: Option<&str>, default: u32) -> Option<u32> {
    let Some(parsed) = raw.and_then(|v| v.trim().parse::<i64>().ok()) else {
        return Some(default);
    };
    if parsed <= 0 {
        None
    } else {
        Some(u32::try_from(parsed).unwrap_or(u32::MAX))
    }
}

/// Lists the caller's notifications, newest first, truncated to `limit`.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the store fails.
pub async fn list_notifications(
    caller: &Caller,
    limit: Option<u32>,
    repo: &dyn NotificationRepository,
) -> Result<Vec<Notification>, DomainError> {
    repo.list_for_user(caller.user_id, limit).await
}

/// Counts the caller's unread notifications.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the store fails.
pub async fn unread_count(
    caller: &Caller,
    repo: &dyn NotificationRepository,
) -> Result<u64, DomainError> {
    repo.unread_count(caller.user_id).await
}
