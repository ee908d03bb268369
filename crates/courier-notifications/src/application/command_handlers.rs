//! Command handlers for the Notification inbox.

use courier_core::clock::Clock;
use courier_core::command::Command;
use courier_core::error::DomainError;
use courier_core::notification::{Notification, TEST_KIND};
use courier_core::repository::{MarkReadOutcome, NotificationRepository};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::commands::{
    CreateDirectNotification, MarkAllNotificationsRead, MarkNotificationRead,
};

/// How `mark_read` treats ids that are missing or belong to someone else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MarkReadPolicy {
    /// Report `NotificationNotFound` or `Forbidden`.
    #[default]
    Strict,
    /// Succeed without changing anything.
    Lenient,
}

/// Handles the `MarkNotificationRead` command.
///
/// # Errors
///
/// Under [`MarkReadPolicy::Strict`], returns
/// `DomainError::NotificationNotFound` for an unknown id and
/// `DomainError::Forbidden` for another user's notification. Returns
/// `DomainError::Infrastructure` if the store fails.
#[instrument(
    skip_all,
    fields(
        command = command.command_type(),
        notification_id = %command.notification_id,
        user_id = %command.issued_by()
    )
)]
pub async fn handle_mark_read(
    command: &MarkNotificationRead,
    policy: MarkReadPolicy,
    clock: &dyn Clock,
    repo: &dyn NotificationRepository,
) -> Result<(), DomainError> {
    let outcome = repo
        .mark_read(command.notification_id, command.caller.user_id, clock.now())
        .await?;

    match (outcome, policy) {
        (MarkReadOutcome::Marked, _) | (_, MarkReadPolicy::Lenient) => Ok(()),
        (MarkReadOutcome::Missing, MarkReadPolicy::Strict) => {
            Err(DomainError::NotificationNotFound(command.notification_id))
        }
        (MarkReadOutcome::NotOwned, MarkReadPolicy::Strict) => Err(DomainError::Forbidden(
            format!(
                "notification {} belongs to another user",
                command.notification_id
            ),
        )),
    }
}

/// Handles the `MarkAllNotificationsRead` command and returns how many
/// notifications changed.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the store fails.
#[instrument(
    skip_all,
    fields(command = command.command_type(), user_id = %command.issued_by())
)]
pub async fn handle_mark_all_read(
    command: &MarkAllNotificationsRead,
    clock: &dyn Clock,
    repo: &dyn NotificationRepository,
) -> Result<u64, DomainError> {
    let updated = repo
        .mark_all_read(command.caller.user_id, clock.now())
        .await?;
    info!(updated, "inbox marked read");
    Ok(updated)
}

/// Handles the `CreateDirectNotification` command: writes one unread
/// notification, with no order attached, into the caller's inbox.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the title or message is blank, and
/// `DomainError::Infrastructure` if the store fails.
#[instrument(
    skip_all,
    fields(command = command.command_type(), user_id = %command.issued_by())
)]
pub async fn handle_create_direct_notification(
    command: &CreateDirectNotification,
    clock: &dyn Clock,
    repo: &dyn NotificationRepository,
) -> Result<Notification, DomainError> {
    let title = command.title.trim();
    let message = command.message.trim();
    if title.is_empty() {
        return Err(DomainError::Validation("title must not be blank".to_owned()));
    }
    if message.is_empty() {
        return Err(DomainError::Validation(
            "message must not be blank".to_owned(),
        ));
    }
    let kind = command
        .kind
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .unwrap_or(TEST_KIND);

    let now = clock.now();
    let notification = Notification {
        id: Uuid::now_v7(),
        user_id: command.caller.user_id,
        order_id: None,
        kind: kind.to_owned(),
        title: title.to_owned(),
        message: message.to_owned(),
        is_read: false,
        created_at: now,
        updated_at: now,
    };
    repo.insert_notification(&notification).await?;
    Ok(notification)
}
