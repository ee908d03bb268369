//! Commands for the Notification context.

use courier_core::command::Command;
use courier_core::identity::Caller;
use uuid::Uuid;

/// Command to mark one notification as read.
#[derive(Debug, Clone)]
pub struct MarkNotificationRead {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The inbox owner.
    pub caller: Caller,
    /// The notification to mark.
    pub notification_id: Uuid,
}

impl Command for MarkNotificationRead {
    fn command_type(&self) -> &'static str {
        "notifications.mark_read"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn issued_by(&self) -> Uuid {
        self.caller.user_id
    }
}

/// Command to mark every unread notification of the caller as read.
#[derive(Debug, Clone)]
pub struct MarkAllNotificationsRead {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The inbox owner.
    pub caller: Caller,
}

impl Command for MarkAllNotificationsRead {
    fn command_type(&self) -> &'static str {
        "notifications.mark_all_read"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn issued_by(&self) -> Uuid {
        self.caller.user_id
    }
}

/// Command to write a diagnostic notification into the caller's own inbox.
#[derive(Debug, Clone)]
pub struct CreateDirectNotification {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The recipient.
    pub caller: Caller,
    /// Notification title.
    pub title: String,
    /// Message body.
    pub message: String,
    /// Kind tag; `test` when absent.
    pub kind: Option<String>,
}

impl Command for CreateDirectNotification {
    fn command_type(&self) -> &'static str {
        "notifications.create_direct"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn issued_by(&self) -> Uuid {
        self.caller.user_id
    }
}
