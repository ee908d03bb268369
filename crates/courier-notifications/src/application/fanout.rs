//! The notification fanout engine.
//!
//! Turns one order status change into one durable notification per audience
//! member. Writes are independent: a failed insert for one recipient is
//! counted and logged, and the remaining recipients are still written.

use std::sync::Arc;

use async_trait::async_trait;
use courier_core::clock::Clock;
use courier_core::error::DomainError;
use courier_core::identity::Role;
use courier_core::notification::{FanoutReport, Notification, OrderStatusNotifier, kind_for_status};
use courier_core::order::{Order, OrderStatus};
use courier_core::repository::{NotificationRepository, UserDirectory};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::domain::templates::{Template, templates_for};

/// Fanout engine over injected notification storage and user lookup.
#[derive(Clone)]
pub struct NotificationFanout {
    notifications: Arc<dyn NotificationRepository>,
    directory: Arc<dyn UserDirectory>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for NotificationFanout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationFanout").finish_non_exhaustive()
    }
}

impl NotificationFanout {
    /// Creates a fanout engine.
    #[must_use]
    pub fn new(
        notifications: Arc<dyn NotificationRepository>,
        directory: Arc<dyn UserDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            notifications,
            directory,
            clock,
        }
    }

    /// Writes the notifications for `order` having moved to `status`.
    ///
    /// Audiences are written in order: customer, admins, delivery agents.
    /// A failed role lookup skips that audience.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownStatus` if no templates exist for
    /// `status`; nothing is written in that case. Individual write failures
    /// are reported in the returned [`FanoutReport`], not as errors.
    #[instrument(skip_all, fields(order_id = %order.id, status = %status))]
    pub async fn fanout(
        &self,
        order: &Order,
        status: OrderStatus,
    ) -> Result<FanoutReport, DomainError> {
        let templates =
            templates_for(status).ok_or_else(|| DomainError::UnknownStatus(status.to_string()))?;
        let kind = kind_for_status(status);
        let reference = order.reference();
        let mut report = FanoutReport::default();

        if let Some(template) = templates.customer {
            self.write_one(order, kind, &reference, template, order.customer_id, &mut report)
                .await;
        }

        for (role, template) in [
            (Role::Admin, templates.admin),
            (Role::Delivery, templates.delivery),
        ] {
            let Some(template) = template else {
                continue;
            };
            match self.directory.users_with_role(role).await {
                Ok(recipients) => {
                    for recipient in recipients {
                        self.write_one(order, kind, &reference, template, recipient, &mut report)
                            .await;
                    }
                }
                Err(e) => {
                    warn!(role = %role, error = %e, "audience lookup failed, skipping");
                }
            }
        }

        debug!(
            attempted = report.attempted,
            written = report.written,
            failed = report.failed,
            "fanout complete"
        );
        Ok(report)
    }

    async fn write_one(
        &self,
        order: &Order,
        kind: &str,
        reference: &str,
        template: Template,
        recipient: Uuid,
        report: &mut FanoutReport,
    ) {
        let now = self.clock.now();
        let notification = Notification {
            id: Uuid::now_v7(),
            user_id: recipient,
            order_id: Some(order.id),
            kind: kind.to_owned(),
            title: template.title.to_owned(),
            message: template.render_message(reference),
            is_read: false,
            created_at: now,
            updated_at: now,
        };

        report.attempted += 1;
        match self.notifications.insert_notification(&notification).await {
            Ok(()) => report.written += 1,
            Err(e) => {
                report.failed += 1;
                warn!(recipient = %recipient, error = %e, "notification write failed");
            }
        }
    }
}

#[async_trait]
impl OrderStatusNotifier for NotificationFanout {
    async fn notify_status_change(
        &self,
        order: &Order,
        status: OrderStatus,
    ) -> Result<FanoutReport, DomainError> {
        self.fanout(order, status).await
    }
}
