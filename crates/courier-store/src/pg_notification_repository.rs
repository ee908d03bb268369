//! `PostgreSQL` implementation of the `NotificationRepository` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use courier_core::error::DomainError;
use courier_core::notification::Notification;
use courier_core::repository::{MarkReadOutcome, NotificationRepository};

use crate::{infrastructure, unprovisioned_user};

const RECIPIENT_FKEY: &str = "notifications_user_id_fkey";

#[derive(Debug, FromRow)]
struct NotificationRow {
    id: Uuid,
    user_id: Uuid,
    order_id: Option<Uuid>,
    kind: String,
    title: String,
    message: String,
    is_read: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            order_id: row.order_id,
            kind: row.kind,
            title: row.title,
            message: row.message,
            is_read: row.is_read,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// `PostgreSQL`-backed notification repository.
#[derive(Debug, Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    /// Creates a new `PgNotificationRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn insert_notification(&self, notification: &Notification) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO notifications
                 (id, user_id, order_id, kind, title, message, is_read, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(notification.id)
        .bind(notification.user_id)
        .bind(notification.order_id)
        .bind(&notification.kind)
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.is_read)
        .bind(notification.created_at)
        .bind(notification.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| unprovisioned_user(&e, RECIPIENT_FKEY, notification.user_id))?;
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: Option<u32>,
    ) -> Result<Vec<Notification>, DomainError> {
        // `LIMIT NULL` is unbounded in PostgreSQL.
        let rows: Vec<NotificationRow> = sqlx::query_as(
            "SELECT id, user_id, order_id, kind, title, message, is_read, created_at, updated_at
             FROM notifications
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2",
        )
        .bind(user_id)
        .bind(limit.map(i64::from))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| infrastructure(&e))?;
        Ok(rows.into_iter().map(Notification::from).collect())
    }

    async fn unread_count(&self, user_id: Uuid) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND NOT is_read",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| infrastructure(&e))?;
        u64::try_from(count)
            .map_err(|e| DomainError::Infrastructure(format!("invalid unread count: {e}")))
    }

    async fn mark_read(
        &self,
        notification_id: Uuid,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<MarkReadOutcome, DomainError> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, updated_at = $3
             WHERE id = $1 AND user_id = $2",
        )
        .bind(notification_id)
        .bind(user_id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| infrastructure(&e))?;
        if result.rows_affected() > 0 {
            return Ok(MarkReadOutcome::Marked);
        }

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM notifications WHERE id = $1)")
                .bind(notification_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| infrastructure(&e))?;
        Ok(if exists {
            MarkReadOutcome::NotOwned
        } else {
            MarkReadOutcome::Missing
        })
    }

    async fn mark_all_read(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<u64, DomainError> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, updated_at = $2
             WHERE user_id = $1 AND NOT is_read",
        )
        .bind(user_id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| infrastructure(&e))?;
        Ok(result.rows_affected())
    }
}
