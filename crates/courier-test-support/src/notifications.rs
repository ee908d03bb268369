//! Test repositories: `NotificationRepository` implementations for tests.

use std::cmp::Reverse;
use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use courier_core::error::DomainError;
use courier_core::notification::Notification;
use courier_core::repository::{MarkReadOutcome, NotificationRepository};
use uuid::Uuid;

/// A notification repository held in memory. Inserts addressed to a user in
/// the rejecting set fail, which lets tests exercise partial fanout failure.
#[derive(Debug, Default)]
pub struct InMemoryNotificationRepository {
    notifications: Mutex<Vec<Notification>>,
    rejecting: HashSet<Uuid>,
}

impl InMemoryNotificationRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes inserts for `user_id` fail with an infrastructure error.
    #[must_use]
    pub fn rejecting_recipient(mut self, user_id: Uuid) -> Self {
        self.rejecting.insert(user_id);
        self
    }

    /// Returns a snapshot of all stored notifications in insertion order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    /// Returns the stored notifications addressed to `user_id`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn for_user(&self, user_id: Uuid) -> Vec<Notification> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn insert_notification(&self, notification: &Notification) -> Result<(), DomainError> {
        if self.rejecting.contains(&notification.user_id) {
            return Err(DomainError::Infrastructure(format!(
                "insert rejected for recipient {}",
                notification.user_id
            )));
        }
        self.notifications.lock().unwrap().push(notification.clone());
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: Option<u32>,
    ) -> Result<Vec<Notification>, DomainError> {
        let mut matching = self.for_user(user_id);
        matching.reverse();
        matching.sort_by_key(|n| Reverse(n.created_at));
        if let Some(limit) = limit {
            matching.truncate(limit as usize);
        }
        Ok(matching)
    }

    async fn unread_count(&self, user_id: Uuid) -> Result<u64, DomainError> {
        Ok(self
            .notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.user_id == user_id && !n.is_read)
            .count() as u64)
    }

    async fn mark_read(
        &self,
        notification_id: Uuid,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<MarkReadOutcome, DomainError> {
        let mut notifications = self.notifications.lock().unwrap();
        match notifications.iter_mut().find(|n| n.id == notification_id) {
            None => Ok(MarkReadOutcome::Missing),
            Some(n) if n.user_id != user_id => Ok(MarkReadOutcome::NotOwned),
            Some(n) => {
                n.is_read = true;
                n.updated_at = at;
                Ok(MarkReadOutcome::Marked)
            }
        }
    }

    async fn mark_all_read(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<u64, DomainError> {
        let mut updated = 0;
        for n in self
            .notifications
            .lock()
            .unwrap()
            .iter_mut()
            .filter(|n| n.user_id == user_id && !n.is_read)
        {
            n.is_read = true;
            n.updated_at = at;
            updated += 1;
        }
        Ok(updated)
    }
}

/// A notification repository that always returns an infrastructure error.
#[derive(Debug)]
pub struct FailingNotificationRepository;

#[async_trait]
impl NotificationRepository for FailingNotificationRepository {
    async fn insert_notification(&self, _notification: &Notification) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn list_for_user(
        &self,
        _user_id: Uuid,
        _limit: Option<u32>,
    ) -> Result<Vec<Notification>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn unread_count(&self, _user_id: Uuid) -> Result<u64, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn mark_read(
        &self,
        _notification_id: Uuid,
        _user_id: Uuid,
        _at: DateTime<Utc>,
    ) -> Result<MarkReadOutcome, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn mark_all_read(&self, _user_id: Uuid, _at: DateTime<Utc>) -> Result<u64, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}
