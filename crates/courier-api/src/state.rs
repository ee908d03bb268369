//! Shared application state.

use std::fmt;
use std::sync::Arc;

use courier_core::clock::{Clock, SystemClock};
use courier_core::notification::OrderStatusNotifier;
use courier_core::repository::{
    CatalogReader, NotificationRepository, OrderRepository, UserDirectory,
};
use courier_notifications::application::fanout::NotificationFanout;
use courier_store::pg_catalog::PgCatalog;
use courier_store::pg_notification_repository::PgNotificationRepository;
use courier_store::pg_order_repository::PgOrderRepository;
use courier_store::pg_user_directory::PgUserDirectory;
use sqlx::PgPool;

use crate::config::ServiceSettings;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Clock for all timestamps.
    pub clock: Arc<dyn Clock>,
    /// Product catalog.
    pub catalog: Arc<dyn CatalogReader>,
    /// Order store.
    pub orders: Arc<dyn OrderRepository>,
    /// Notification store.
    pub notifications: Arc<dyn NotificationRepository>,
    /// Fanout invoked after each persisted transition.
    pub notifier: Arc<dyn OrderStatusNotifier>,
    /// Handler settings.
    pub settings: ServiceSettings,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create new application state. The notifier is a [`NotificationFanout`]
    /// over `notifications` and `directory`.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        catalog: Arc<dyn CatalogReader>,
        orders: Arc<dyn OrderRepository>,
        notifications: Arc<dyn NotificationRepository>,
        directory: Arc<dyn UserDirectory>,
        settings: ServiceSettings,
    ) -> Self {
        let notifier = Arc::new(NotificationFanout::new(
            Arc::clone(&notifications),
            directory,
            Arc::clone(&clock),
        ));
        Self {
            clock,
            catalog,
            orders,
            notifications,
            notifier,
            settings,
        }
    }

    /// State backed by `PostgreSQL` stores sharing `pool`.
    #[must_use]
    pub fn postgres(pool: &PgPool, settings: ServiceSettings) -> Self {
        Self::new(
            Arc::new(SystemClock),
            Arc::new(PgCatalog::new(pool.clone())),
            Arc::new(PgOrderRepository::new(pool.clone())),
            Arc::new(PgNotificationRepository::new(pool.clone())),
            Arc::new(PgUserDirectory::new(pool.clone())),
            settings,
        )
    }

    /// Replaces the notifier.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn OrderStatusNotifier>) -> Self {
        self.notifier = notifier;
        self
    }
}
