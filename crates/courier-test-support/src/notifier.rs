//! Test notifiers: `OrderStatusNotifier` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use courier_core::error::DomainError;
use courier_core::notification::{FanoutReport, OrderStatusNotifier};
use courier_core::order::{Order, OrderStatus};
use uuid::Uuid;

/// A notifier that records every call and reports one written notification
/// per call.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    calls: Mutex<Vec<(Uuid, OrderStatus)>>,
}

impl RecordingNotifier {
    /// Creates a notifier with no recorded calls.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded `(order_id, status)` pairs.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> Vec<(Uuid, OrderStatus)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrderStatusNotifier for RecordingNotifier {
    async fn notify_status_change(
        &self,
        order: &Order,
        status: OrderStatus,
    ) -> Result<FanoutReport, DomainError> {
        self.calls.lock().unwrap().push((order.id, status));
        Ok(FanoutReport {
            attempted: 1,
            written: 1,
            failed: 0,
        })
    }
}

/// A notifier that always fails.
#[derive(Debug)]
pub struct FailingNotifier;

#[async_trait]
impl OrderStatusNotifier for FailingNotifier {
    async fn notify_status_change(
        &self,
        _order: &Order,
        _status: OrderStatus,
    ) -> Result<FanoutReport, DomainError> {
        Err(DomainError::Infrastructure("notification store unavailable".into()))
    }
}
