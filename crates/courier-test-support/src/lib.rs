//! Shared test fakes and utilities for the Courier order lifecycle engine.

mod catalog;
mod clock;
mod directory;
mod notifications;
mod notifier;
mod orders;

pub use catalog::{FailingCatalog, StaticCatalog};
pub use clock::FixedClock;
pub use directory::StaticUserDirectory;
pub use notifications::{FailingNotificationRepository, InMemoryNotificationRepository};
pub use notifier::{FailingNotifier, RecordingNotifier};
pub use orders::{FailingOrderRepository, InMemoryOrderRepository};
