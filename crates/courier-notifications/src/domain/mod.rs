//! Domain layer for the Notification context.

pub mod commands;
pub mod templates;
