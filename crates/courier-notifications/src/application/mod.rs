//! Application layer for the Notification context.

pub mod command_handlers;
pub mod fanout;
pub mod query_handlers;
