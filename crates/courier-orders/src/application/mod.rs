//! Application layer for the Order Lifecycle context.

pub mod command_handlers;
pub mod query_handlers;
