//! Domain layer for the Order Lifecycle context.

pub mod cart;
pub mod commands;
pub mod lifecycle;
pub mod policy;
