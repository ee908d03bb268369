//! Courier HTTP API: order placement, status transitions and the
//! notification inbox.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;
