//! Courier: Order Lifecycle bounded context.
//!
//! Builds orders from carts against a catalog snapshot, and moves them
//! through their status state machine under role authorization.

pub mod application;
pub mod domain;
