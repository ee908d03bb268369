//! Courier Core: shared domain abstractions.
//!
//! This crate defines the records, traits and error type that the order
//! lifecycle and notification contexts depend on. It contains no
//! infrastructure code.

pub mod clock;
pub mod command;
pub mod error;
pub mod identity;
pub mod notification;
pub mod order;
pub mod repository;
