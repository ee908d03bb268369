//! Courier: Notification bounded context.
//!
//! Fans order status changes out to the customer, admins and delivery agents
//! as durable notifications, and serves each user's inbox.

pub mod application;
pub mod domain;
