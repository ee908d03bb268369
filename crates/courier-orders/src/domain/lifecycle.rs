//! Applying an authorized status change to an order.

use courier_core::clock::Clock;
use courier_core::order::Order;

use super::policy::TransitionGrant;

/// Returns `order` moved to the granted status.
///
/// The version is bumped and `updated_at` set; a granted agent becomes the
/// order's delivery agent. The input is left untouched so the caller still
/// holds the version to check against on write.
#[must_use]
pub fn apply_transition(order: &Order, grant: TransitionGrant, clock: &dyn Clock) -> Order {
    let mut next = order.clone();
    next.status = grant.target;
    if let Some(agent) = grant.assign_agent {
        next.delivery_agent_id = Some(agent);
    }
    next.version = order.version + 1;
    next.updated_at = clock.now();
    next
}
