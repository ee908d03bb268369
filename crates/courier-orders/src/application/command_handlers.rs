//! Command handlers for the Order Lifecycle context.
//!
//! Each handler orchestrates domain logic: validate, load, authorize,
//! persist, then trigger notifications.

use courier_core::clock::Clock;
use courier_core::command::Command;
use courier_core::error::DomainError;
use courier_core::notification::{FanoutReport, OrderStatusNotifier};
use courier_core::order::Order;
use courier_core::repository::{CatalogReader, OrderRepository};
use tracing::{info, instrument, warn};

use crate::domain::cart::{CartLimits, build_order, validate_cart};
use crate::domain::commands::{CreateOrder, TransitionStatus};
use crate::domain::lifecycle::apply_transition;
use crate::domain::policy::{Action, TransitionRules, authorize_transition, permits};

/// Result of a successfully handled status change.
#[derive(Debug)]
pub struct TransitionOutcome {
    /// The order as persisted.
    pub order: Order,
    /// What the fanout wrote, or `None` if it failed outright.
    pub fanout: Option<FanoutReport>,
}

/// Handles the `CreateOrder` command: validates the cart, prices every line
/// from the catalog, and persists the order with its items in one write.
///
/// # Errors
///
/// - `DomainError::Forbidden` if the caller's role may not place orders.
/// - `DomainError::Validation` if the cart is empty or a quantity is out of
///   range. Nothing is read from the catalog in that case.
/// - `DomainError::ProductNotFound` for the first unknown product.
/// - `DomainError::Infrastructure` if the catalog or store fails.
#[instrument(
    skip_all,
    fields(
        command = command.command_type(),
        correlation_id = %command.correlation_id,
        customer_id = %command.caller.user_id
    )
)]
pub async fn handle_create_order(
    command: &CreateOrder,
    limits: CartLimits,
    clock: &dyn Clock,
    catalog: &dyn CatalogReader,
    repo: &dyn OrderRepository,
) -> Result<Order, DomainError> {
    if !permits(command.caller.role, Action::PlaceOrder) {
        return Err(DomainError::Forbidden(format!(
            "role {} may not place orders",
            command.caller.role
        )));
    }
    validate_cart(&command.items, limits)?;

    let mut priced_lines = Vec::with_capacity(command.items.len());
    for line in &command.items {
        let product = catalog
            .get_product(line.product_id)
            .await?
            .ok_or(DomainError::ProductNotFound(line.product_id))?;
        priced_lines.push((*line, product));
    }

    let order = build_order(command.caller.user_id, &priced_lines, clock);
    repo.insert_order(&order).await?;

    info!(order_id = %order.id, total = %order.total, "order created");
    Ok(order)
}

/// Handles the `TransitionStatus` command: loads the order, authorizes the
/// move, persists it against the version that was read, then fans out
/// notifications.
///
/// The fanout runs only after the status write succeeded, and its failure
/// is logged without failing the transition.
///
/// # Errors
///
/// - `DomainError::OrderNotFound` if the order does not exist.
/// - `DomainError::Forbidden`, `DomainError::Conflict` or
///   `DomainError::InvalidTransition` from the policy.
/// - `DomainError::ConcurrencyConflict` if another writer changed the order
///   between the read and the write.
/// - `DomainError::Infrastructure` if the store fails.
#[instrument(
    skip_all,
    fields(
        command = command.command_type(),
        correlation_id = %command.correlation_id,
        order_id = %command.order_id,
        target = %command.target,
        role = %command.caller.role,
    )
)]
pub async fn handle_transition_status(
    command: &TransitionStatus,
    rules: TransitionRules,
    clock: &dyn Clock,
    repo: &dyn OrderRepository,
    notifier: &dyn OrderStatusNotifier,
) -> Result<TransitionOutcome, DomainError> {
    let current = repo
        .find_order(command.order_id)
        .await?
        .ok_or(DomainError::OrderNotFound(command.order_id))?;

    let grant = authorize_transition(&command.caller, &current, command.target, rules)?;
    let next = apply_transition(&current, grant, clock);

    repo.update_status(&next, current.version).await?;
    info!(from = %current.status, to = %next.status, version = next.version, "order status changed");

    let fanout = match notifier.notify_status_change(&next, next.status).await {
        Ok(report) => {
            if report.failed > 0 {
                warn!(
                    order_id = %next.id,
                    status = %next.status,
                    failed = report.failed,
                    written = report.written,
                    "some notifications were not written"
                );
            }
            Some(report)
        }
        Err(e) => {
            warn!(order_id = %next.id, status = %next.status, error = %e, "notification fanout failed");
            None
        }
    };

    Ok(TransitionOutcome {
        order: next,
        fanout,
    })
}
