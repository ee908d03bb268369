//! Routes for the Order Lifecycle bounded context.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use courier_core::notification::FanoutReport;
use courier_core::order::{Order, OrderStatus};
use courier_orders::application::{command_handlers, query_handlers};
use courier_orders::domain::cart::CartLine;
use courier_orders::domain::commands;

use crate::auth::AuthenticatedCaller;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// Requested cart lines.
    pub items: Vec<CartLine>,
}

/// Request body for PUT /{id}/status.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// Target status wire name.
    pub status: String,
}

/// Response body for GET /.
#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    /// Visible orders, newest first.
    pub orders: Vec<Order>,
    /// Number of orders returned.
    pub count: usize,
}

/// Response body for PUT /{id}/status.
#[derive(Debug, Serialize)]
pub struct TransitionResponse {
    /// The order after the transition.
    pub order: Order,
    /// Notifications written by the fanout; `null` when it failed.
    pub notifications: Option<FanoutReport>,
}

/// POST /
#[instrument(skip(state, caller, request), fields(user_id = %caller.user_id, role = %caller.role))]
async fn create_order(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let command = commands::CreateOrder {
        correlation_id: Uuid::new_v4(),
        caller,
        items: request.items,
    };

    info!(correlation_id = %command.correlation_id, "handling create_order command");

    let order = command_handlers::handle_create_order(
        &command,
        state.settings.cart_limits,
        state.clock.as_ref(),
        &*state.catalog,
        &*state.orders,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /
#[instrument(skip(state, caller), fields(user_id = %caller.user_id, role = %caller.role))]
async fn list_orders(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
) -> Result<Json<OrderListResponse>, ApiError> {
    let orders = query_handlers::list_orders(&caller, &*state.orders).await?;
    Ok(Json(OrderListResponse {
        count: orders.len(),
        orders,
    }))
}

/// PUT /{id}/status
#[instrument(skip(state, caller, request), fields(user_id = %caller.user_id, role = %caller.role))]
async fn update_status(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(order_id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<TransitionResponse>, ApiError> {
    let target: OrderStatus = request.status.trim().parse()?;
    let command = commands::TransitionStatus {
        correlation_id: Uuid::new_v4(),
        caller,
        order_id,
        target,
    };

    info!(correlation_id = %command.correlation_id, %order_id, %target, "handling transition_status command");

    let outcome = command_handlers::handle_transition_status(
        &command,
        state.settings.transition_rules,
        state.clock.as_ref(),
        &*state.orders,
        &*state.notifier,
    )
    .await?;

    Ok(Json(TransitionResponse {
        order: outcome.order,
        notifications: outcome.fanout,
    }))
}

/// Returns the router for the orders context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/{id}/status", put(update_status))
}
