//! Route modules organized by bounded context.

pub mod health;
pub mod notifications;
pub mod orders;

use axum::Router;

use crate::state::AppState;

/// Assembles every context router under its `/api/v1` prefix.
pub fn app_router(state: AppState) -> Router {
    let enable_test = state.settings.enable_test_notifications;
    Router::new()
        .merge(health::router())
        .nest("/api/v1/orders", orders::router())
        .nest("/api/v1/notifications", notifications::router(enable_test))
        .with_state(state)
}
