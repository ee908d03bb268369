//! Routes for the Notification inbox.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use courier_core::notification::Notification;
use courier_notifications::application::{command_handlers, query_handlers};
use courier_notifications::domain::commands;

use crate::auth::AuthenticatedCaller;
use crate::error::ApiError;
use crate::state::AppState;

/// Query string for GET /.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Raw page size; see [`query_handlers::resolve_limit`].
    pub limit: Option<String>,
}

/// Request body for POST /test.
#[derive(Debug, Deserialize)]
pub struct DirectNotificationRequest {
    /// Notification title.
    pub title: String,
    /// Message body.
    pub message: String,
    /// Optional kind tag.
    #[serde(default, alias = "type")]
    pub kind: Option<String>,
}

/// Response body for GET /.
#[derive(Debug, Serialize)]
pub struct NotificationListResponse {
    /// Notifications, newest first.
    pub notifications: Vec<Notification>,
    /// Number returned.
    pub count: usize,
}

/// Response body for GET /unread-count.
#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    /// Unread notifications for the caller.
    pub unread_count: u64,
}

/// Response body for PUT /mark-all-read.
#[derive(Debug, Serialize)]
pub struct MarkAllReadResponse {
    /// Notifications that changed.
    pub updated: u64,
}

/// GET /
#[instrument(skip(state, caller, query), fields(user_id = %caller.user_id))]
async fn list_notifications(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Query(query): Query<ListQuery>,
) -> Result<Json<NotificationListResponse>, ApiError> {
    let limit = query_handlers::resolve_limit(
        query.limit.as_deref(),
        state.settings.inbox_default_limit,
    );
    let notifications =
        query_handlers::list_notifications(&caller, limit, &*state.notifications).await?;
    Ok(Json(NotificationListResponse {
        count: notifications.len(),
        notifications,
    }))
}

/// GET /unread-count
#[instrument(skip(state, caller), fields(user_id = %caller.user_id))]
async fn unread_count(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
) -> Result<Json<UnreadCountResponse>, ApiError> {
    let unread_count = query_handlers::unread_count(&caller, &*state.notifications).await?;
    Ok(Json(UnreadCountResponse { unread_count }))
}

/// PUT /{id}/read
#[instrument(skip(state, caller), fields(user_id = %caller.user_id))]
async fn mark_read(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(notification_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let command = commands::MarkNotificationRead {
        correlation_id: Uuid::new_v4(),
        caller,
        notification_id,
    };

    command_handlers::handle_mark_read(
        &command,
        state.settings.mark_read_policy,
        state.clock.as_ref(),
        &*state.notifications,
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /mark-all-read
#[instrument(skip(state, caller), fields(user_id = %caller.user_id))]
async fn mark_all_read(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
) -> Result<Json<MarkAllReadResponse>, ApiError> {
    let command = commands::MarkAllNotificationsRead {
        correlation_id: Uuid::new_v4(),
        caller,
    };

    let updated = command_handlers::handle_mark_all_read(
        &command,
        state.clock.as_ref(),
        &*state.notifications,
    )
    .await?;

    Ok(Json(MarkAllReadResponse { updated }))
}

/// POST /test
#[instrument(skip(state, caller, request), fields(user_id = %caller.user_id))]
async fn create_test_notification(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Json(request): Json<DirectNotificationRequest>,
) -> Result<(StatusCode, Json<Notification>), ApiError> {
    let command = commands::CreateDirectNotification {
        correlation_id: Uuid::new_v4(),
        caller,
        title: request.title,
        message: request.message,
        kind: request.kind,
    };

    info!(correlation_id = %command.correlation_id, "handling create_direct_notification command");

    let notification = command_handlers::handle_create_direct_notification(
        &command,
        state.clock.as_ref(),
        &*state.notifications,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(notification)))
}

/// Returns the router for the notifications context. `POST /test` is only
/// routed when `enable_test_notifications` is set.
pub fn router(enable_test_notifications: bool) -> Router<AppState> {
    let router = Router::new()
        .route("/", get(list_notifications))
        .route("/unread-count", get(unread_count))
        .route("/mark-all-read", put(mark_all_read))
        .route("/{id}/read", put(mark_read));
    if enable_test_notifications {
        router.route("/test", post(create_test_notification))
    } else {
        router
    }
}
