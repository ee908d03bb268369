//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use courier_core::identity::Role;
use courier_test_support::{
    FixedClock, InMemoryNotificationRepository, InMemoryOrderRepository, StaticCatalog,
    StaticUserDirectory,
};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use tower::ServiceExt;
use uuid::Uuid;

use courier_api::auth::{USER_ID_HEADER, USER_ROLE_HEADER};
use courier_api::config::ServiceSettings;
use courier_api::routes;
use courier_api::state::AppState;

/// Seeded users, products and the in-memory stores behind one app.
pub struct TestWorld {
    pub customer: Uuid,
    pub admin: Uuid,
    pub agents: [Uuid; 2],
    /// Priced at 8.00.
    pub burger: Uuid,
    /// Priced at 4.00.
    pub soda: Uuid,
    pub orders: Arc<InMemoryOrderRepository>,
    pub notifications: Arc<InMemoryNotificationRepository>,
    state: AppState,
}

impl TestWorld {
    /// One customer, one admin, two delivery agents and two products.
    pub fn new() -> Self {
        Self::with_settings(ServiceSettings::default())
    }

    pub fn with_settings(settings: ServiceSettings) -> Self {
        let customer = Uuid::new_v4();
        let admin = Uuid::new_v4();
        let agents = [Uuid::new_v4(), Uuid::new_v4()];
        let burger = Uuid::new_v4();
        let soda = Uuid::new_v4();

        let catalog = StaticCatalog::new([
            (burger, Decimal::from_str("8.00").unwrap()),
            (soda, Decimal::from_str("4.00").unwrap()),
        ]);
        let directory = StaticUserDirectory::new([
            (customer, Role::Customer),
            (admin, Role::Admin),
            (agents[0], Role::Delivery),
            (agents[1], Role::Delivery),
        ]);
        let orders = Arc::new(InMemoryOrderRepository::new());
        let notifications = Arc::new(InMemoryNotificationRepository::new());

        let state = AppState::new(
            Arc::new(FixedClock::standard()),
            Arc::new(catalog),
            orders.clone(),
            notifications.clone(),
            Arc::new(directory),
            settings,
        );

        Self {
            customer,
            admin,
            agents,
            burger,
            soda,
            orders,
            notifications,
            state,
        }
    }

    /// Full app router, assembled the same way as `main.rs`.
    pub fn app(&self) -> Router {
        routes::app_router(self.state.clone())
    }
}

/// Send a request as `identity` and return the status and JSON body.
/// An empty body comes back as `Value::Null`.
pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
    identity: Option<(Uuid, Role)>,
    body: Option<&serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((user_id, role)) = identity {
        builder = builder
            .header(USER_ID_HEADER, user_id.to_string())
            .header(USER_ROLE_HEADER, role.as_str());
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Send a POST request with a JSON body.
pub async fn post_json(
    app: Router,
    uri: &str,
    identity: (Uuid, Role),
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "POST", uri, Some(identity), Some(body)).await
}

/// Send a PUT request with a JSON body.
pub async fn put_json(
    app: Router,
    uri: &str,
    identity: (Uuid, Role),
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "PUT", uri, Some(identity), Some(body)).await
}

/// Send a GET request.
pub async fn get_json(
    app: Router,
    uri: &str,
    identity: (Uuid, Role),
) -> (StatusCode, serde_json::Value) {
    send(app, "GET", uri, Some(identity), None).await
}
