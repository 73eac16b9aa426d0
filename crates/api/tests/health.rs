//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get};
use subtrack_api::router::build_app_router;
use subtrack_api::state::AppState;
use subtrack_core::cost::{CostQuery, CostSummary};
use subtrack_core::error::CoreError;
use subtrack_core::store::SubscriptionStore;
use subtrack_core::subscription::{Subscription, SubscriptionPage};
use subtrack_core::types::DbId;
use tower::ServiceExt;

/// A store whose backend is permanently unreachable.
struct UnreachableStore;

fn unreachable() -> CoreError {
    CoreError::storage(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "connection refused",
    ))
}

#[async_trait]
impl SubscriptionStore for UnreachableStore {
    async fn health_check(&self) -> Result<(), CoreError> {
        Err(unreachable())
    }

    async fn create(&self, _sub: &Subscription) -> Result<Subscription, CoreError> {
        Err(unreachable())
    }

    async fn find_by_id(&self, _id: DbId) -> Result<Option<Subscription>, CoreError> {
        Err(unreachable())
    }

    async fn list(&self, _limit: i64, _offset: i64) -> Result<SubscriptionPage, CoreError> {
        Err(unreachable())
    }

    async fn update(&self, _sub: &Subscription) -> Result<Option<Subscription>, CoreError> {
        Err(unreachable())
    }

    async fn delete(&self, _id: DbId) -> Result<bool, CoreError> {
        Err(unreachable())
    }

    async fn total_cost(&self, _query: &CostQuery) -> Result<CostSummary, CoreError> {
        Err(unreachable())
    }
}

fn unreachable_app() -> axum::Router {
    let state = AppState::new(Arc::new(UnreachableStore));
    build_app_router(state, &common::test_config())
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_returns_ok_with_json() {
    let app = common::build_test_app();
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["storage_healthy"], true);
}

#[tokio::test]
async fn health_check_reports_degraded_storage() {
    let response = get(unreachable_app(), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["storage_healthy"], false);
}

#[tokio::test]
async fn storage_failure_surfaces_as_sanitized_500() {
    let response = get(unreachable_app(), "/api/v1/subscriptions").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

// ---------------------------------------------------------------------------
// General HTTP behaviour
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = common::build_test_app();
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = common::build_test_app();
    let response = get(app, "/health").await;

    let request_id = response.headers().get("x-request-id");
    assert_matches!(request_id, Some(_));

    // Generated ids are UUIDs.
    let id_str = request_id.unwrap().to_str().unwrap();
    assert!(uuid::Uuid::parse_str(id_str).is_ok());
}

#[tokio::test]
async fn supplied_request_id_is_propagated() {
    let app = common::build_test_app();
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "trace-me")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "trace-me");
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let app = common::build_test_app();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/subscriptions")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );
}

#[tokio::test]
async fn cors_preflight_does_not_allow_credentials() {
    let app = common::build_test_app();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/subscriptions")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "PUT")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert!(response
        .headers()
        .get("access-control-allow-credentials")
        .is_none());
    let methods = response.headers()["access-control-allow-methods"]
        .to_str()
        .unwrap();
    assert!(methods.contains("PUT"));
    assert!(!methods.contains("PATCH"));
}
