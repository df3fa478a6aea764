// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Route registration tests
//!
//! These tests verify that:
//! - /health reports version and detector state
//! - /v1/amenities exposes the vocabulary
//! - /v1/detect only accepts POST
//! - Unknown routes return a JSON 404

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use serde_json::Value;
use spotter::api::{create_app, AppState};
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot`

use crate::common::{orchestrator, ScriptedSource, WidthDetector};

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_without_detector() {
    let app = create_app(AppState::new_for_test());

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["detector_loaded"], false);
    assert_eq!(json["version"], spotter::version::VERSION_NUMBER);
}

#[tokio::test]
async fn test_health_with_detector() {
    let state = AppState::new_for_test();
    state
        .set_orchestrator(orchestrator(
            Arc::new(ScriptedSource::new()),
            Arc::new(WidthDetector::new()),
            0,
        ))
        .await;
    let app = create_app(state);

    let response = app.oneshot(get("/health")).await.unwrap();

    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["detector"], "width-detector");
    assert_eq!(json["detector_loaded"], true);
}

#[tokio::test]
async fn test_amenities_route() {
    let app = create_app(AppState::new_for_test());

    let response = app.oneshot(get("/v1/amenities")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["amenities"]["tv"], "TV");
    assert_eq!(json["amenities"]["car"], "parking");
    assert!(json["amenities"].get("remote").is_none());
}

#[tokio::test]
async fn test_detect_rejects_get() {
    let app = create_app(AppState::new_for_test());

    let response = app.oneshot(get("/v1/detect")).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = create_app(AppState::new_for_test());

    let response = app.oneshot(get("/v1/nope")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error_type"], "not_found");
}
