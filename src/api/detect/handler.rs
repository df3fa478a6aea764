// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection endpoint handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::request::DetectionRequest;
use super::response::{AmenitiesResponse, DetectionResponse, HealthResponse};
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;

/// POST /v1/detect - Detect amenities in a batch of images
///
/// Fetches every URL concurrently, runs object detection, maps detections
/// to amenities and returns one annotated image per URL plus a summary.
///
/// # Request
/// - `image_urls`: http(s) image URLs (required, may be empty)
///
/// # Response
/// - `amenities_description`: Sorted, de-duplicated amenities across all images
/// - `images`: One entry per URL in request order, either
///   `{url, detections, labeled_image_base64}` or `{url, error}`
///
/// # Errors
/// - 400 Bad Request: Malformed JSON or an invalid URL (nothing is processed)
/// - 503 Service Unavailable: Detection model not loaded
pub async fn detect_handler(
    State(state): State<AppState>,
    payload: Result<Json<DetectionRequest>, JsonRejection>,
) -> Result<Json<DetectionResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected detection request body: {}", rejection.body_text());
        ApiError::from(rejection)
    })?;

    // 1. Validate request
    if let Err(e) = request.validate() {
        warn!("Detection validation failed: {}", e);
        return Err(e);
    }

    // 2. Get orchestrator from state
    let orchestrator = state.orchestrator().await.ok_or_else(|| {
        warn!("Detection requested but no detector is loaded");
        ApiError::ServiceUnavailable("Detection model not loaded".to_string())
    })?;

    debug!("Detection request received for {} images", request.image_urls.len());
    let start = Instant::now();

    // 3. Process batch; per-image failures are part of the response
    let response = orchestrator.process_batch(&request.image_urls).await;

    info!(
        "Detection complete: {} images, {} failed, {}ms",
        response.images.len(),
        response.failure_count(),
        start.elapsed().as_millis()
    );

    Ok(Json(response))
}

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let detector = state
        .orchestrator()
        .await
        .map(|orchestrator| orchestrator.detector_name().to_string());
    Json(HealthResponse::new(detector))
}

/// GET /v1/amenities - The detector label to amenity vocabulary
pub async fn amenities_handler() -> Json<AmenitiesResponse> {
    Json(AmenitiesResponse::from_vocabulary())
}
