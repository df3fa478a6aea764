// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Batch orchestration: ordering, completeness, isolation and the amenity
//! summary

use crate::common::{not_found, orchestrator, png_bytes, raw, urls, Script, ScriptedSource, WidthDetector};
use spotter::pipeline::{ImageResult, HTTP_ERROR_PREFIX, NO_AMENITIES_DESCRIPTION};
use std::sync::Arc;

#[tokio::test]
async fn test_results_follow_request_order() {
    // First URL finishes last
    let source = Arc::new(
        ScriptedSource::new()
            .with("https://img/1.jpg", Script::serve_after(png_bytes(31, 20), 120))
            .with("https://img/2.jpg", Script::serve_after(png_bytes(32, 20), 60))
            .with("https://img/3.jpg", Script::serve(png_bytes(33, 20))),
    );
    let detector = Arc::new(WidthDetector::new());
    let batch = orchestrator(source, detector, 0);

    let input = urls(&["https://img/1.jpg", "https://img/2.jpg", "https://img/3.jpg"]);
    let response = batch.process_batch(&input).await;

    assert_eq!(response.images.len(), input.len());
    for (result, url) in response.images.iter().zip(&input) {
        assert_eq!(result.url(), url);
        assert!(result.is_success());
    }
}

#[tokio::test]
async fn test_all_failures_still_complete() {
    let source = Arc::new(
        ScriptedSource::new()
            .with("https://img/a.jpg", Script::AlwaysFail(not_found("https://img/a.jpg")))
            .with("https://img/b.jpg", Script::AlwaysFail(not_found("https://img/b.jpg"))),
    );
    let detector = Arc::new(WidthDetector::new());
    let batch = orchestrator(source, detector.clone(), 0);

    let input = urls(&["https://img/a.jpg", "https://img/b.jpg", "https://img/c.jpg"]);
    let response = batch.process_batch(&input).await;

    assert_eq!(response.images.len(), 3);
    for result in &response.images {
        let error = result.error().expect("failure");
        assert!(error.starts_with(HTTP_ERROR_PREFIX), "{}", error);
    }
    assert_eq!(response.amenities_description, NO_AMENITIES_DESCRIPTION);
    assert_eq!(detector.calls(), 0);
}

#[tokio::test]
async fn test_failing_url_does_not_affect_siblings() {
    let source = Arc::new(
        ScriptedSource::new()
            .with("https://img/ok-1.jpg", Script::serve(png_bytes(40, 30)))
            .with("https://img/broken.jpg", Script::AlwaysFail(not_found("https://img/broken.jpg")))
            .with("https://img/ok-2.jpg", Script::serve(png_bytes(41, 30))),
    );
    let detector = Arc::new(
        WidthDetector::new()
            .with(40, vec![raw("bed", [1.0, 1.0, 20.0, 20.0])])
            .with(41, vec![raw("toilet", [2.0, 2.0, 30.0, 25.0])]),
    );
    let batch = orchestrator(source, detector, 0);

    let response = batch
        .process_batch(&urls(&["https://img/ok-1.jpg", "https://img/broken.jpg", "https://img/ok-2.jpg"]))
        .await;

    assert!(response.images[0].is_success());
    assert!(!response.images[1].is_success());
    assert!(response.images[2].is_success());
    assert_eq!(response.images[0].detections()[0].label, "bed");
    assert_eq!(response.images[2].detections()[0].label, "bathroom");
    assert_eq!(
        response.amenities_description,
        "The property contains: bathroom, bed."
    );
}

#[tokio::test]
async fn test_amenity_union_across_images() {
    let source = Arc::new(
        ScriptedSource::new()
            .with("https://img/living.jpg", Script::serve(png_bytes(50, 40)))
            .with("https://img/bedroom.jpg", Script::serve(png_bytes(51, 40))),
    );
    let detector = Arc::new(
        WidthDetector::new()
            .with(
                50,
                vec![raw("tv", [1.0, 1.0, 10.0, 10.0]), raw("couch", [10.0, 10.0, 40.0, 30.0])],
            )
            .with(
                51,
                vec![raw("couch", [1.0, 1.0, 20.0, 20.0]), raw("bed", [5.0, 5.0, 45.0, 35.0])],
            ),
    );
    let batch = orchestrator(source, detector, 0);

    let response = batch
        .process_batch(&urls(&["https://img/living.jpg", "https://img/bedroom.jpg"]))
        .await;

    assert_eq!(
        response.amenities_description,
        "The property contains: TV, bed, sofa."
    );
}

#[tokio::test]
async fn test_batch_without_mappable_detections() {
    let source = Arc::new(
        ScriptedSource::new()
            .with("https://img/1.jpg", Script::serve(png_bytes(60, 40)))
            .with("https://img/2.jpg", Script::serve(png_bytes(61, 40))),
    );
    let detector = Arc::new(
        WidthDetector::new().with(60, vec![raw("person", [1.0, 1.0, 10.0, 10.0])]),
    );
    let batch = orchestrator(source, detector, 0);

    let response = batch
        .process_batch(&urls(&["https://img/1.jpg", "https://img/2.jpg"]))
        .await;

    assert_eq!(response.success_count(), 2);
    assert_eq!(response.amenities_description, NO_AMENITIES_DESCRIPTION);
}

#[tokio::test]
async fn test_empty_batch() {
    let batch = orchestrator(Arc::new(ScriptedSource::new()), Arc::new(WidthDetector::new()), 0);
    let response = batch.process_batch(&[]).await;
    assert!(response.images.is_empty());
    assert_eq!(response.amenities_description, NO_AMENITIES_DESCRIPTION);
}

#[tokio::test]
async fn test_duplicate_urls_processed_independently() {
    let source = Arc::new(
        ScriptedSource::new().with("https://img/same.jpg", Script::serve(png_bytes(70, 40))),
    );
    let detector = Arc::new(WidthDetector::new());
    let batch = orchestrator(source.clone(), detector, 0);

    let response = batch
        .process_batch(&urls(&["https://img/same.jpg", "https://img/same.jpg"]))
        .await;

    assert_eq!(response.images.len(), 2);
    assert_eq!(source.calls("https://img/same.jpg"), 2);
}

#[tokio::test]
async fn test_unbounded_batch_runs_all_images_at_once() {
    let mut source = ScriptedSource::new();
    let mut input = Vec::new();
    for i in 0..6 {
        let url = format!("https://img/{}.jpg", i);
        source = source.with(&url, Script::serve_after(png_bytes(20, 20), 80));
        input.push(url);
    }
    let source = Arc::new(source);
    let batch = orchestrator(source.clone(), Arc::new(WidthDetector::new()), 0);

    let response = batch.process_batch(&input).await;

    assert_eq!(response.success_count(), 6);
    assert_eq!(source.peak_in_flight(), 6);
}

#[tokio::test]
async fn test_bounded_batch_limits_in_flight_images() {
    let mut source = ScriptedSource::new();
    let mut input = Vec::new();
    for i in 0..6 {
        let url = format!("https://img/{}.jpg", i);
        source = source.with(&url, Script::serve_after(png_bytes(20, 20), 40));
        input.push(url);
    }
    let source = Arc::new(source);
    let batch = orchestrator(source.clone(), Arc::new(WidthDetector::new()), 2);
    assert_eq!(batch.max_concurrent(), 2);

    let response = batch.process_batch(&input).await;

    assert_eq!(response.success_count(), 6);
    assert!(source.peak_in_flight() <= 2);
    for (result, url) in response.images.iter().zip(&input) {
        assert_eq!(result.url(), url);
    }
}

#[tokio::test]
async fn test_limit_shared_across_concurrent_batches() {
    let mut source = ScriptedSource::new();
    let mut first = Vec::new();
    let mut second = Vec::new();
    for i in 0..4 {
        let url = format!("https://img/shared-{}.jpg", i);
        source = source.with(&url, Script::serve_after(png_bytes(20, 20), 60));
        if i < 2 {
            first.push(url);
        } else {
            second.push(url);
        }
    }
    let source = Arc::new(source);
    let batch = orchestrator(source.clone(), Arc::new(WidthDetector::new()), 2);
    let other = batch.clone();

    let (a, b) = tokio::join!(batch.process_batch(&first), other.process_batch(&second));

    assert_eq!(a.success_count(), 2);
    assert_eq!(b.success_count(), 2);
    assert!(source.peak_in_flight() <= 2, "peak {}", source.peak_in_flight());
}

#[tokio::test]
async fn test_response_serializes_untagged_results() {
    let source = Arc::new(
        ScriptedSource::new().with("https://img/ok.jpg", Script::serve(png_bytes(30, 30))),
    );
    let batch = orchestrator(source, Arc::new(WidthDetector::new()), 0);

    let response = batch
        .process_batch(&urls(&["https://img/ok.jpg", "https://img/missing.jpg"]))
        .await;
    let json = serde_json::to_value(&response).unwrap();

    assert!(json["images"][0]["labeled_image_base64"].is_string());
    assert_eq!(json["images"][0]["detections"], serde_json::json!([]));
    assert!(json["images"][1]["error"].is_string());
    assert!(json["images"][1].get("detections").is_none());

    let parsed: spotter::pipeline::DetectionResponse = serde_json::from_value(json).unwrap();
    assert!(matches!(parsed.images[0], ImageResult::Success { .. }));
    assert!(matches!(parsed.images[1], ImageResult::Failure { .. }));
}
