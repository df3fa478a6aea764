// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-image pipeline: fetch, decode, detect, map, annotate, encode

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use super::config::PipelineConfig;
use super::types::{Detection, ImageResult};
use crate::fetch::ImageFetcher;
use crate::vision::{
    amenity_for, decode_image_bytes, encode_jpeg_base64, to_rgb, Annotator, Detector,
};

/// Prefix of failures raised while fetching
pub const HTTP_ERROR_PREFIX: &str = "HTTP Error: ";
/// Prefix of failures raised after a successful fetch
pub const PROCESSING_ERROR_PREFIX: &str = "Processing Error: ";

/// Runs the full pipeline for one URL
///
/// Holds only shared read-only handles, so one processor serves every
/// concurrent image of every batch.
#[derive(Clone)]
pub struct ImageProcessor {
    fetcher: ImageFetcher,
    detector: Arc<dyn Detector>,
    annotator: Arc<Annotator>,
    threshold: f32,
    max_image_bytes: usize,
}

impl std::fmt::Debug for ImageProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageProcessor")
            .field("detector", &self.detector.name())
            .field("threshold", &self.threshold)
            .field("max_image_bytes", &self.max_image_bytes)
            .finish_non_exhaustive()
    }
}

impl ImageProcessor {
    pub fn new(
        fetcher: ImageFetcher,
        detector: Arc<dyn Detector>,
        annotator: Arc<Annotator>,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            fetcher,
            detector,
            annotator,
            threshold: config.detection_threshold,
            max_image_bytes: config.max_image_bytes,
        }
    }

    pub fn detector_name(&self) -> &str {
        self.detector.name()
    }

    /// Process one URL; every error becomes a `Failure` result
    pub async fn process_image(&self, url: &str) -> ImageResult {
        let start = Instant::now();

        let bytes = match self.fetcher.fetch(url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Giving up on {}: {}", url, e);
                return ImageResult::failure(url, format!("{}{}", HTTP_ERROR_PREFIX, e));
            }
        };
        debug!("Fetched {} bytes from {}", bytes.len(), url);

        let detector = Arc::clone(&self.detector);
        let annotator = Arc::clone(&self.annotator);
        let threshold = self.threshold;
        let max_image_bytes = self.max_image_bytes;

        let outcome = tokio::task::spawn_blocking(move || {
            analyze_image(
                &bytes,
                detector.as_ref(),
                &annotator,
                threshold,
                max_image_bytes,
            )
        })
        .await;

        match outcome {
            Ok(Ok((detections, annotated_image))) => {
                debug!(
                    "Processed {} in {}ms: {} amenity detections",
                    url,
                    start.elapsed().as_millis(),
                    detections.len()
                );
                ImageResult::success(url, detections, annotated_image)
            }
            Ok(Err(e)) => {
                warn!("Processing failed for {}: {:#}", url, e);
                ImageResult::failure(url, format!("{}{}\n{:?}", PROCESSING_ERROR_PREFIX, e, e))
            }
            Err(e) => {
                warn!("Processing task for {} did not complete: {}", url, e);
                ImageResult::failure(url, format!("{}{}\n{:?}", PROCESSING_ERROR_PREFIX, e, e))
            }
        }
    }
}

/// Decode, detect, map, annotate and encode one fetched image
///
/// Blocking; returns the mapped detections in detector order and the
/// annotated image as base64 JPEG.
pub fn analyze_image(
    bytes: &[u8],
    detector: &dyn Detector,
    annotator: &Annotator,
    threshold: f32,
    max_image_bytes: usize,
) -> Result<(Vec<Detection>, String)> {
    let (image, info) =
        decode_image_bytes(bytes, max_image_bytes).context("Failed to decode image")?;
    let mut image = to_rgb(image);
    debug!("Decoded {:?} image {}x{}", info.format, info.width, info.height);

    let raw = detector
        .detect(&image, threshold)
        .with_context(|| format!("Detector '{}' failed", detector.name()))?;

    let (width, height) = image.dimensions();
    let detections: Vec<Detection> = raw
        .into_iter()
        .filter_map(|detection| {
            let amenity = amenity_for(&detection.label)?;
            let bbox = detection.bbox.clamp_to(width, height);
            if !bbox.is_valid() {
                debug!("Dropping degenerate box for '{}'", detection.label);
                return None;
            }
            Some(Detection::new(amenity, bbox))
        })
        .collect();

    annotator.annotate(
        &mut image,
        detections.iter().map(|d| (d.label.as_str(), &d.bbox)),
    );

    let encoded = encode_jpeg_base64(&image).context("Failed to encode annotated image")?;

    Ok((detections, encoded))
}
