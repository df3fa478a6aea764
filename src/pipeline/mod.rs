// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Amenity detection pipeline
//!
//! `ImageProcessor` runs one URL through fetch, decode, detect, amenity
//! mapping, annotation and encoding. `BatchOrchestrator` runs many URLs
//! concurrently and aggregates the amenity summary.

pub mod batch;
pub mod config;
pub mod processor;
pub mod types;

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::fetch::{FetchConfig, HttpImageSource, ImageFetcher};
use crate::vision::{Annotator, Detector};

pub use batch::BatchOrchestrator;
pub use config::PipelineConfig;
pub use processor::{analyze_image, ImageProcessor, HTTP_ERROR_PREFIX, PROCESSING_ERROR_PREFIX};
pub use types::{
    describe_amenities, Detection, DetectionResponse, ImageResult, NO_AMENITIES_DESCRIPTION,
};

/// Wire a detector into an orchestrator that fetches over HTTP
pub fn build_orchestrator(
    detector: Arc<dyn Detector>,
    fetch_config: &FetchConfig,
    pipeline_config: &PipelineConfig,
) -> Result<BatchOrchestrator> {
    let source = HttpImageSource::new(fetch_config)
        .context("Failed to create HTTP client")?
        .with_max_bytes(pipeline_config.max_image_bytes);
    let fetcher = ImageFetcher::new(Arc::new(source), fetch_config.retry.clone());
    let annotator = Annotator::new(pipeline_config.label_font_path.as_deref());

    let processor = ImageProcessor::new(fetcher, detector, Arc::new(annotator), pipeline_config);

    Ok(BatchOrchestrator::new(
        processor,
        pipeline_config.max_concurrent_images,
    ))
}
