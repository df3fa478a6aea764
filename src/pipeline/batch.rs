// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Concurrent batch processing with per-image isolation

use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, info};

use super::processor::ImageProcessor;
use super::types::{DetectionResponse, ImageResult};

/// Fans a batch of URLs out to the per-image pipeline and gathers results
///
/// Every URL runs independently: failures are captured per image and never
/// cancel siblings. Results keep request order. The concurrency bound is
/// one pool of permits shared by every batch this orchestrator (and its
/// clones) runs.
#[derive(Debug, Clone)]
pub struct BatchOrchestrator {
    processor: Arc<ImageProcessor>,
    limiter: Option<Arc<Semaphore>>,
    max_concurrent: usize,
}

impl BatchOrchestrator {
    /// Create an orchestrator; `max_concurrent` caps in-flight images across
    /// all batches, 0 runs every image at once
    pub fn new(processor: ImageProcessor, max_concurrent: usize) -> Self {
        let limiter = (max_concurrent > 0).then(|| Arc::new(Semaphore::new(max_concurrent)));
        Self {
            processor: Arc::new(processor),
            limiter,
            max_concurrent,
        }
    }

    pub fn detector_name(&self) -> &str {
        self.processor.detector_name()
    }

    /// Concurrency bound, 0 when unbounded
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Process every URL and summarize the amenities found
    pub async fn process_batch(&self, urls: &[String]) -> DetectionResponse {
        let start = Instant::now();
        debug!("Processing batch of {} images", urls.len());

        let images: Vec<ImageResult> =
            join_all(urls.iter().map(|url| self.process_one(url))).await;

        let response = DetectionResponse::from_results(images);

        info!(
            "Batch of {} images done in {}ms: {} succeeded, {} failed",
            urls.len(),
            start.elapsed().as_millis(),
            response.success_count(),
            response.failure_count()
        );

        response
    }

    async fn process_one(&self, url: &str) -> ImageResult {
        // Never closed; an Err here would only mean running without a permit
        let _permit = match &self.limiter {
            Some(limiter) => limiter.acquire().await.ok(),
            None => None,
        };

        self.processor.process_image(url).await
    }
}
