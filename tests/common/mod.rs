// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared mocks for pipeline and API tests

#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use image::{ImageFormat, Rgb, RgbImage};
use spotter::fetch::{FetchError, ImageFetcher, ImageSource, RetryPolicy};
use spotter::pipeline::{BatchOrchestrator, ImageProcessor, PipelineConfig};
use spotter::vision::{Annotator, BoundingBox, Detector, RawDetection};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// PNG of the given size; the width doubles as the image's identity for
/// `WidthDetector`
pub fn png_bytes(width: u32, height: u32) -> Bytes {
    let img = RgbImage::from_pixel(width, height, Rgb([200, 180, 160]));
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Png)
        .expect("encode test png");
    Bytes::from(buffer.into_inner())
}

pub fn not_found(url: &str) -> FetchError {
    FetchError::Status {
        status: 404,
        reason: "Not Found".to_string(),
        url: url.to_string(),
    }
}

pub fn connection_reset(url: &str) -> FetchError {
    FetchError::Transport {
        url: url.to_string(),
        message: "connection reset by peer".to_string(),
    }
}

/// What `ScriptedSource` does for one URL
#[derive(Clone)]
pub enum Script {
    /// Serve the bytes after an optional delay
    Serve { bytes: Bytes, delay: Duration },
    /// Fail this many calls, then serve the bytes
    FailThenServe { failures: u32, bytes: Bytes },
    /// Fail every call
    AlwaysFail(FetchError),
}

impl Script {
    pub fn serve(bytes: Bytes) -> Self {
        Script::Serve {
            bytes,
            delay: Duration::ZERO,
        }
    }

    pub fn serve_after(bytes: Bytes, delay_ms: u64) -> Self {
        Script::Serve {
            bytes,
            delay: Duration::from_millis(delay_ms),
        }
    }
}

/// In-memory `ImageSource` that counts calls per URL and tracks peak
/// concurrency
#[derive(Default)]
pub struct ScriptedSource {
    scripts: HashMap<String, Script>,
    calls: Mutex<HashMap<String, u32>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, script: Script) -> Self {
        self.scripts.insert(url.to_string(), script);
        self
    }

    pub fn calls(&self, url: &str) -> u32 {
        self.calls
            .lock()
            .expect("calls lock")
            .get(url)
            .copied()
            .unwrap_or(0)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageSource for ScriptedSource {
    async fn fetch_bytes(&self, url: &str) -> Result<Bytes, FetchError> {
        let call = {
            let mut calls = self.calls.lock().expect("calls lock");
            let count = calls.entry(url.to_string()).or_insert(0);
            *count += 1;
            *count
        };

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);

        let result = match self.scripts.get(url) {
            Some(Script::Serve { bytes, delay }) => {
                if !delay.is_zero() {
                    tokio::time::sleep(*delay).await;
                }
                Ok(bytes.clone())
            }
            Some(Script::FailThenServe { failures, bytes }) => {
                if call <= *failures {
                    Err(connection_reset(url))
                } else {
                    Ok(bytes.clone())
                }
            }
            Some(Script::AlwaysFail(error)) => Err(error.clone()),
            None => Err(not_found(url)),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

pub fn raw(label: &str, bbox: [f32; 4]) -> RawDetection {
    RawDetection {
        label: label.to_string(),
        score: 0.9,
        bbox: BoundingBox(bbox),
    }
}

/// Detector whose output is keyed by the decoded image width
#[derive(Default)]
pub struct WidthDetector {
    by_width: HashMap<u32, Vec<RawDetection>>,
    calls: AtomicU32,
}

impl WidthDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, width: u32, detections: Vec<RawDetection>) -> Self {
        self.by_width.insert(width, detections);
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Detector for WidthDetector {
    fn name(&self) -> &str {
        "width-detector"
    }

    fn detect(&self, image: &RgbImage, _threshold: f32) -> Result<Vec<RawDetection>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .by_width
            .get(&image.width())
            .cloned()
            .unwrap_or_default())
    }
}

/// Orchestrator over mocks, retrying without backoff
pub fn orchestrator(
    source: Arc<ScriptedSource>,
    detector: Arc<WidthDetector>,
    max_concurrent: usize,
) -> BatchOrchestrator {
    let fetcher = ImageFetcher::new(source, RetryPolicy::immediate(3));
    let config = PipelineConfig {
        max_concurrent_images: max_concurrent,
        ..PipelineConfig::default()
    };
    let processor = ImageProcessor::new(
        fetcher,
        detector,
        Arc::new(Annotator::boxes_only()),
        &config,
    );
    BatchOrchestrator::new(processor, config.max_concurrent_images)
}

pub fn urls(list: &[&str]) -> Vec<String> {
    list.iter().map(|url| url.to_string()).collect()
}
