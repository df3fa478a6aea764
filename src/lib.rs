// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod fetch;
pub mod pipeline;
pub mod version;
pub mod vision;

// Re-export main types
pub use fetch::{FetchConfig, FetchError, ImageFetcher, RetryPolicy};
pub use pipeline::{BatchOrchestrator, DetectionResponse, ImageResult, PipelineConfig};
pub use vision::{Detector, OnnxDetector};
