// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Object detection capability
//!
//! The pipeline only depends on the `Detector` trait. `OnnxDetector` binds an
//! RT-DETR ONNX export through ONNX Runtime; tests supply their own
//! implementations.
//!
//! Components:
//! - `coco` - COCO category table used to name model label ids
//! - `preprocessing` - Resize/normalize into the model's NCHW input tensor
//! - `onnx` - ONNX Runtime binding

pub mod coco;
pub mod onnx;
pub mod preprocessing;

use anyhow::Result;
use image::RgbImage;
use serde::{Deserialize, Serialize};

pub use coco::LabelIds;
pub use onnx::OnnxDetector;

/// Confidence threshold applied to every detection call
pub const DEFAULT_DETECTION_THRESHOLD: f32 = 0.5;

/// Axis-aligned box `[xmin, ymin, xmax, ymax]` in original image pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox(pub [f32; 4]);

impl BoundingBox {
    pub fn new(xmin: f32, ymin: f32, xmax: f32, ymax: f32) -> Self {
        Self([xmin, ymin, xmax, ymax])
    }

    pub fn xmin(&self) -> f32 {
        self.0[0]
    }

    pub fn ymin(&self) -> f32 {
        self.0[1]
    }

    pub fn xmax(&self) -> f32 {
        self.0[2]
    }

    pub fn ymax(&self) -> f32 {
        self.0[3]
    }

    pub fn width(&self) -> f32 {
        self.xmax() - self.xmin()
    }

    pub fn height(&self) -> f32 {
        self.ymax() - self.ymin()
    }

    /// Non-empty, finite and inside the non-negative quadrant
    pub fn is_valid(&self) -> bool {
        self.0.iter().all(|v| v.is_finite() && *v >= 0.0)
            && self.xmax() > self.xmin()
            && self.ymax() > self.ymin()
    }

    /// Clamp coordinates to an image of the given size
    pub fn clamp_to(&self, width: u32, height: u32) -> Self {
        let (w, h) = (width as f32, height as f32);
        Self([
            self.xmin().clamp(0.0, w),
            self.ymin().clamp(0.0, h),
            self.xmax().clamp(0.0, w),
            self.ymax().clamp(0.0, h),
        ])
    }
}

/// A labelled detection as returned by a `Detector`, before amenity mapping
#[derive(Debug, Clone, PartialEq)]
pub struct RawDetection {
    /// Detector vocabulary label (COCO category name)
    pub label: String,
    /// Confidence score (0.0-1.0)
    pub score: f32,
    pub bbox: BoundingBox,
}

/// Object detection capability shared by all concurrent pipelines
///
/// Implementations must be side-effect free per call and safe to call from
/// several threads at once; if the backing runtime needs exclusive access the
/// implementation serializes internally. Calls are blocking and are run on the
/// blocking thread pool by the pipeline.
pub trait Detector: Send + Sync {
    /// Model name for logging and health reporting
    fn name(&self) -> &str;

    /// Detect objects with confidence >= `threshold`
    ///
    /// Boxes are expressed in `image`'s own pixel coordinates.
    fn detect(&self, image: &RgbImage, threshold: f32) -> Result<Vec<RawDetection>>;
}
