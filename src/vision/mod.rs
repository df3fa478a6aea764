// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing for amenity detection
//!
//! This module provides:
//! - Object detection behind the `Detector` trait (RT-DETR via ONNX Runtime)
//! - The detector label to amenity vocabulary
//! - Box and label annotation of images
//! - Image decoding and JPEG/base64 encoding
//!
//! Everything here is synchronous and CPU bound; the pipeline runs it on the
//! blocking thread pool.

pub mod amenities;
pub mod annotate;
pub mod detector;
pub mod image_utils;

pub use amenities::{amenity_for, AMENITY_VOCABULARY};
pub use annotate::Annotator;
pub use detector::{BoundingBox, Detector, LabelIds, OnnxDetector, RawDetection};
pub use image_utils::{decode_image_bytes, encode_jpeg_base64, to_rgb, ImageError, ImageInfo};
