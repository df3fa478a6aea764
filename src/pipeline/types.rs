// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection results as returned to callers

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::vision::BoundingBox;

/// Summary used when no image produced a mapped amenity
pub const NO_AMENITIES_DESCRIPTION: &str = "No relevant amenities detected.";

/// One mapped detection: amenity name plus box in original image pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Amenity name (not the raw detector label)
    pub label: String,
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
}

impl Detection {
    pub fn new(label: impl Into<String>, bbox: BoundingBox) -> Self {
        Self {
            label: label.into(),
            bbox,
        }
    }
}

/// Outcome of processing one URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageResult {
    Success {
        url: String,
        detections: Vec<Detection>,
        /// Annotated image, JPEG encoded as standard base64
        #[serde(rename = "labeled_image_base64")]
        annotated_image: String,
    },
    Failure {
        url: String,
        error: String,
    },
}

impl ImageResult {
    pub fn success(url: impl Into<String>, detections: Vec<Detection>, annotated_image: String) -> Self {
        ImageResult::Success {
            url: url.into(),
            detections,
            annotated_image,
        }
    }

    pub fn failure(url: impl Into<String>, error: impl Into<String>) -> Self {
        ImageResult::Failure {
            url: url.into(),
            error: error.into(),
        }
    }

    pub fn url(&self) -> &str {
        match self {
            ImageResult::Success { url, .. } | ImageResult::Failure { url, .. } => url,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ImageResult::Success { .. })
    }

    /// Mapped detections; empty for failures
    pub fn detections(&self) -> &[Detection] {
        match self {
            ImageResult::Success { detections, .. } => detections,
            ImageResult::Failure { .. } => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ImageResult::Failure { error, .. } => Some(error),
            ImageResult::Success { .. } => None,
        }
    }
}

/// Response for a whole batch, `images` in request order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResponse {
    pub amenities_description: String,
    pub images: Vec<ImageResult>,
}

impl DetectionResponse {
    /// Build the response and its amenity summary from per-image results
    pub fn from_results(images: Vec<ImageResult>) -> Self {
        Self {
            amenities_description: describe_amenities(&images),
            images,
        }
    }

    pub fn success_count(&self) -> usize {
        self.images.iter().filter(|image| image.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.images.len() - self.success_count()
    }
}

/// Distinct amenities across all successful results, sorted
pub fn collect_amenities(images: &[ImageResult]) -> BTreeSet<&str> {
    images
        .iter()
        .flat_map(|image| image.detections())
        .map(|detection| detection.label.as_str())
        .collect()
}

/// Render the batch summary sentence
pub fn describe_amenities(images: &[ImageResult]) -> String {
    let amenities = collect_amenities(images);
    if amenities.is_empty() {
        return NO_AMENITIES_DESCRIPTION.to_string();
    }

    let joined = amenities.into_iter().collect::<Vec<_>>().join(", ");
    format!("The property contains: {}.", joined)
}
