// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Response types for the detection service endpoints

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use crate::pipeline::{Detection, DetectionResponse, ImageResult};

/// GET /health
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    /// "healthy" when a detector is loaded, "degraded" otherwise
    pub status: String,
    pub version: String,
    /// Detector model name, when loaded
    pub detector: Option<String>,
    pub detector_loaded: bool,
}

impl HealthResponse {
    pub fn new(detector: Option<String>) -> Self {
        let detector_loaded = detector.is_some();
        Self {
            status: if detector_loaded { "healthy" } else { "degraded" }.to_string(),
            version: crate::version::VERSION_NUMBER.to_string(),
            detector,
            detector_loaded,
        }
    }
}

/// GET /v1/amenities: detector label -> amenity name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AmenitiesResponse {
    pub amenities: BTreeMap<String, String>,
}

impl AmenitiesResponse {
    pub fn from_vocabulary() -> Self {
        Self {
            amenities: crate::vision::amenities::vocabulary()
                .into_iter()
                .map(|(label, amenity)| (label.to_string(), amenity.to_string()))
                .collect(),
        }
    }
}
