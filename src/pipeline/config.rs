// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for the detection pipeline

use std::env;
use std::path::PathBuf;

use crate::vision::detector::DEFAULT_DETECTION_THRESHOLD;
use crate::vision::image_utils::DEFAULT_MAX_IMAGE_BYTES;
use crate::vision::LabelIds;

/// Detector, annotation and batching settings
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// ONNX detection model (`MODEL_PATH`)
    pub model_path: Option<PathBuf>,
    /// How the model numbers its labels (`DETECTOR_LABEL_IDS`)
    pub label_ids: LabelIds,
    /// Minimum detection confidence (`DETECTION_THRESHOLD`)
    pub detection_threshold: f32,
    /// Font for box labels (`LABEL_FONT_PATH`), system fonts when unset
    pub label_font_path: Option<PathBuf>,
    /// Largest accepted image download (`MAX_IMAGE_BYTES`)
    pub max_image_bytes: usize,
    /// Images processed at once across all concurrent batches, 0 for no limit
    /// (`MAX_CONCURRENT_IMAGES`)
    pub max_concurrent_images: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            label_ids: LabelIds::default(),
            detection_threshold: DEFAULT_DETECTION_THRESHOLD,
            label_font_path: None,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            max_concurrent_images: 0,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            model_path: env::var("MODEL_PATH")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            label_ids: env::var("DETECTOR_LABEL_IDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.label_ids),
            detection_threshold: env::var("DETECTION_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.detection_threshold),
            label_font_path: env::var("LABEL_FONT_PATH")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            max_image_bytes: env::var("MAX_IMAGE_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_image_bytes),
            max_concurrent_images: env::var("MAX_CONCURRENT_IMAGES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_concurrent_images),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.detection_threshold) {
            return Err(format!(
                "DETECTION_THRESHOLD must be between 0.0 and 1.0, got {}",
                self.detection_threshold
            ));
        }
        if self.max_image_bytes == 0 {
            return Err("MAX_IMAGE_BYTES must be greater than 0".to_string());
        }
        if let Some(path) = &self.model_path {
            if !path.exists() {
                return Err(format!("MODEL_PATH does not exist: {}", path.display()));
            }
        }
        Ok(())
    }
}
