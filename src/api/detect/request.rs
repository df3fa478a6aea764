// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection request types and validation

use serde::{Deserialize, Serialize};
use url::Url;

use crate::api::errors::ApiError;

/// URL schemes the fetcher can retrieve
const SUPPORTED_SCHEMES: &[&str] = &["http", "https"];

/// Request for amenity detection over a batch of image URLs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionRequest {
    /// Images to analyze, results come back in the same order
    pub image_urls: Vec<String>,
}

impl DetectionRequest {
    /// Validate every URL before any image is processed
    pub fn validate(&self) -> Result<(), ApiError> {
        for (index, raw) in self.image_urls.iter().enumerate() {
            let field = format!("image_urls[{}]", index);

            let url = Url::parse(raw).map_err(|e| ApiError::ValidationError {
                field: field.clone(),
                message: format!("invalid URL '{}': {}", raw, e),
            })?;

            if !SUPPORTED_SCHEMES.contains(&url.scheme()) {
                return Err(ApiError::ValidationError {
                    field,
                    message: format!(
                        "unsupported URL scheme '{}', supported: {:?}",
                        url.scheme(),
                        SUPPORTED_SCHEMES
                    ),
                });
            }

            if url.host_str().map_or(true, str::is_empty) {
                return Err(ApiError::ValidationError {
                    field,
                    message: format!("URL '{}' has no host", raw),
                });
            }
        }

        Ok(())
    }
}
