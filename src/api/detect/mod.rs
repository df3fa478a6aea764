// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Amenity detection endpoint module
//!
//! Provides POST /v1/detect (also mounted at POST /) for detecting amenities
//! in a batch of image URLs.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{amenities_handler, detect_handler, health_handler};
pub use request::DetectionRequest;
pub use response::{AmenitiesResponse, HealthResponse};
