// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod config;
pub mod detect;
pub mod errors;
pub mod http_server;

pub use config::ServerConfig;
pub use detect::{AmenitiesResponse, DetectionRequest, HealthResponse};
pub use errors::{ApiError, ErrorResponse};
pub use http_server::{create_app, start_server, AppState};
