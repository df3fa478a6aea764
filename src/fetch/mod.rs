// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image retrieval over HTTP
//!
//! Components:
//! - `source` - Single-attempt byte sources (`ImageSource`, reqwest-backed `HttpImageSource`)
//! - `fetcher` - `ImageFetcher`, which wraps a source with bounded exponential-backoff retry
//! - `config` - Retry policy and HTTP client settings loaded from the environment

pub mod config;
pub mod fetcher;
pub mod source;

pub use config::{FetchConfig, RetryPolicy};
pub use fetcher::ImageFetcher;
pub use source::{FetchError, HttpImageSource, ImageSource};
