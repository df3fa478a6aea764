// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Single-attempt image byte sources

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use super::config::FetchConfig;
use crate::vision::image_utils::DEFAULT_MAX_IMAGE_BYTES;

/// Errors raised while retrieving image bytes
///
/// Transport failures (`Timeout`, `Transport`, `Body`) are kept distinct from
/// protocol-level failures (`Status`, `TooLarge`) so callers can tell them apart.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    #[error("Timeout fetching {url}")]
    Timeout { url: String },

    #[error("Transport error fetching {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Status {status} {reason} for url '{url}'")]
    Status {
        status: u16,
        reason: String,
        url: String,
    },

    #[error("Failed to read response body from {url}: {message}")]
    Body { url: String, message: String },

    #[error("Response from {url} exceeds {limit} bytes")]
    TooLarge { url: String, limit: usize },
}

impl FetchError {
    /// HTTP status code, when the server answered with a non-2xx response
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for failures below the HTTP protocol level
    pub fn is_transport(&self) -> bool {
        !matches!(self, FetchError::Status { .. } | FetchError::TooLarge { .. })
    }

    /// Oversized bodies will not shrink on another attempt
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FetchError::TooLarge { .. })
    }
}

/// A source of raw image bytes, one attempt per call
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetch the bytes behind `url` once, without retrying
    async fn fetch_bytes(&self, url: &str) -> Result<Bytes, FetchError>;
}

/// reqwest-backed source; the client's connection pool is shared by all
/// concurrent pipelines
///
/// Bodies are streamed and abandoned as soon as they pass `max_bytes`.
#[derive(Clone)]
pub struct HttpImageSource {
    client: Client,
    max_bytes: usize,
}

impl std::fmt::Debug for HttpImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpImageSource")
            .field("max_bytes", &self.max_bytes)
            .finish_non_exhaustive()
    }
}

impl HttpImageSource {
    /// Build a source with its own HTTP client
    pub fn new(config: &FetchConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self {
            client,
            max_bytes: DEFAULT_MAX_IMAGE_BYTES,
        })
    }

    /// Cap the accepted body size
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    fn body_error(url: &str, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Body {
                url: url.to_string(),
                message: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch_bytes(&self, url: &str) -> Result<Bytes, FetchError> {
        debug!("Fetching image from: {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Transport {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
                url: url.to_string(),
            });
        }

        let too_large = || FetchError::TooLarge {
            url: url.to_string(),
            limit: self.max_bytes,
        };

        let declared = response.content_length();
        if declared.is_some_and(|len| len > self.max_bytes as u64) {
            warn!(
                "Refusing {}: declared {} bytes, limit {}",
                url,
                declared.unwrap_or_default(),
                self.max_bytes
            );
            return Err(too_large());
        }

        let capacity = declared.map_or(0, |len| len as usize);
        let mut body = BytesMut::with_capacity(capacity);
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Self::body_error(url, e))?;
            if body.len() + chunk.len() > self.max_bytes {
                warn!("Aborting {}: body passed {} bytes", url, self.max_bytes);
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }

        debug!("Fetched {} bytes from: {}", body.len(), url);
        Ok(body.freeze())
    }
}
