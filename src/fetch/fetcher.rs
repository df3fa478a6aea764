// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Retrying image fetcher

use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::config::RetryPolicy;
use super::source::{FetchError, ImageSource};

/// Fetches image bytes with bounded exponential-backoff retry
///
/// Every call gets its own attempt budget; nothing is shared across URLs.
/// When the last attempt fails its error is returned unchanged.
#[derive(Clone)]
pub struct ImageFetcher {
    source: Arc<dyn ImageSource>,
    policy: RetryPolicy,
}

impl std::fmt::Debug for ImageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFetcher")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl ImageFetcher {
    pub fn new(source: Arc<dyn ImageSource>, policy: RetryPolicy) -> Self {
        Self { source, policy }
    }

    /// Fetch `url`, retrying failed attempts up to the policy's budget
    pub async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.source.fetch_bytes(url).await {
                Ok(bytes) => {
                    if attempt > 1 {
                        info!("Fetched {} on attempt {}/{}", url, attempt, max_attempts);
                    }
                    return Ok(bytes);
                }
                Err(e) if !e.is_retryable() => {
                    warn!("Fetch failed for {} without retry: {}", url, e);
                    return Err(e);
                }
                Err(e) if attempt >= max_attempts => {
                    warn!(
                        "Fetch failed for {} after {} attempts: {}",
                        url, attempt, e
                    );
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.policy.delay_after(attempt);
                    warn!(
                        "Fetch attempt {}/{} failed for {}: {}",
                        attempt, max_attempts, url, e
                    );
                    debug!("Waiting {:?} before retrying {}", delay, url);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
