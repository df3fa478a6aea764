// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for image fetching

use std::env;
use std::time::Duration;

/// Exponential backoff retry policy for a single URL
///
/// The wait before attempt `n + 1` is `multiplier * 2^(n - 1)`, clamped to
/// `[min_delay, max_delay]`. No wait happens before the first attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    pub multiplier: Duration,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            multiplier: Duration::from_secs(1),
            min_delay: Duration::from_secs(4),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Policy that retries without waiting between attempts
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            multiplier: Duration::ZERO,
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Backoff to wait after the given failed attempt (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        let raw = self.multiplier.saturating_mul(1u32 << exponent);
        raw.min(self.max_delay).max(self.min_delay)
    }
}

/// HTTP client and retry settings for `HttpImageSource` / `ImageFetcher`
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub retry: RetryPolicy,
    /// Per-attempt request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum redirects followed per attempt
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            timeout_secs: 30,
            max_redirects: 5,
            user_agent: format!("spotter/{}", crate::version::VERSION_NUMBER),
        }
    }
}

impl FetchConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let secs = |key: &str, fallback: Duration| {
            env::var(key)
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(fallback)
        };

        Self {
            retry: RetryPolicy {
                max_attempts: env::var("FETCH_MAX_ATTEMPTS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.retry.max_attempts),
                multiplier: secs("FETCH_BACKOFF_MULTIPLIER_SECS", defaults.retry.multiplier),
                min_delay: secs("FETCH_BACKOFF_MIN_SECS", defaults.retry.min_delay),
                max_delay: secs("FETCH_BACKOFF_MAX_SECS", defaults.retry.max_delay),
            },
            timeout_secs: env::var("FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_secs),
            ..defaults
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.retry.max_attempts == 0 {
            return Err("FETCH_MAX_ATTEMPTS must be at least 1".to_string());
        }
        if self.retry.min_delay > self.retry.max_delay {
            return Err(format!(
                "Backoff floor ({:?}) exceeds ceiling ({:?})",
                self.retry.min_delay, self.retry.max_delay
            ));
        }
        if self.timeout_secs == 0 {
            return Err("FETCH_TIMEOUT_SECS must be greater than 0".to_string());
        }
        Ok(())
    }
}
