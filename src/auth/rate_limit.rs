// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signin rate limiting.
//!
//! Attempts are counted per client key in a sliding window, with an
//! additional minimum interval between two consecutive attempts. Keys are
//! HMAC-SHA256 digests of the client IP so raw addresses are never held in
//! memory.

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use alloy::hex;
use async_trait::async_trait;
use hmac::{digest::InvalidLength, Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::config::RateLimitConfig;

type HmacSha256 = Hmac<Sha256>;

/// Rate limiter rejection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateLimitError {
    #[error("too many attempts, retry in {retry_after:?}")]
    TooManyAttempts { retry_after: Duration },
    #[error("attempts too close together")]
    TooFrequent,
}

/// Throttles repeated authentication attempts per caller.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Record an attempt for `key`, failing if the caller is over its budget.
    async fn limit(&self, key: &str) -> Result<(), RateLimitError>;
}

#[derive(Debug, Default)]
struct Attempts {
    hits: Vec<Instant>,
}

/// In-process sliding-window limiter.
#[derive(Debug)]
pub struct SlidingWindowLimiter {
    config: RateLimitConfig,
    store: Mutex<HashMap<String, Attempts>>,
}

impl SlidingWindowLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            store: Mutex::new(HashMap::new()),
        }
    }

    fn check(&self, attempts: &mut Attempts, now: Instant) -> Result<(), RateLimitError> {
        let window = self.config.window;
        attempts
            .hits
            .retain(|hit| now.saturating_duration_since(*hit) < window);

        if let Some(last) = attempts.hits.last() {
            if now.saturating_duration_since(*last) < self.config.min_interval {
                return Err(RateLimitError::TooFrequent);
            }
        }

        if attempts.hits.len() >= self.config.max_attempts {
            let oldest = attempts.hits.first().copied().unwrap_or(now);
            let retry_after = window.saturating_sub(now.saturating_duration_since(oldest));
            return Err(RateLimitError::TooManyAttempts { retry_after });
        }

        attempts.hits.push(now);
        Ok(())
    }
}

#[async_trait]
impl RateLimiter for SlidingWindowLimiter {
    async fn limit(&self, key: &str) -> Result<(), RateLimitError> {
        let now = Instant::now();
        let mut store = self.store.lock().await;

        // Drop keys whose whole window has elapsed.
        let window = self.config.window;
        store.retain(|_, attempts| {
            attempts
                .hits
                .last()
                .is_some_and(|last| now.saturating_duration_since(*last) < window)
        });

        let attempts = store.entry(key.to_string()).or_default();
        self.check(attempts, now)
    }
}

/// Derive the limiter key for a client IP.
pub fn client_key(secret: &[u8], client_ip: &str) -> Result<String, InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(secret)?;
    mac.update(client_ip.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}
