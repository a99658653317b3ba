// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fixed-window rate limiter for photograph submissions.
//!
//! Each client key owns a bucket holding a request count and the instant its
//! window ends. Buckets are created lazily, and every check first sweeps all
//! expired buckets out of the store, so a key whose window has elapsed always
//! starts over with a fresh window.
//!
//! Buckets live in an injected [`BucketStore`]. [`MemoryStore`] keeps them in
//! process memory, which means each process enforces its own quota.

use crate::config::RateLimitConfig;
use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Outcome of a rate limit evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitResult {
    /// Whether the request fits in the current window
    pub success: bool,
    /// Maximum requests per window
    pub limit: u32,
    /// Requests left in the current window
    pub remaining: u32,
    /// When the current window ends
    pub reset_time: DateTime<Utc>,
}

impl RateLimitResult {
    /// Whole seconds until the window resets, rounded up and never negative.
    pub fn retry_after_secs(&self, now: DateTime<Utc>) -> u64 {
        let millis = (self.reset_time - now).num_milliseconds();
        if millis <= 0 {
            0
        } else {
            (millis as u64).div_ceil(1000)
        }
    }
}

/// Per-key request counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// Requests counted in the current window
    pub count: u32,
    /// End of the current window
    pub reset_time: DateTime<Utc>,
}

/// Storage for rate limit buckets.
///
/// `update` must run the whole sweep/lookup/mutate sequence under exclusive
/// access so concurrent requests for one key cannot both pass the last slot.
pub trait BucketStore: Send + Sync {
    /// Remove buckets with `reset_time <= now`, fetch or create the bucket for
    /// `key` (a new bucket ends at `fresh_reset`), and apply `f` to it.
    fn update<R, F>(&self, key: &str, now: DateTime<Utc>, fresh_reset: DateTime<Utc>, f: F) -> R
    where
        F: FnOnce(&mut Bucket) -> R;

    /// Number of live buckets.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-local bucket store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    buckets: Mutex<HashMap<String, Bucket>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BucketStore for MemoryStore {
    fn update<R, F>(&self, key: &str, now: DateTime<Utc>, fresh_reset: DateTime<Utc>, f: F) -> R
    where
        F: FnOnce(&mut Bucket) -> R,
    {
        // A panic inside `f` cannot leave a bucket half-written, so a poisoned
        // map is still consistent.
        let mut buckets = self.buckets.lock().unwrap_or_else(PoisonError::into_inner);

        let before = buckets.len();
        buckets.retain(|_, bucket| bucket.reset_time > now);
        let swept = before - buckets.len();
        if swept > 0 {
            debug!(swept, "Removed expired rate limit buckets");
        }

        let bucket = buckets.entry(key.to_string()).or_insert(Bucket {
            count: 0,
            reset_time: fresh_reset,
        });
        f(bucket)
    }

    fn len(&self) -> usize {
        self.buckets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Derives the rate limit key for a request.
pub type KeyFn = Arc<dyn Fn(&HeaderMap, Option<SocketAddr>) -> String + Send + Sync>;

/// Fixed-window rate limiter.
pub struct RateLimiter<S = MemoryStore> {
    config: RateLimitConfig,
    store: S,
    key_fn: KeyFn,
}

impl RateLimiter<MemoryStore> {
    /// Create a limiter over a fresh in-memory store.
    pub fn in_memory(config: RateLimitConfig) -> Self {
        Self::new(config, MemoryStore::new())
    }
}

impl<S: BucketStore> RateLimiter<S> {
    /// Create a new rate limiter with the given configuration and store.
    pub fn new(config: RateLimitConfig, store: S) -> Self {
        Self {
            config,
            store,
            key_fn: Arc::new(client_ip),
        }
    }

    /// Replace the key derivation function.
    pub fn with_key_fn<F>(mut self, key_fn: F) -> Self
    where
        F: Fn(&HeaderMap, Option<SocketAddr>) -> String + Send + Sync + 'static,
    {
        self.key_fn = Arc::new(key_fn);
        self
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Key the request would be counted under.
    pub fn key(&self, headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
        (self.key_fn)(headers, peer)
    }

    /// Report whether the request fits in its window without counting it.
    pub fn check_limit(&self, headers: &HeaderMap, peer: Option<SocketAddr>) -> RateLimitResult {
        self.check_limit_at(&self.key(headers, peer), Utc::now())
    }

    /// Count the request if it fits in its window.
    pub fn consume(&self, headers: &HeaderMap, peer: Option<SocketAddr>) -> RateLimitResult {
        self.consume_at(&self.key(headers, peer), Utc::now())
    }

    /// [`check_limit`](Self::check_limit) for an explicit key and clock reading.
    pub fn check_limit_at(&self, key: &str, now: DateTime<Utc>) -> RateLimitResult {
        self.evaluate(key, now, false)
    }

    /// [`consume`](Self::consume) for an explicit key and clock reading.
    pub fn consume_at(&self, key: &str, now: DateTime<Utc>) -> RateLimitResult {
        self.evaluate(key, now, true)
    }

    fn evaluate(&self, key: &str, now: DateTime<Utc>, consume: bool) -> RateLimitResult {
        let limit = self.config.max_requests;
        let fresh_reset = self
            .config
            .window()
            .and_then(|window| now.checked_add_signed(window))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let result = self.store.update(key, now, fresh_reset, |bucket| {
            // Normally swept already; kept for stores that sweep lazily.
            if bucket.reset_time <= now {
                *bucket = Bucket {
                    count: 0,
                    reset_time: fresh_reset,
                };
            }

            let mut result = RateLimitResult {
                success: bucket.count < limit,
                limit,
                remaining: limit.saturating_sub(bucket.count),
                reset_time: bucket.reset_time,
            };

            if consume && result.success {
                bucket.count += 1;
                result.remaining -= 1;
            }
            result
        });

        if !result.success {
            debug!(key, reset_time = %result.reset_time, "Rate limit exceeded");
        }
        result
    }
}

/// Default key: the originating client IP.
///
/// Uses the first `X-Forwarded-For` entry, then `X-Real-IP`, then the socket
/// peer, then `"unknown"`.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    if let Some(forwarded) = header("x-forwarded-for") {
        let first = forwarded.split(',').next().unwrap_or(forwarded).trim();
        if !first.is_empty() {
            return first.to_string();
        }
    }

    if let Some(real_ip) = header("x-real-ip") {
        return real_ip.to_string();
    }

    match peer {
        Some(addr) => addr.ip().to_string(),
        None => "unknown".to_string(),
    }
}
