// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the photograph proxy.
//!
//! Defaults match the deployed serverless functions: 30 submissions per
//! 15 minutes per client, 10 MiB image uploads.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Longest accepted rate limit window (one day).
pub const MAX_WINDOW_MS: u64 = 24 * 60 * 60 * 1000;

/// Configuration for the photograph proxy service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:3000)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Static bearer secret shared with the widgets. `None` rejects every request.
    #[serde(default)]
    pub api_secret_key: Option<String>,

    /// CMS integration API configuration
    #[serde(default)]
    pub cms: CmsConfig,

    /// Rate limiting configuration for photograph submissions
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Asset upload configuration
    #[serde(default)]
    pub upload: UploadConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Connection details for the CMS integration API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmsConfig {
    /// Base URL of the integration API, without trailing slash
    #[serde(default)]
    pub base_url: String,

    /// Integration access token
    #[serde(default)]
    pub access_token: String,

    /// Model holding photograph items
    #[serde(default = "default_model_id")]
    pub photographs_model_id: String,

    /// Project receiving uploaded assets
    #[serde(default = "default_project_id")]
    pub project_id: String,
}

/// Fixed-window rate limiting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Window length in milliseconds (default: 15 minutes)
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,

    /// Maximum requests per window per client (default: 30)
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
}

/// Image upload limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum accepted file size in bytes (default: 10 MiB)
    #[serde(default = "default_max_file_size")]
    pub max_file_size: usize,

    /// Accepted MIME types for the `image` part
    #[serde(default = "default_allowed_mime_types")]
    pub allowed_mime_types: Vec<String>,
}

/// CORS configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins. Empty allows any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_model_id() -> String {
    "default-model-id".to_string()
}

fn default_project_id() -> String {
    "default-project-id".to_string()
}

fn default_window_ms() -> u64 {
    15 * 60 * 1000
}

fn default_max_requests() -> u32 {
    30
}

fn default_max_file_size() -> usize {
    10 * 1024 * 1024
}

fn default_allowed_mime_types() -> Vec<String> {
    ["image/jpeg", "image/jpg", "image/png", "image/webp", "image/gif"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            api_secret_key: None,
            cms: CmsConfig::default(),
            rate_limit: RateLimitConfig::default(),
            upload: UploadConfig::default(),
            cors: CorsConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            access_token: String::new(),
            photographs_model_id: default_model_id(),
            project_id: default_project_id(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_ms: default_window_ms(),
            max_requests: default_max_requests(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            allowed_mime_types: default_allowed_mime_types(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl RateLimitConfig {
    /// Window length, or `None` when `window_ms` does not fit a signed duration.
    pub fn window(&self) -> Option<Duration> {
        i64::try_from(self.window_ms)
            .ok()
            .and_then(Duration::try_milliseconds)
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            bind_addr: non_empty("BIND_ADDR").unwrap_or(defaults.bind_addr),
            api_secret_key: non_empty("API_SECRET_KEY"),
            cms: CmsConfig {
                base_url: non_empty("REEARTH_CMS_INTEGRATION_API_BASE_URL")
                    .map(|v| v.trim_end_matches('/').to_string())
                    .unwrap_or(defaults.cms.base_url),
                access_token: non_empty("REEARTH_CMS_INTEGRATION_API_ACCESS_TOKEN")
                    .unwrap_or(defaults.cms.access_token),
                photographs_model_id: non_empty("REEARTH_CMS_PROJECT_PHOTOGRAPHS_MODEL_ID")
                    .unwrap_or(defaults.cms.photographs_model_id),
                project_id: non_empty("REEARTH_CMS_PROJECT_ID")
                    .unwrap_or(defaults.cms.project_id),
            },
            rate_limit: RateLimitConfig {
                window_ms: non_empty("RATE_LIMIT_WINDOW_MS")
                    .and_then(|v| v.parse().ok())
                    .filter(|ms| {
                        let in_range = (1..=MAX_WINDOW_MS).contains(ms);
                        if !in_range {
                            warn!(
                                window_ms = *ms,
                                max = MAX_WINDOW_MS,
                                "RATE_LIMIT_WINDOW_MS out of range, using default"
                            );
                        }
                        in_range
                    })
                    .unwrap_or(defaults.rate_limit.window_ms),
                max_requests: non_empty("RATE_LIMIT_MAX_REQUESTS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.rate_limit.max_requests),
            },
            upload: UploadConfig {
                max_file_size: non_empty("MAX_UPLOAD_BYTES")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.upload.max_file_size),
                ..defaults.upload
            },
            cors: CorsConfig {
                allowed_origins: non_empty("CORS_ORIGIN")
                    .map(|v| {
                        v.split(',')
                            .map(|o| o.trim().to_string())
                            .filter(|o| !o.is_empty())
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            metrics: MetricsConfig {
                enabled: non_empty("METRICS_ENABLED")
                    .map(|v| !matches!(v.trim().to_lowercase().as_str(), "0" | "false" | "no" | "off"))
                    .unwrap_or(defaults.metrics.enabled),
                ..defaults.metrics
            },
        }
    }
}
