// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Photograph Proxy
//!
//! This crate provides the server side of the spatial photograph widgets: a
//! thin authenticated API in front of a headless CMS.
//!
//! - Static bearer token authentication
//! - Fixed-window per-client rate limiting of submissions
//! - Field-level validation of submissions
//! - Honeypot filtering of automated submissions
//! - Bidirectional mapping between CMS items and photographs
//! - Image asset upload passthrough

pub mod auth;
pub mod cms;
pub mod config;
pub mod error;
pub mod handlers;
pub mod limiter;
pub mod metrics;
pub mod models;
pub mod response;
pub mod validator;

pub use cms::{CmsClient, CmsError};
pub use config::Config;
pub use error::ApiError;
pub use handlers::{router, AppState};
pub use limiter::{BucketStore, MemoryStore, RateLimitResult, RateLimiter};
pub use models::{CreatePhotographRequest, GeoPoint, Photograph, UploadedAsset};
