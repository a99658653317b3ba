// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the photograph proxy.
//!
//! Every `/api` route sits behind bearer authentication. Photograph creation
//! is additionally rate limited per client before the body is looked at.

use crate::auth::require_bearer;
use crate::cms::CmsClient;
use crate::config::{Config, CorsConfig, UploadConfig};
use crate::error::{ApiError, FieldError, Result};
use crate::limiter::{RateLimitResult, RateLimiter};
use crate::metrics::Metrics;
use crate::models::{BlockedSubmission, Photograph, UploadFile, UploadedAsset};
use crate::response::ApiSuccess;
use crate::validator::validate_submission;
use axum::{
    body::Bytes,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::BytesRejection,
        ConnectInfo, DefaultBodyLimit, Multipart, State,
    },
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

/// Headroom on top of the file size limit for multipart framing and
/// non-file fields.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

static X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
static X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
static X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub limiter: RateLimiter,
    pub cms: CmsClient,
    pub metrics: Metrics,
}

impl AppState {
    /// Build state from configuration with an in-memory rate limit store.
    pub fn new(config: Config) -> prometheus::Result<Self> {
        Ok(Self {
            limiter: RateLimiter::in_memory(config.rate_limit.clone()),
            cms: CmsClient::new(&config.cms),
            metrics: Metrics::new()?,
            config,
        })
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.upload.max_file_size + MULTIPART_OVERHEAD);

    let api = Router::new()
        .route(
            "/api/photographs",
            get(list_photographs)
                .post(create_photograph)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/assets/upload",
            post(upload_asset)
                .fallback(method_not_allowed)
                .layer(upload_limit),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    let mut app = Router::new().route("/health", get(health)).merge(api);
    if state.config.metrics.enabled {
        app = app.route(&state.config.metrics.path, get(metrics));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.cors))
        .with_state(state)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if config.allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    layer
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "photograph-proxy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Prometheus metrics endpoint.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.metrics.render() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
            body,
        )
            .into_response(),
        Err(err) => {
            warn!(error = %err, "Failed to render metrics");
            ApiError::Internal.into_response()
        }
    }
}

async fn method_not_allowed(method: Method) -> ApiError {
    ApiError::MethodNotAllowed(method)
}

/// `GET /api/photographs`
pub async fn list_photographs(
    State(state): State<Arc<AppState>>,
) -> Result<ApiSuccess<Vec<Photograph>>> {
    let page = state
        .cms
        .get_photographs(&state.config.cms.photographs_model_id)
        .await
        .map_err(|err| {
            state.metrics.cms_failure("fetch");
            ApiError::from(err)
        })?;

    Ok(ApiSuccess::ok(page.items).total(page.total))
}

/// `POST /api/photographs`
///
/// Rate limit headers are attached to every response past authentication,
/// including validation failures.
pub async fn create_photograph(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Response {
    let peer = connect_info.map(|ConnectInfo(addr)| addr);
    let rate = state.limiter.consume(&headers, peer);

    let outcome = submit(&state, &rate, body).await;
    (rate_limit_headers(&rate), outcome).into_response()
}

async fn submit(
    state: &AppState,
    rate: &RateLimitResult,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Response> {
    if !rate.success {
        state.metrics.rate_limited.inc();
        let retry_after_secs = rate.retry_after_secs(Utc::now());
        info!(retry_after_secs, "Photograph submission rate limited");
        return Err(ApiError::RateLimited { retry_after_secs });
    }

    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            debug!("Submission body over the size limit");
            ApiError::BodyTooLarge
        } else {
            warn!(error = %rejection, "Failed to read submission body");
            ApiError::Validation(vec![FieldError::new("body", "Unreadable request body")])
        }
    })?;

    let value: Value = serde_json::from_slice(&body).map_err(|err| {
        debug!(error = %err, "Submission body is not JSON");
        ApiError::Validation(vec![FieldError::new("body", "Malformed JSON body")])
    })?;
    let request = validate_submission(&value).map_err(ApiError::Validation)?;

    if request.is_honeypot_filled() {
        state.metrics.honeypot_blocked.inc();
        info!("Honeypot field filled, discarding submission");
        return Ok(ApiSuccess::created(BlockedSubmission::default()).into_response());
    }

    let photograph = state
        .cms
        .create_photograph(&state.config.cms.photographs_model_id, &request)
        .await
        .map_err(|err| {
            state.metrics.cms_failure("create");
            ApiError::from(err)
        })?;

    state.metrics.photographs_created.inc();
    info!(id = %photograph.id, "Photograph created");
    Ok(ApiSuccess::created(photograph).into_response())
}

fn rate_limit_headers(rate: &RateLimitResult) -> [(HeaderName, String); 3] {
    [
        (X_RATELIMIT_LIMIT.clone(), rate.limit.to_string()),
        (X_RATELIMIT_REMAINING.clone(), rate.remaining.to_string()),
        (
            X_RATELIMIT_RESET.clone(),
            rate.reset_time.to_rfc3339_opts(SecondsFormat::Millis, true),
        ),
    ]
}

/// `POST /api/assets/upload`
pub async fn upload_asset(
    State(state): State<Arc<AppState>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<ApiSuccess<UploadedAsset>> {
    let Ok(multipart) = multipart else {
        debug!("Upload request is not multipart");
        return Err(ApiError::NoFile);
    };

    let file = read_image(multipart, &state.config.upload).await?;
    info!(
        filename = %file.filename,
        mime_type = %file.mime_type,
        size = file.bytes.len(),
        "Uploading image asset"
    );

    let asset = state
        .cms
        .upload_asset(&state.config.cms.project_id, file)
        .await
        .map_err(|err| {
            state.metrics.cms_failure("upload");
            ApiError::from(err)
        })?;

    state.metrics.assets_uploaded.inc();
    Ok(ApiSuccess::created(asset))
}

/// Pull the first `image` part out of a multipart body, enforcing type and
/// size limits while streaming.
async fn read_image(mut multipart: Multipart, config: &UploadConfig) -> Result<UploadFile> {
    let too_large = || ApiError::FileTooLarge {
        limit_bytes: config.max_file_size,
    };
    let multipart_failed = |err: MultipartError| {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            too_large()
        } else {
            warn!(error = %err, "Failed to read multipart body");
            ApiError::UploadFailed
        }
    };

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_failed)? {
        if field.name() != Some("image") {
            continue;
        }

        let mime_type = field
            .content_type()
            .map(|ct| ct.trim().to_lowercase())
            .unwrap_or_default();
        if !config.allowed_mime_types.iter().any(|m| *m == mime_type) {
            debug!(mime_type = %mime_type, "Rejected non-image upload");
            return Err(ApiError::InvalidFileType);
        }
        let filename = field.file_name().unwrap_or("upload").to_string();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_failed)? {
            if bytes.len() + chunk.len() > config.max_file_size {
                debug!(filename = %filename, "Rejected oversized upload");
                return Err(too_large());
            }
            bytes.extend_from_slice(&chunk);
        }

        return Ok(UploadFile {
            filename,
            mime_type,
            bytes,
        });
    }

    Err(ApiError::NoFile)
}
