// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Photograph Proxy Service
//!
//! Serves the photograph widgets' API:
//!
//! - `GET  /api/photographs` lists photographs from the CMS
//! - `POST /api/photographs` submits a photograph (rate limited)
//! - `POST /api/assets/upload` uploads an image asset
//! - `GET  /health` and `GET /metrics` for operations
//!
//! ## Configuration
//!
//! Environment variables, optionally from a `.env` file:
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:3000)
//! - `API_SECRET_KEY`: Bearer token expected from clients
//! - `REEARTH_CMS_INTEGRATION_API_BASE_URL`, `REEARTH_CMS_INTEGRATION_API_ACCESS_TOKEN`
//! - `REEARTH_CMS_PROJECT_PHOTOGRAPHS_MODEL_ID`, `REEARTH_CMS_PROJECT_ID`
//! - `RATE_LIMIT_WINDOW_MS` (default: 900000), `RATE_LIMIT_MAX_REQUESTS` (default: 30)
//! - `MAX_UPLOAD_BYTES` (default: 10 MiB)
//! - `CORS_ORIGIN`: comma-separated allowed origins (default: any)
//! - `METRICS_ENABLED` (default: true)

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use photograph_proxy::{config::Config, handlers::router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before the filter reads RUST_LOG
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration
    let config = Config::from_env();
    info!(
        bind_addr = %config.bind_addr,
        window_ms = config.rate_limit.window_ms,
        max_requests = config.rate_limit.max_requests,
        max_upload_bytes = config.upload.max_file_size,
        metrics_enabled = config.metrics.enabled,
        "Starting photograph proxy"
    );

    if config.api_secret_key.is_none() {
        warn!("API_SECRET_KEY is not set, every API request will be rejected");
    }
    if config.cms.base_url.is_empty() {
        warn!("REEARTH_CMS_INTEGRATION_API_BASE_URL is not set, CMS calls will fail");
    }

    let addr: SocketAddr = config.bind_addr.parse()?;
    let state = Arc::new(AppState::new(config)?);
    let app = router(state);

    // Start server
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
