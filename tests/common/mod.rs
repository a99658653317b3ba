// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Shared helpers for router-level tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, request::Builder, Method, Request};
use axum::Router;
use photograph_proxy::config::{CmsConfig, Config};
use photograph_proxy::{router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;

pub const TOKEN: &str = "test-key";
pub const CMS_TOKEN: &str = "cms-token";
pub const MODEL_ID: &str = "photos-model";
pub const PROJECT_ID: &str = "photos-project";
pub const BOUNDARY: &str = "X-PHOTOGRAPH-PROXY-BOUNDARY";

/// Configuration pointing at a mock CMS.
pub fn config(cms_url: &str) -> Config {
    Config {
        api_secret_key: Some(TOKEN.to_string()),
        cms: CmsConfig {
            base_url: cms_url.to_string(),
            access_token: CMS_TOKEN.to_string(),
            photographs_model_id: MODEL_ID.to_string(),
            project_id: PROJECT_ID.to_string(),
        },
        ..Default::default()
    }
}

pub fn app(config: Config) -> (Arc<AppState>, Router) {
    let state = Arc::new(AppState::new(config).expect("metrics registry"));
    (state.clone(), router(state))
}

/// Request builder carrying the valid bearer token.
pub fn authed(method: Method, uri: &str) -> Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
}

pub fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    authed(method, uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

pub async fn read_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf-8")
}

pub fn submission() -> Value {
    json!({
        "title": "Tokyo Station at dusk",
        "photoUrl": "https://cdn.example.com/photos/tokyo-station.jpg",
        "description": "Marunouchi side",
        "author": "Aoi",
        "position": {"type": "Point", "coordinates": [139.7671, 35.6812]}
    })
}

pub fn honeypot_submission() -> Value {
    let mut body = submission();
    body["website"] = json!("http://cheap-pills.example");
    body
}

/// Single-part multipart body.
pub fn multipart_body(field: &str, filename: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn upload_request(body: Vec<u8>) -> Request<Body> {
    authed(Method::POST, "/api/assets/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request")
}
