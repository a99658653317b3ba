// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Client for the CMS integration API.
//!
//! Failures are logged here with their cause and returned as opaque
//! [`CmsError`] values, so upstream URLs and response bodies never reach an
//! API caller.

pub mod codec;

use crate::config::CmsConfig;
use crate::error::ApiError;
use crate::models::{CreatePhotographRequest, Photograph, UploadFile, UploadedAsset};
use codec::{decode_item, encode_request, CmsItem};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error};

/// Opaque CMS failure.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CmsError {
    #[error("Failed to fetch photographs")]
    Fetch,

    #[error("Failed to create photograph")]
    Create,

    #[error("Failed to upload asset")]
    Upload,
}

impl From<CmsError> for ApiError {
    fn from(err: CmsError) -> Self {
        match err {
            CmsError::Fetch => ApiError::FetchFailed,
            CmsError::Create => ApiError::CreateFailed,
            CmsError::Upload => ApiError::UploadFailed,
        }
    }
}

/// A page of photographs with the CMS's reported total.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotographPage {
    pub items: Vec<Photograph>,
    pub total: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CmsItemList {
    #[serde(default)]
    items: Vec<CmsItem>,
    #[serde(default)]
    total_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CmsAsset {
    id: String,
    url: String,
    #[serde(default)]
    file_name: Option<String>,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    content_type: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

/// CMS integration API client.
#[derive(Debug, Clone)]
pub struct CmsClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl CmsClient {
    /// Create a client with a default HTTP client.
    pub fn new(config: &CmsConfig) -> Self {
        Self::with_http_client(reqwest::Client::new(), config)
    }

    pub fn with_http_client(http: reqwest::Client, config: &CmsConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.access_token.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// List every photograph item of a model.
    pub async fn get_photographs(&self, model_id: &str) -> Result<PhotographPage, CmsError> {
        match self.fetch_items(model_id).await {
            Ok(list) => {
                let items: Vec<Photograph> = list.items.iter().map(decode_item).collect();
                let total = list.total_count.unwrap_or(items.len() as u64);
                debug!(model_id, count = items.len(), total, "Fetched photographs");
                Ok(PhotographPage { items, total })
            }
            Err(err) => {
                error!(model_id, error = %err, "Failed to fetch photographs from CMS");
                Err(CmsError::Fetch)
            }
        }
    }

    /// Create a photograph item and return it as stored.
    pub async fn create_photograph(
        &self,
        model_id: &str,
        request: &CreatePhotographRequest,
    ) -> Result<Photograph, CmsError> {
        match self.post_item(model_id, request).await {
            Ok(item) => {
                debug!(model_id, id = %item.id, "Created photograph");
                Ok(decode_item(&item))
            }
            Err(err) => {
                error!(model_id, error = %err, "Failed to create photograph in CMS");
                Err(CmsError::Create)
            }
        }
    }

    /// Upload a binary asset into a project.
    pub async fn upload_asset(
        &self,
        project_id: &str,
        file: UploadFile,
    ) -> Result<UploadedAsset, CmsError> {
        let filename = file.filename.clone();
        let mime_type = file.mime_type.clone();
        let size = file.bytes.len() as u64;

        match self.post_asset(project_id, file).await {
            Ok(asset) => {
                debug!(project_id, id = %asset.id, size, "Uploaded asset");
                Ok(UploadedAsset {
                    id: asset.id,
                    url: asset.url,
                    filename: asset.file_name.unwrap_or(filename),
                    size: asset.size.unwrap_or(size),
                    mime_type: asset.content_type.unwrap_or(mime_type),
                    uploaded_at: asset.created_at.unwrap_or_default(),
                })
            }
            Err(err) => {
                error!(project_id, filename = %filename, error = %err, "Failed to upload asset to CMS");
                Err(CmsError::Upload)
            }
        }
    }

    async fn fetch_items(&self, model_id: &str) -> reqwest::Result<CmsItemList> {
        self.http
            .get(self.url(&format!("/models/{model_id}/items")))
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    async fn post_item(
        &self,
        model_id: &str,
        request: &CreatePhotographRequest,
    ) -> reqwest::Result<CmsItem> {
        self.http
            .post(self.url(&format!("/models/{model_id}/items")))
            .bearer_auth(&self.token)
            .json(&encode_request(request))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    async fn post_asset(&self, project_id: &str, file: UploadFile) -> reqwest::Result<CmsAsset> {
        let part = Part::bytes(file.bytes)
            .file_name(file.filename)
            .mime_str(&file.mime_type)?;
        let form = Form::new().part("file", part);

        self.http
            .post(self.url(&format!("/projects/{project_id}/assets")))
            .bearer_auth(&self.token)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}
