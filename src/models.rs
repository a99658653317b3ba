// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Data models for photographs and uploaded assets.

use serde::{Deserialize, Serialize};

/// GeoJSON geometry tag. Only points are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryType {
    #[default]
    Point,
}

/// GeoJSON Point, coordinates ordered `[longitude, latitude]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type")]
    pub kind: GeometryType,
    pub coordinates: [f64; 2],
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            kind: GeometryType::Point,
            coordinates: [longitude, latitude],
        }
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }

    /// Both coordinates are finite and inside WGS84 bounds.
    pub fn in_bounds(&self) -> bool {
        (-180.0..=180.0).contains(&self.longitude()) && (-90.0..=90.0).contains(&self.latitude())
    }
}

/// Photograph as served to the widgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photograph {
    /// CMS item identifier
    pub id: String,
    pub title: String,
    pub photo_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub author: String,
    /// Absent when the CMS item has no usable position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<GeoPoint>,
    /// CMS creation timestamp, passed through verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Photograph {
    /// Empty photograph carrying only server-assigned metadata.
    pub fn empty(id: impl Into<String>, created_at: Option<String>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            photo_url: String::new(),
            description: None,
            author: String::new(),
            position: None,
            created_at,
        }
    }
}

/// Validated photograph submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePhotographRequest {
    pub title: String,
    pub photo_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub author: String,
    pub position: GeoPoint,
    /// Honeypot. Humans never see this field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl CreatePhotographRequest {
    /// True when the honeypot field carries anything but whitespace.
    pub fn is_honeypot_filled(&self) -> bool {
        self.website
            .as_deref()
            .is_some_and(|w| !w.trim().is_empty())
    }
}

/// Response body for a submission swallowed by the honeypot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockedSubmission {
    pub id: String,
    pub message: String,
}

impl Default for BlockedSubmission {
    fn default() -> Self {
        Self {
            id: "blocked".to_string(),
            message: "Success".to_string(),
        }
    }
}

/// Binary file received from a client, bound for the CMS.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Asset stored in the CMS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedAsset {
    pub id: String,
    pub url: String,
    pub filename: String,
    pub size: u64,
    pub mime_type: String,
    pub uploaded_at: String,
}
