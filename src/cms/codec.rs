// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Field codec between CMS items and photographs.
//!
//! The CMS stores an item as an ordered list of `{key, value}` pairs. The
//! photograph schema is declared once in [`PHOTOGRAPH_FIELDS`]; each entry
//! knows how to write its value from a submission and how to read it back
//! onto a [`Photograph`].

use crate::models::{CreatePhotographRequest, GeoPoint, Photograph};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;

/// One `{key, value}` entry of a CMS item. Other attributes the CMS attaches
/// (field id, type) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CmsField {
    pub key: String,
    #[serde(default)]
    pub value: Value,
}

impl CmsField {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Item as returned by the CMS integration API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CmsItem {
    pub id: String,
    #[serde(default)]
    pub fields: Vec<CmsField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Body sent when creating an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CmsItemPayload {
    pub fields: Vec<CmsField>,
}

/// A declared photograph field.
pub struct FieldDef {
    pub key: &'static str,
    encode: fn(&CreatePhotographRequest) -> Value,
    decode: fn(&mut Photograph, &Value),
}

/// Photograph schema, in the order fields are sent to the CMS.
pub static PHOTOGRAPH_FIELDS: [FieldDef; 5] = [
    FieldDef {
        key: "title",
        encode: encode_title,
        decode: decode_title,
    },
    FieldDef {
        key: "photo-url",
        encode: encode_photo_url,
        decode: decode_photo_url,
    },
    FieldDef {
        key: "description",
        encode: encode_description,
        decode: decode_description,
    },
    FieldDef {
        key: "author",
        encode: encode_author,
        decode: decode_author,
    },
    FieldDef {
        key: "position",
        encode: encode_position,
        decode: decode_position,
    },
];

/// Encode a submission as CMS fields. The honeypot is never sent.
pub fn encode_request(request: &CreatePhotographRequest) -> CmsItemPayload {
    CmsItemPayload {
        fields: PHOTOGRAPH_FIELDS
            .iter()
            .map(|def| CmsField::new(def.key, (def.encode)(request)))
            .collect(),
    }
}

/// Project a CMS item onto a photograph.
///
/// Duplicate keys resolve to the last occurrence. Missing, null, or
/// wrongly-typed values leave the field at its default.
pub fn decode_item(item: &CmsItem) -> Photograph {
    let values: HashMap<&str, &Value> = item
        .fields
        .iter()
        .map(|field| (field.key.as_str(), &field.value))
        .collect();

    let mut photograph = Photograph::empty(item.id.clone(), item.created_at.clone());
    for def in &PHOTOGRAPH_FIELDS {
        match values.get(def.key) {
            Some(Value::Null) | None => {}
            Some(value) => (def.decode)(&mut photograph, value),
        }
    }
    photograph
}

/// Parse a stored position. Accepts a GeoJSON object or a string holding one.
pub fn parse_point(value: &Value) -> Option<GeoPoint> {
    let point: GeoPoint = match value {
        Value::String(raw) => serde_json::from_str(raw).ok()?,
        Value::Object(_) => serde_json::from_value(value.clone()).ok()?,
        _ => return None,
    };
    point.in_bounds().then_some(point)
}

fn encode_title(request: &CreatePhotographRequest) -> Value {
    Value::String(request.title.clone())
}

fn encode_photo_url(request: &CreatePhotographRequest) -> Value {
    Value::String(request.photo_url.clone())
}

fn encode_description(request: &CreatePhotographRequest) -> Value {
    Value::String(request.description.clone().unwrap_or_default())
}

fn encode_author(request: &CreatePhotographRequest) -> Value {
    Value::String(request.author.clone())
}

fn encode_position(request: &CreatePhotographRequest) -> Value {
    json!({
        "type": "Point",
        "coordinates": [request.position.longitude(), request.position.latitude()],
    })
}

fn decode_title(photograph: &mut Photograph, value: &Value) {
    if let Some(s) = value.as_str() {
        photograph.title = s.to_string();
    }
}

fn decode_photo_url(photograph: &mut Photograph, value: &Value) {
    if let Some(s) = value.as_str() {
        photograph.photo_url = s.to_string();
    }
}

fn decode_description(photograph: &mut Photograph, value: &Value) {
    photograph.description = value
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string);
}

fn decode_author(photograph: &mut Photograph, value: &Value) {
    if let Some(s) = value.as_str() {
        photograph.author = s.to_string();
    }
}

fn decode_position(photograph: &mut Photograph, value: &Value) {
    photograph.position = parse_point(value);
}
