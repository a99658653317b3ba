// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Photograph submission validator.
//!
//! Works on the raw JSON body so every failing field can be reported at once,
//! each under its dotted path (`position.coordinates.1`).

use crate::error::FieldError;
use crate::models::{CreatePhotographRequest, GeoPoint};
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

const TITLE_MAX_CHARS: usize = 200;
const AUTHOR_MAX_CHARS: usize = 100;

/// Validate a submission body, collecting every field error.
pub fn validate_submission(body: &Value) -> Result<CreatePhotographRequest, Vec<FieldError>> {
    let Some(obj) = body.as_object() else {
        return Err(vec![FieldError::new("body", "Expected object")]);
    };

    let mut errors = Vec::new();

    let title = bounded_string(
        obj,
        "title",
        "Title is required",
        TITLE_MAX_CHARS,
        "Title too long",
        &mut errors,
    );
    let photo_url = photo_url(obj, &mut errors);
    let description = optional_string(obj, "description", &mut errors);
    let author = bounded_string(
        obj,
        "author",
        "Author is required",
        AUTHOR_MAX_CHARS,
        "Author name too long",
        &mut errors,
    );
    let position = position(obj.get("position"), &mut errors);
    let website = optional_string(obj, "website", &mut errors);

    match (title, photo_url, author, position) {
        (Some(title), Some(photo_url), Some(author), Some(position)) if errors.is_empty() => {
            Ok(CreatePhotographRequest {
                title,
                photo_url,
                description,
                author,
                position,
                website,
            })
        }
        _ => {
            debug!(error_count = errors.len(), "Submission failed validation");
            Err(errors)
        }
    }
}

fn required_string<'a>(
    obj: &'a Map<String, Value>,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<&'a str> {
    match obj.get(field) {
        None | Some(Value::Null) => {
            errors.push(FieldError::new(field, "Required"));
            None
        }
        Some(Value::String(s)) => Some(s),
        Some(_) => {
            errors.push(FieldError::new(field, "Expected string"));
            None
        }
    }
}

fn bounded_string(
    obj: &Map<String, Value>,
    field: &str,
    empty_message: &str,
    max_chars: usize,
    too_long_message: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let value = required_string(obj, field, errors)?;
    let len = value.chars().count();
    if len == 0 {
        errors.push(FieldError::new(field, empty_message));
        None
    } else if len > max_chars {
        errors.push(FieldError::new(field, too_long_message));
        None
    } else {
        Some(value.to_string())
    }
}

fn photo_url(obj: &Map<String, Value>, errors: &mut Vec<FieldError>) -> Option<String> {
    let value = required_string(obj, "photoUrl", errors)?;
    match Url::parse(value) {
        Ok(_) => Some(value.to_string()),
        Err(_) => {
            errors.push(FieldError::new("photoUrl", "Invalid photo URL"));
            None
        }
    }
}

fn optional_string(
    obj: &Map<String, Value>,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match obj.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(FieldError::new(field, "Expected string"));
            None
        }
    }
}

fn position(value: Option<&Value>, errors: &mut Vec<FieldError>) -> Option<GeoPoint> {
    let obj = match value {
        None | Some(Value::Null) => {
            errors.push(FieldError::new("position", "Required"));
            return None;
        }
        Some(Value::Object(obj)) => obj,
        Some(_) => {
            errors.push(FieldError::new("position", "Expected object"));
            return None;
        }
    };

    let mut valid = true;

    if obj.get("type").and_then(Value::as_str) != Some("Point") {
        errors.push(FieldError::new(
            "position.type",
            "Invalid literal value, expected \"Point\"",
        ));
        valid = false;
    }

    let coordinates = match obj.get("coordinates").and_then(Value::as_array) {
        Some(items) if items.len() == 2 => {
            let lon = coordinate(&items[0], "position.coordinates.0", 180.0, "Longitude", errors);
            let lat = coordinate(&items[1], "position.coordinates.1", 90.0, "Latitude", errors);
            lon.zip(lat)
        }
        _ => {
            errors.push(FieldError::new(
                "position.coordinates",
                "Expected array of 2 numbers",
            ));
            None
        }
    };

    match coordinates {
        Some((lon, lat)) if valid => Some(GeoPoint::new(lon, lat)),
        _ => None,
    }
}

fn coordinate(
    value: &Value,
    field: &str,
    bound: f64,
    label: &str,
    errors: &mut Vec<FieldError>,
) -> Option<f64> {
    let Some(n) = value.as_f64() else {
        errors.push(FieldError::new(field, "Expected number"));
        return None;
    };
    if (-bound..=bound).contains(&n) {
        Some(n)
    } else {
        errors.push(FieldError::new(
            field,
            format!("{label} must be between -{bound} and {bound}"),
        ));
        None
    }
}
