// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test data generators for submission abuse simulation.

use serde_json::{json, Value};
use std::net::{IpAddr, Ipv4Addr};

/// Generate a pool of IP addresses for testing.
pub fn generate_ips(count: usize) -> Vec<IpAddr> {
    (0..count)
        .map(|i| {
            // Use 10.x.x.x private range
            let a = ((i >> 16) & 0xFF) as u8;
            let b = ((i >> 8) & 0xFF) as u8;
            let c = (i & 0xFF) as u8;
            IpAddr::V4(Ipv4Addr::new(10, a, b, c))
        })
        .collect()
}

/// A well-formed submission, varied by index.
pub fn valid_submission(i: usize) -> Value {
    let lon = -180.0 + (i as f64 * 7.3) % 360.0;
    let lat = -90.0 + (i as f64 * 3.1) % 180.0;
    json!({
        "title": format!("Photo {i}"),
        "photoUrl": format!("https://cdn.example.com/photos/{i}.jpg"),
        "author": format!("author-{}", i % 7),
        "position": {"type": "Point", "coordinates": [lon, lat]}
    })
}

/// A submission with the honeypot filled.
pub fn honeypot_submission(i: usize) -> Value {
    let mut body = valid_submission(i);
    body["website"] = json!(format!("https://seo-{i}.example.net"));
    body
}

/// Bodies the validator must reject.
pub fn generate_malformed_bodies() -> Vec<Value> {
    vec![
        json!(null),
        json!([]),
        json!("title=x"),
        json!({}),
        json!({"title": "", "photoUrl": "https://a.example/x.jpg", "author": "a",
               "position": {"type": "Point", "coordinates": [0, 0]}}),
        json!({"title": "x", "photoUrl": "javascript", "author": "a",
               "position": {"type": "Point", "coordinates": [0, 0]}}),
        json!({"title": "x", "photoUrl": "https://a.example/x.jpg", "author": "a",
               "position": {"type": "Point", "coordinates": [181, 0]}}),
        json!({"title": "x", "photoUrl": "https://a.example/x.jpg", "author": "a",
               "position": {"type": "Point", "coordinates": [0, -90.5]}}),
        json!({"title": "x", "photoUrl": "https://a.example/x.jpg", "author": "a",
               "position": {"type": "Polygon", "coordinates": [0, 0]}}),
        json!({"title": "x", "photoUrl": "https://a.example/x.jpg", "author": "a",
               "position": {"type": "Point", "coordinates": [0]}}),
        json!({"title": "x".repeat(201), "photoUrl": "https://a.example/x.jpg", "author": "a",
               "position": {"type": "Point", "coordinates": [0, 0]}}),
        json!({"title": "x", "photoUrl": "https://a.example/x.jpg", "author": 42,
               "position": {"type": "Point", "coordinates": [0, 0]}}),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ips() {
        let ips = generate_ips(256);
        assert_eq!(ips.len(), 256);
        // All should be unique
        let unique: std::collections::HashSet<_> = ips.iter().collect();
        assert_eq!(unique.len(), 256);
    }

    #[test]
    fn test_valid_submissions_validate() {
        for i in 0..50 {
            assert!(photograph_proxy::validator::validate_submission(&valid_submission(i)).is_ok());
        }
    }
}
