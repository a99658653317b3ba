// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus counters for submission outcomes.

use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

/// Service counters, registered in a registry owned by this struct.
pub struct Metrics {
    registry: Registry,
    pub rate_limited: IntCounter,
    pub honeypot_blocked: IntCounter,
    pub photographs_created: IntCounter,
    pub assets_uploaded: IntCounter,
    /// Labelled by `operation`: fetch, create, upload
    pub cms_failures: IntCounterVec,
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let rate_limited = IntCounter::new(
            "photograph_submissions_rate_limited_total",
            "Photograph submissions rejected by the rate limiter",
        )?;
        let honeypot_blocked = IntCounter::new(
            "photograph_submissions_honeypot_total",
            "Photograph submissions discarded because the honeypot was filled",
        )?;
        let photographs_created = IntCounter::new(
            "photographs_created_total",
            "Photographs created in the CMS",
        )?;
        let assets_uploaded =
            IntCounter::new("assets_uploaded_total", "Image assets uploaded to the CMS")?;
        let cms_failures = IntCounterVec::new(
            Opts::new("cms_failures_total", "Failed CMS integration API calls"),
            &["operation"],
        )?;

        registry.register(Box::new(rate_limited.clone()))?;
        registry.register(Box::new(honeypot_blocked.clone()))?;
        registry.register(Box::new(photographs_created.clone()))?;
        registry.register(Box::new(assets_uploaded.clone()))?;
        registry.register(Box::new(cms_failures.clone()))?;

        Ok(Self {
            registry,
            rate_limited,
            honeypot_blocked,
            photographs_created,
            assets_uploaded,
            cms_failures,
        })
    }

    pub fn cms_failure(&self, operation: &str) {
        self.cms_failures.with_label_values(&[operation]).inc();
    }

    /// Render all counters in the Prometheus text format.
    pub fn render(&self) -> prometheus::Result<String> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
