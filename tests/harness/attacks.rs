// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Submission abuse patterns.

/// Attack pattern configuration.
#[derive(Debug, Clone)]
pub struct AttackConfig {
    /// Total number of submissions to send
    pub total_requests: usize,
    /// Simulated gap between submissions in milliseconds
    pub interval_ms: i64,
    /// Number of distinct client IPs
    pub unique_ips: usize,
    /// Rotate a fresh `X-Forwarded-For` value on every request
    pub spoof_forwarded_for: bool,
    /// Fraction of submissions with the honeypot filled (0.0-1.0)
    pub honeypot_ratio: f64,
    /// Fraction of submissions with an invalid body (0.0-1.0)
    pub malformed_ratio: f64,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            total_requests: 100,
            interval_ms: 100,
            unique_ips: 1,
            spoof_forwarded_for: false,
            honeypot_ratio: 0.0,
            malformed_ratio: 0.0,
        }
    }
}

/// Predefined attack patterns.
impl AttackConfig {
    /// One client hammering the create endpoint.
    pub fn single_ip_flood() -> Self {
        Self {
            total_requests: 200,
            interval_ms: 10,
            ..Default::default()
        }
    }

    /// Many clients, a handful of submissions each.
    pub fn distributed_flood() -> Self {
        Self {
            total_requests: 500,
            interval_ms: 10,
            unique_ips: 100,
            ..Default::default()
        }
    }

    /// One client submitting slower than the quota refills.
    pub fn slow_drip() -> Self {
        Self {
            total_requests: 120,
            interval_ms: 60_000,
            ..Default::default()
        }
    }

    /// Form-filling bot that populates every input, hidden ones included.
    pub fn honeypot_bot() -> Self {
        Self {
            total_requests: 20,
            unique_ips: 20,
            honeypot_ratio: 1.0,
            ..Default::default()
        }
    }

    /// Fuzzed bodies from a single client.
    pub fn malformed_bodies() -> Self {
        Self {
            total_requests: 40,
            malformed_ratio: 1.0,
            ..Default::default()
        }
    }

    /// Single client forging `X-Forwarded-For` on every request.
    pub fn forwarded_for_rotation() -> Self {
        Self {
            total_requests: 100,
            interval_ms: 10,
            spoof_forwarded_for: true,
            ..Default::default()
        }
    }
}
