// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outcome tallies for submission abuse simulation.

use std::collections::HashMap;

/// Possible outcomes for a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Would have been forwarded to the CMS
    Forwarded,
    RateLimited,
    ValidationFailed,
    HoneypotBlocked,
}

/// Collects outcomes during a simulation.
#[derive(Debug, Default)]
pub struct AttackMetrics {
    outcomes: HashMap<Outcome, usize>,
    requests_per_key: HashMap<String, usize>,
}

impl AttackMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submission outcome for a rate limit key.
    pub fn record(&mut self, outcome: Outcome, key: &str) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
        *self.requests_per_key.entry(key.to_string()).or_insert(0) += 1;
    }

    pub fn total_requests(&self) -> usize {
        self.outcomes.values().sum()
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    pub fn unique_keys(&self) -> usize {
        self.requests_per_key.len()
    }

    /// Ratio of submissions that did not reach the CMS.
    pub fn block_rate(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            return 0.0;
        }
        (total - self.count(Outcome::Forwarded)) as f64 / total as f64
    }

    pub fn report(&self) -> MetricsReport {
        MetricsReport {
            total_requests: self.total_requests(),
            forwarded: self.count(Outcome::Forwarded),
            rate_limited: self.count(Outcome::RateLimited),
            validation_failed: self.count(Outcome::ValidationFailed),
            honeypot_blocked: self.count(Outcome::HoneypotBlocked),
            block_rate: self.block_rate(),
            unique_keys: self.unique_keys(),
        }
    }
}

/// Summary report of a simulation.
#[derive(Debug, Clone)]
pub struct MetricsReport {
    pub total_requests: usize,
    pub forwarded: usize,
    pub rate_limited: usize,
    pub validation_failed: usize,
    pub honeypot_blocked: usize,
    pub block_rate: f64,
    pub unique_keys: usize,
}

impl std::fmt::Display for MetricsReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Submission Abuse Report ===")?;
        writeln!(f, "Total Requests:    {}", self.total_requests)?;
        writeln!(f, "Forwarded:         {}", self.forwarded)?;
        writeln!(f, "Rate Limited:      {}", self.rate_limited)?;
        writeln!(f, "Validation Failed: {}", self.validation_failed)?;
        writeln!(f, "Honeypot Blocked:  {}", self.honeypot_blocked)?;
        writeln!(f, "Block Rate:        {:.1}%", self.block_rate * 100.0)?;
        writeln!(f, "Unique Keys:       {}", self.unique_keys)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_rate() {
        let mut metrics = AttackMetrics::new();
        for _ in 0..3 {
            metrics.record(Outcome::Forwarded, "10.0.0.1");
        }
        for _ in 0..7 {
            metrics.record(Outcome::RateLimited, "10.0.0.1");
        }

        assert_eq!(metrics.unique_keys(), 1);
        assert!((metrics.block_rate() - 0.7).abs() < 0.01);
    }
}
