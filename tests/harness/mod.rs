// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test harness for submission abuse simulation.
//!
//! Drives the rate limiter, validator and honeypot check the way the create
//! handler does, on a simulated clock, and tallies the outcomes.

pub mod attacks;
pub mod generators;
pub mod metrics;
