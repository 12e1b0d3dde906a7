// Dweve ipsbench - Iterations-per-second micro-benchmark harness
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Centralized benchmark configuration.
//!
//! Provides the run configuration consumed by the calibrator, measurer,
//! aggregator and comparator, with builder-style setters and fail-fast
//! validation.

use crate::error::{BenchError, Result};
use std::time::Duration;

/// Default calibration window: each measurement cycle aims for this duration.
pub const DEFAULT_CALIBRATION_WINDOW: Duration = Duration::from_millis(100);

/// Default bound on calibration rounds.
pub const DEFAULT_MAX_CALIBRATION_ROUNDS: u32 = 32;

/// Default minimum number of samples for a trusted summary.
pub const DEFAULT_MIN_SAMPLES: usize = 2;

/// Default time budget for measuring a single workload.
pub const DEFAULT_MAX_DURATION: Duration = Duration::from_secs(5);

/// Default measured time after which a workload counts as stable.
pub const DEFAULT_STABILITY_THRESHOLD: Duration = Duration::from_secs(1);

/// Default confidence level for margins of error.
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// Benchmark run configuration.
///
/// # Example
///
/// ```
/// use ipsbench::core::config::BenchConfig;
/// use std::time::Duration;
///
/// let config = BenchConfig::default()
///     .with_calibration_window(Duration::from_millis(50))
///     .with_min_samples(3)
///     .with_baseline("render_pre");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BenchConfig {
    /// Target duration of one measurement cycle.
    pub target_calibration_window: Duration,
    /// Maximum calibration rounds before settling on the last count.
    pub max_calibration_rounds: u32,
    /// Minimum samples before a summary is trusted.
    pub min_samples: usize,
    /// Time budget for measuring one workload.
    pub max_duration: Duration,
    /// Measured time that, together with `min_samples`, ends measurement.
    pub stability_threshold: Duration,
    /// Untimed cycles run after calibration and before sampling.
    pub warmup_cycles: u32,
    /// Confidence level in (0, 1) for the margin of error.
    pub confidence_level: f64,
    /// Workload all ratios are expressed against. Defaults to the fastest.
    pub baseline: Option<String>,
    /// Invoke every workload once, in parallel, before any timing.
    pub precheck: bool,
}

impl BenchConfig {
    /// Creates a configuration with default settings.
    pub fn new() -> Self {
        Self {
            target_calibration_window: DEFAULT_CALIBRATION_WINDOW,
            max_calibration_rounds: DEFAULT_MAX_CALIBRATION_ROUNDS,
            min_samples: DEFAULT_MIN_SAMPLES,
            max_duration: DEFAULT_MAX_DURATION,
            stability_threshold: DEFAULT_STABILITY_THRESHOLD,
            warmup_cycles: 0,
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
            baseline: None,
            precheck: false,
        }
    }

    /// Sets the calibration window.
    pub fn with_calibration_window(mut self, window: Duration) -> Self {
        self.target_calibration_window = window;
        self
    }

    /// Sets the calibration round bound.
    pub fn with_max_calibration_rounds(mut self, rounds: u32) -> Self {
        self.max_calibration_rounds = rounds;
        self
    }

    /// Sets the minimum sample count.
    pub fn with_min_samples(mut self, min_samples: usize) -> Self {
        self.min_samples = min_samples;
        self
    }

    /// Sets the per-workload time budget.
    pub fn with_max_duration(mut self, max_duration: Duration) -> Self {
        self.max_duration = max_duration;
        self
    }

    /// Sets the stability threshold.
    pub fn with_stability_threshold(mut self, threshold: Duration) -> Self {
        self.stability_threshold = threshold;
        self
    }

    /// Sets the number of warm-up cycles.
    pub fn with_warmup_cycles(mut self, cycles: u32) -> Self {
        self.warmup_cycles = cycles;
        self
    }

    /// Sets the confidence level.
    pub fn with_confidence_level(mut self, level: f64) -> Self {
        self.confidence_level = level;
        self
    }

    /// Overrides the comparison baseline.
    pub fn with_baseline(mut self, name: impl Into<String>) -> Self {
        self.baseline = Some(name.into());
        self
    }

    /// Enables or disables the parallel pre-check.
    pub fn with_precheck(mut self, precheck: bool) -> Self {
        self.precheck = precheck;
        self
    }

    /// Checks every parameter, failing on the first invalid one.
    pub fn validate(&self) -> Result<()> {
        if self.target_calibration_window.is_zero() {
            return Err(BenchError::invalid_config(
                "target_calibration_window",
                "must be greater than zero",
            ));
        }
        if self.max_calibration_rounds == 0 {
            return Err(BenchError::invalid_config(
                "max_calibration_rounds",
                "must be at least 1",
            ));
        }
        if self.min_samples == 0 {
            return Err(BenchError::invalid_config("min_samples", "must be at least 1"));
        }
        if self.max_duration.is_zero() {
            return Err(BenchError::invalid_config(
                "max_duration",
                "must be greater than zero",
            ));
        }
        if self.stability_threshold.is_zero() {
            return Err(BenchError::invalid_config(
                "stability_threshold",
                "must be greater than zero",
            ));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(BenchError::invalid_config(
                "confidence_level",
                format!("must be in (0, 1), got {}", self.confidence_level),
            ));
        }
        if matches!(&self.baseline, Some(name) if name.is_empty()) {
            return Err(BenchError::invalid_config("baseline", "must not be empty"));
        }
        Ok(())
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self::new()
    }
}
