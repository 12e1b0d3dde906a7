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

//! Measurement records.
//!
//! A [`Sample`] is one timed cycle; a [`Measurement`] is the ordered sample
//! sequence of one workload plus the reason sampling ended.

use crate::error::BenchError;
use std::time::Duration;

/// Smallest cycle duration used when deriving a rate.
const MIN_CYCLE_SECS: f64 = 1e-9;

/// One timed cycle of back-to-back invocations.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Sample {
    /// Wall time of the whole cycle.
    pub cycle_duration: Duration,
    /// Invocations performed in the cycle.
    pub iterations: u64,
}

impl Sample {
    /// Creates a new sample.
    pub fn new(cycle_duration: Duration, iterations: u64) -> Self {
        Self {
            cycle_duration,
            iterations,
        }
    }

    /// Iterations per second for this cycle.
    ///
    /// The measurer never records a zero-length cycle; one built by hand is
    /// clamped to one nanosecond.
    pub fn rate(&self) -> f64 {
        self.iterations as f64 / self.cycle_duration.as_secs_f64().max(MIN_CYCLE_SECS)
    }
}

/// Why sampling of a workload ended.
#[derive(Debug, Clone, PartialEq)]
pub enum StopReason {
    /// `min_samples` collected and the stability threshold elapsed.
    Stable,
    /// The per-workload time budget ran out.
    BudgetExhausted,
    /// The stop signal fired between cycles.
    Cancelled,
    /// The workload failed; the failing cycle was discarded.
    Failed(BenchError),
}

impl StopReason {
    /// Returns a short label for reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            StopReason::Stable => "stable",
            StopReason::BudgetExhausted => "budget_exhausted",
            StopReason::Cancelled => "cancelled",
            StopReason::Failed(_) => "failed",
        }
    }
}

/// The sample sequence collected for one workload.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Workload the samples belong to.
    pub workload_name: String,
    /// Completed cycles in measurement order.
    pub samples: Vec<Sample>,
    /// Time spent sampling, excluding warm-up.
    pub elapsed: Duration,
    /// Why sampling ended.
    pub stop_reason: StopReason,
}

impl Measurement {
    /// Total iterations across all samples.
    pub fn total_iterations(&self) -> u64 {
        self.samples.iter().map(|s| s.iterations).sum()
    }

    /// Sum of the recorded cycle durations.
    pub fn total_cycle_time(&self) -> Duration {
        self.samples.iter().map(|s| s.cycle_duration).sum()
    }

    /// Returns the failure, if sampling ended with one.
    pub fn failure(&self) -> Option<&BenchError> {
        match &self.stop_reason {
            StopReason::Failed(err) => Some(err),
            _ => None,
        }
    }
}
