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

//! Arguments for `ipsbench run`.

use crate::demo::{DEFAULT_PRODUCTS, DEFAULT_SEED};
use clap::{Args, ValueEnum};
use ipsbench::core::config::{
    DEFAULT_CALIBRATION_WINDOW, DEFAULT_CONFIDENCE_LEVEL, DEFAULT_MAX_CALIBRATION_ROUNDS,
    DEFAULT_MAX_DURATION, DEFAULT_MIN_SAMPLES, DEFAULT_STABILITY_THRESHOLD,
};
use ipsbench::BenchConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Report format written to stdout.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text with a comparison block
    #[default]
    Console,
    /// Pretty-printed JSON
    Json,
}

/// Flags for `ipsbench run`.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Workload to run (repeatable; defaults to all)
    #[arg(short, long = "workload", value_name = "NAME")]
    pub workloads: Vec<String>,

    /// Target duration of one calibrated cycle
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_CALIBRATION_WINDOW.as_millis() as u64)]
    pub window_ms: u64,

    /// Upper bound on calibration rounds
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_CALIBRATION_ROUNDS)]
    pub calibration_rounds: u32,

    /// Samples required before a result is trusted
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MIN_SAMPLES)]
    pub min_samples: usize,

    /// Measurement budget per workload
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_MAX_DURATION.as_millis() as u64)]
    pub max_duration_ms: u64,

    /// Measured time required, with --min-samples, to stop early
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_STABILITY_THRESHOLD.as_millis() as u64)]
    pub stability_ms: u64,

    /// Unrecorded cycles run before sampling
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub warmup_cycles: u32,

    /// Confidence level for the error margin, in (0, 1)
    #[arg(long, value_name = "LEVEL", default_value_t = DEFAULT_CONFIDENCE_LEVEL)]
    pub confidence: f64,

    /// Workload every ratio is expressed against (defaults to the fastest)
    #[arg(long, value_name = "NAME")]
    pub baseline: Option<String>,

    /// Invoke every workload once in parallel before timing
    #[arg(long)]
    pub precheck: bool,

    /// Stop the whole run after this many seconds
    #[arg(long, value_name = "SECS")]
    pub time_limit_secs: Option<u64>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Console)]
    pub format: OutputFormat,

    /// Also write the JSON report to this file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Number of generated products the templates render
    #[arg(long, value_name = "N", default_value_t = DEFAULT_PRODUCTS)]
    pub products: usize,

    /// Seed for product generation
    #[arg(long, value_name = "SEED", default_value_t = DEFAULT_SEED)]
    pub seed: u64,
}

impl RunArgs {
    /// Builds the harness configuration. Validation happens in the harness.
    pub fn to_config(&self) -> BenchConfig {
        let mut config = BenchConfig::default()
            .with_calibration_window(Duration::from_millis(self.window_ms))
            .with_max_calibration_rounds(self.calibration_rounds)
            .with_min_samples(self.min_samples)
            .with_max_duration(Duration::from_millis(self.max_duration_ms))
            .with_stability_threshold(Duration::from_millis(self.stability_ms))
            .with_warmup_cycles(self.warmup_cycles)
            .with_confidence_level(self.confidence)
            .with_precheck(self.precheck);
        if let Some(baseline) = &self.baseline {
            config = config.with_baseline(baseline.clone());
        }
        config
    }
}
