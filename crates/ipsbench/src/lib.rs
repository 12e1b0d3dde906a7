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

//! ipsbench - iterations-per-second micro-benchmark harness.
//!
//! Measures the sustained throughput of named zero-argument workloads with
//! statistical confidence and ranks them against each other.
//!
//! ## Features
//!
//! - **Calibration**: finds how many invocations fill a target cycle window
//! - **Measurement**: timed cycles until stable, out of budget or cancelled
//! - **Statistics**: mean rate, sample stddev and a normal-approximation
//!   confidence interval
//! - **Comparison**: deterministic ranking and ratios against a baseline
//! - **Isolation**: a failing or panicking workload is reported and removed
//!   without aborting its siblings
//!
//! ## Usage
//!
//! ```no_run
//! use ipsbench::{BenchConfig, Harness};
//! use std::time::Duration;
//!
//! let template = "Hello, {{name}}!".to_string();
//! let mut harness = Harness::new();
//! let t = template.clone();
//! harness.register("replace", move || {
//!     std::hint::black_box(t.replace("{{name}}", "world"));
//! })?;
//! harness.register("format", || {
//!     std::hint::black_box(format!("Hello, {}!", "world"));
//! })?;
//!
//! let config = BenchConfig::default().with_calibration_window(Duration::from_millis(50));
//! let report = harness.run(&config)?;
//! ipsbench::reporters::print_report(&report).expect("stdout");
//! # Ok::<(), ipsbench::BenchError>(())
//! ```

pub mod core;
pub mod error;
pub mod harness;
pub mod reporters;

// Re-export key types for convenience
pub use crate::core::{
    BenchConfig, Clock, ManualClock, Measurement, MonotonicClock, Sample, StopReason,
    StopSignal, Workload, WorkloadRegistry,
};
pub use error::{BenchError, Phase, Result};
pub use harness::{
    aggregate, calibrate, compare, measure, CalibrationEstimate, ComparisonResult, Harness,
    RankedEntry, RunReport, Summary, WorkloadReport, WorkloadStatus,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
