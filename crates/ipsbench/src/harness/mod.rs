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

//! Benchmark harness: calibration, measurement, aggregation and comparison.
//!
//! # Modules
//!
//! - `calibrator`: Iterations-per-cycle estimation
//! - `measurer`: Timed measurement cycles
//! - `aggregator`: Summary statistics and confidence intervals
//! - `comparator`: Ranking and baseline ratios
//! - `runner`: The [`Harness`] entry point

pub mod aggregator;
pub mod calibrator;
pub mod comparator;
pub mod measurer;
pub mod runner;

pub use aggregator::{aggregate, z_score, Summary};
pub use calibrator::{calibrate, CalibrationEstimate};
pub use comparator::{compare, ComparisonResult, RankedEntry};
pub use measurer::measure;
pub use runner::{Harness, RunReport, WorkloadReport, WorkloadStatus};
