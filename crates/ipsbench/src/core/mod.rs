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

//! Core benchmark infrastructure.
//!
//! Provides time sources, configuration, workload registration, cancellation
//! and the measurement records shared by the harness.
//!
//! # Modules
//!
//! - `clock`: Monotonic and manual time sources
//! - `config`: Run configuration and validation
//! - `registry`: Named workloads in registration order
//! - `cancel`: Stop signal checked between cycles
//! - `measurement`: Samples and per-workload sample sequences

pub mod cancel;
pub mod clock;
pub mod config;
pub mod measurement;
pub mod registry;

// Re-export commonly used types
pub use cancel::StopSignal;
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::BenchConfig;
pub use measurement::{Measurement, Sample, StopReason};
pub use registry::{Workload, WorkloadRegistry};
