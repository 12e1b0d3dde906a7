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

//! Error types for benchmark registration and execution.
//!
//! Every error that concerns a single workload carries that workload's name,
//! so a failed workload is never dropped from a run without a recorded reason.

use std::fmt;
use thiserror::Error;

/// Result type for benchmarking operations.
pub type Result<T> = std::result::Result<T, BenchError>;

/// The stage of a run in which a workload invocation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Parallel readiness check before any timing.
    Precheck,
    /// Iteration-count estimation.
    Calibration,
    /// Untimed warm-up cycles.
    Warmup,
    /// Timed measurement cycles.
    Measurement,
}

impl Phase {
    /// Returns the phase as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Precheck => "precheck",
            Phase::Calibration => "calibration",
            Phase::Warmup => "warmup",
            Phase::Measurement => "measurement",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while registering or running workloads.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BenchError {
    /// A workload with this name is already registered.
    #[error("Workload '{name}' is already registered")]
    DuplicateWorkloadName {
        /// The duplicated name
        name: String,
    },

    /// A workload returned an error or panicked.
    ///
    /// Only the named workload is removed from the run.
    #[error("Workload '{workload}' failed during {phase}: {message}")]
    WorkloadInvocation {
        /// Workload that failed
        workload: String,
        /// Stage in which the failure happened
        phase: Phase,
        /// Error or panic message reported by the workload
        message: String,
    },

    /// Fewer samples than required were collected.
    ///
    /// Surfaced as a flagged summary, never as an aborted run.
    #[error("Workload '{workload}' collected {collected} samples, {required} required")]
    InsufficientSamples {
        /// Workload with too few samples
        workload: String,
        /// Samples actually collected
        collected: usize,
        /// Configured minimum
        required: usize,
    },

    /// Invalid configuration parameter.
    #[error("Invalid configuration parameter '{parameter}': {reason}")]
    InvalidConfig {
        /// Parameter name
        parameter: String,
        /// Reason for invalidity
        reason: String,
    },

    /// The requested baseline is not a registered workload.
    #[error("Baseline workload '{name}' is not registered")]
    UnknownBaseline {
        /// Requested baseline name
        name: String,
    },

    /// `run` was called on a harness without workloads.
    #[error("No workloads registered")]
    NoWorkloads,
}

impl BenchError {
    /// Creates an [`BenchError::InvalidConfig`] error.
    pub fn invalid_config(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        BenchError::InvalidConfig {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Creates a [`BenchError::WorkloadInvocation`] error.
    pub fn invocation(workload: impl Into<String>, phase: Phase, message: impl Into<String>) -> Self {
        BenchError::WorkloadInvocation {
            workload: workload.into(),
            phase,
            message: message.into(),
        }
    }

    /// Returns the workload this error is attributed to, if any.
    pub fn workload(&self) -> Option<&str> {
        match self {
            BenchError::DuplicateWorkloadName { name } => Some(name),
            BenchError::WorkloadInvocation { workload, .. } => Some(workload),
            BenchError::InsufficientSamples { workload, .. } => Some(workload),
            BenchError::UnknownBaseline { name } => Some(name),
            BenchError::InvalidConfig { .. } | BenchError::NoWorkloads => None,
        }
    }
}
