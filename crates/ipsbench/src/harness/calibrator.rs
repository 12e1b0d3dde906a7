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

//! Iteration-count calibration.
//!
//! Finds how many back-to-back invocations fill the target cycle window.
//!
//! # Algorithm
//!
//! ```text
//! n = 1
//! loop:
//!     elapsed = time(n invocations)
//!     if elapsed >= window: return n
//!     n = clamp(ceil(n * window / elapsed), n + 1, 16 * n)
//! ```
//!
//! The loop is bounded by `max_rounds`. Calibration doubles as warm-up, so
//! the measurer runs no warm-up cycles by default. The stop signal is
//! checked before every round after the first.

use crate::core::cancel::StopSignal;
use crate::core::clock::Clock;
use crate::core::registry::Workload;
use crate::error::{BenchError, Phase, Result};
use std::time::Duration;
use tracing::{debug, warn};

/// Largest growth factor between two calibration rounds.
const MAX_GROWTH: u64 = 16;

/// Iteration count chosen for a workload's measurement cycles.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CalibrationEstimate {
    /// Workload this estimate belongs to.
    pub workload_name: String,
    /// Invocations per measurement cycle. Always at least 1.
    pub iterations_per_cycle: u64,
    /// Duration of the last calibration round.
    pub last_cycle_time: Duration,
    /// Calibration rounds performed.
    pub rounds: u32,
    /// Whether the last round filled the target window.
    pub reached_target: bool,
}

/// Calibrates a workload against `target_window`.
///
/// Returns `Ok(None)` when `stop` fires between two rounds.
///
/// # Errors
///
/// [`BenchError::WorkloadInvocation`] with [`Phase::Calibration`] if the
/// workload fails or panics.
pub fn calibrate<C: Clock + ?Sized>(
    clock: &C,
    workload: &mut Workload,
    target_window: Duration,
    max_rounds: u32,
    stop: &StopSignal,
) -> Result<Option<CalibrationEstimate>> {
    let mut iterations: u64 = 1;
    let mut rounds: u32 = 0;

    loop {
        if rounds > 0 && stop.should_stop(clock.now()) {
            debug!(
                workload = workload.name(),
                iterations, rounds, "calibration cancelled"
            );
            return Ok(None);
        }
        rounds += 1;

        let start = clock.now();
        workload
            .run_cycle(iterations)
            .map_err(|message| BenchError::invocation(workload.name(), Phase::Calibration, message))?;
        let elapsed = clock.elapsed(start);

        let reached_target = elapsed >= target_window;
        if reached_target || rounds >= max_rounds {
            if reached_target {
                debug!(
                    workload = workload.name(),
                    iterations, rounds, "calibrated in {:?}", elapsed
                );
            } else {
                warn!(
                    workload = workload.name(),
                    iterations,
                    rounds,
                    "calibration stopped at round bound, last cycle {:?} < window {:?}",
                    elapsed,
                    target_window
                );
            }

            return Ok(Some(CalibrationEstimate {
                workload_name: workload.name().to_string(),
                iterations_per_cycle: iterations,
                last_cycle_time: elapsed,
                rounds,
                reached_target,
            }));
        }

        iterations = next_iterations(iterations, elapsed, target_window);
    }
}

/// Projects the iteration count that would fill `target`.
fn next_iterations(current: u64, elapsed: Duration, target: Duration) -> u64 {
    let floor = current.saturating_add(1);
    let ceiling = current.saturating_mul(MAX_GROWTH);

    if elapsed.is_zero() {
        return ceiling;
    }

    let elapsed_ns = elapsed.as_nanos();
    let wanted_ns = (current as u128).saturating_mul(target.as_nanos());
    let projected = wanted_ns / elapsed_ns + u128::from(wanted_ns % elapsed_ns != 0);
    let projected = u64::try_from(projected).unwrap_or(u64::MAX);

    projected.clamp(floor, ceiling)
}
