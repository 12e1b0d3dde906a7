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

//! Timed measurement cycles.
//!
//! Each cycle invokes the workload `iterations_per_cycle` times and becomes
//! one [`Sample`]. Between cycles the measurer checks, in order:
//!
//! 1. the stop signal (cancelled),
//! 2. `min_samples` reached and `stability_threshold` elapsed (stable),
//! 3. `max_duration` elapsed (budget exhausted).
//!
//! A cycle is never interrupted once started.

use crate::core::cancel::StopSignal;
use crate::core::clock::Clock;
use crate::core::config::BenchConfig;
use crate::core::measurement::{Measurement, Sample, StopReason};
use crate::core::registry::Workload;
use crate::error::{BenchError, Phase};
use crate::harness::calibrator::CalibrationEstimate;
use std::time::Duration;
use tracing::{debug, warn};

/// Consecutive zero-length cycles tolerated before giving up on a workload.
const MAX_EMPTY_CYCLES: u32 = 1_000;

/// Measures a calibrated workload until it is stable, out of budget,
/// cancelled or failed.
///
/// A failing cycle is discarded; samples from earlier cycles are kept and
/// the measurement ends with [`StopReason::Failed`]. A cycle the clock
/// cannot resolve is dropped with a warning, so every sample has a nonzero
/// duration.
pub fn measure<C: Clock + ?Sized>(
    clock: &C,
    workload: &mut Workload,
    estimate: &CalibrationEstimate,
    config: &BenchConfig,
    stop: &StopSignal,
) -> Measurement {
    let iterations = estimate.iterations_per_cycle.max(1);
    let mut samples = Vec::new();

    for cycle in 0..config.warmup_cycles {
        if stop.should_stop(clock.now()) {
            return finish(workload, samples, Duration::ZERO, StopReason::Cancelled);
        }
        if let Err(message) = workload.run_cycle(iterations) {
            warn!(workload = workload.name(), cycle, "warm-up failed: {}", message);
            let err = BenchError::invocation(workload.name(), Phase::Warmup, message);
            return finish(workload, samples, Duration::ZERO, StopReason::Failed(err));
        }
    }

    let started = clock.now();
    let mut empty_cycles: u32 = 0;
    let stop_reason = loop {
        let now = clock.now();
        if stop.should_stop(now) {
            break StopReason::Cancelled;
        }

        let elapsed = now.saturating_duration_since(started);
        if samples.len() >= config.min_samples && elapsed >= config.stability_threshold {
            break StopReason::Stable;
        }
        if elapsed >= config.max_duration {
            break StopReason::BudgetExhausted;
        }

        let cycle_start = clock.now();
        if let Err(message) = workload.run_cycle(iterations) {
            warn!(
                workload = workload.name(),
                completed = samples.len(),
                "cycle aborted: {}",
                message
            );
            let err = BenchError::invocation(workload.name(), Phase::Measurement, message);
            break StopReason::Failed(err);
        }
        let cycle_duration = clock.elapsed(cycle_start);
        if cycle_duration.is_zero() {
            empty_cycles += 1;
            warn!(
                workload = workload.name(),
                iterations, "cycle below clock resolution, sample dropped"
            );
            if empty_cycles >= MAX_EMPTY_CYCLES {
                break StopReason::BudgetExhausted;
            }
            continue;
        }
        empty_cycles = 0;

        let sample = Sample::new(cycle_duration, iterations);
        debug!(
            workload = workload.name(),
            rate = sample.rate(),
            "cycle {} took {:?}",
            samples.len(),
            sample.cycle_duration
        );
        samples.push(sample);
    };

    finish(workload, samples, clock.elapsed(started), stop_reason)
}

fn finish(
    workload: &Workload,
    samples: Vec<Sample>,
    elapsed: Duration,
    stop_reason: StopReason,
) -> Measurement {
    debug!(
        workload = workload.name(),
        samples = samples.len(),
        reason = stop_reason.as_str(),
        "measurement finished after {:?}",
        elapsed
    );
    Measurement {
        workload_name: workload.name().to_string(),
        samples,
        elapsed,
        stop_reason,
    }
}
