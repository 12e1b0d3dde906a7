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

//! Benchmark runner for executing workloads and collecting results.
//!
//! [`Harness`] owns its workloads, clock and stop signal. [`Harness::run`]
//! validates the configuration, optionally pre-checks every workload in
//! parallel, then calibrates and measures each workload in registration
//! order, one at a time.

use crate::core::cancel::StopSignal;
use crate::core::clock::{Clock, MonotonicClock};
use crate::core::config::BenchConfig;
use crate::core::measurement::StopReason;
use crate::core::registry::{Workload, WorkloadRegistry};
use crate::error::{BenchError, Phase, Result};
use crate::harness::aggregator::{aggregate, Summary};
use crate::harness::calibrator::{calibrate, CalibrationEstimate};
use crate::harness::comparator::{compare, ComparisonResult};
use crate::harness::measurer::measure;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{info, warn};

/// Final state of a workload after a run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WorkloadStatus {
    /// Measured with at least `min_samples` samples.
    Completed,
    /// Measured, but with fewer than `min_samples` samples.
    InsufficientData {
        /// Samples collected
        collected: usize,
        /// Configured minimum
        required: usize,
    },
    /// Failed during pre-check, calibration, warm-up or measurement.
    Failed {
        /// Error message naming the workload and phase
        reason: String,
    },
    /// Never started because the run was cancelled first.
    Skipped {
        /// Why the workload was skipped
        reason: String,
    },
}

impl WorkloadStatus {
    /// Returns a short label for reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkloadStatus::Completed => "completed",
            WorkloadStatus::InsufficientData { .. } => "insufficient data",
            WorkloadStatus::Failed { .. } => "failed",
            WorkloadStatus::Skipped { .. } => "skipped",
        }
    }

    /// Whether the workload takes part in the comparison.
    pub fn is_comparable(&self) -> bool {
        matches!(
            self,
            WorkloadStatus::Completed | WorkloadStatus::InsufficientData { .. }
        )
    }
}

/// Outcome of one workload.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WorkloadReport {
    /// Workload name.
    pub name: String,
    /// Final state.
    pub status: WorkloadStatus,
    /// Calibration result, if calibration completed.
    pub calibration: Option<CalibrationEstimate>,
    /// Summary of the completed samples, if measurement started.
    pub summary: Option<Summary>,
    /// Why sampling ended, if measurement started.
    pub stop_reason: Option<String>,
}

impl WorkloadReport {
    fn failed(name: &str, error: &BenchError, calibration: Option<CalibrationEstimate>) -> Self {
        Self {
            name: name.to_string(),
            status: WorkloadStatus::Failed {
                reason: error.to_string(),
            },
            calibration,
            summary: None,
            stop_reason: None,
        }
    }

    fn skipped(name: &str, reason: &str) -> Self {
        Self {
            name: name.to_string(),
            status: WorkloadStatus::Skipped {
                reason: reason.to_string(),
            },
            calibration: None,
            summary: None,
            stop_reason: None,
        }
    }

    /// Workload interrupted by the stop signal before it produced a sample.
    fn cancelled(name: &str, calibration: Option<CalibrationEstimate>) -> Self {
        Self {
            calibration,
            stop_reason: Some(StopReason::Cancelled.as_str().to_string()),
            ..Self::skipped(name, "run cancelled")
        }
    }
}

/// Results of a complete run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RunReport {
    /// Per-workload outcomes in registration order.
    pub workloads: Vec<WorkloadReport>,
    /// Ranking of all completed or insufficient-data workloads.
    pub comparison: ComparisonResult,
    /// Whether the stop signal ended the run early.
    pub cancelled: bool,
}

impl RunReport {
    /// Summaries keyed by workload name.
    pub fn summaries(&self) -> BTreeMap<&str, &Summary> {
        self.workloads
            .iter()
            .filter_map(|w| w.summary.as_ref().map(|s| (w.name.as_str(), s)))
            .collect()
    }

    /// Looks up a workload's summary.
    pub fn summary(&self, name: &str) -> Option<&Summary> {
        self.workload(name).and_then(|w| w.summary.as_ref())
    }

    /// Looks up a workload's report.
    pub fn workload(&self, name: &str) -> Option<&WorkloadReport> {
        self.workloads.iter().find(|w| w.name == name)
    }

    /// Reports of workloads that failed.
    pub fn failures(&self) -> impl Iterator<Item = &WorkloadReport> {
        self.workloads
            .iter()
            .filter(|w| matches!(w.status, WorkloadStatus::Failed { .. }))
    }
}

/// Owns a set of workloads and runs them.
///
/// # Example
///
/// ```no_run
/// use ipsbench::core::config::BenchConfig;
/// use ipsbench::harness::runner::Harness;
///
/// let mut harness = Harness::new();
/// harness.register("sum", || {
///     std::hint::black_box((0..100u64).sum::<u64>());
/// })?;
/// harness.register("product", || {
///     std::hint::black_box((1..20u64).product::<u64>());
/// })?;
///
/// let report = harness.run(&BenchConfig::default())?;
/// println!("fastest: {:?}", report.comparison.baseline);
/// # Ok::<(), ipsbench::BenchError>(())
/// ```
pub struct Harness<C: Clock = MonotonicClock> {
    registry: WorkloadRegistry,
    clock: C,
    stop: StopSignal,
}

impl Harness<MonotonicClock> {
    /// Creates a harness on the system monotonic clock.
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock)
    }
}

impl Default for Harness<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Harness<C> {
    /// Creates a harness on a custom clock.
    pub fn with_clock(clock: C) -> Self {
        Self {
            registry: WorkloadRegistry::new(),
            clock,
            stop: StopSignal::new(),
        }
    }

    /// Replaces the stop signal.
    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    /// Returns a handle that stops the run between cycles.
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Registers an infallible workload.
    pub fn register<F>(&mut self, name: impl Into<String>, f: F) -> Result<()>
    where
        F: FnMut() + Send + 'static,
    {
        self.registry.register(Workload::new(name, f))
    }

    /// Registers a workload that reports errors through its return value.
    pub fn register_fallible<F, E>(&mut self, name: impl Into<String>, f: F) -> Result<()>
    where
        F: FnMut() -> std::result::Result<(), E> + Send + 'static,
        E: fmt::Display,
    {
        self.registry.register(Workload::fallible(name, f))
    }

    /// Registered names in registration order.
    pub fn workload_names(&self) -> Vec<&str> {
        self.registry.names()
    }

    /// Runs every workload and compares the results.
    ///
    /// The harness is consumed; workloads are dropped when the run ends.
    ///
    /// # Errors
    ///
    /// Fails before invoking any workload if the configuration is invalid,
    /// the baseline is not registered, or no workloads are registered.
    /// Workload failures are recorded in the report instead.
    pub fn run(self, config: &BenchConfig) -> Result<RunReport> {
        config.validate()?;
        if self.registry.is_empty() {
            return Err(BenchError::NoWorkloads);
        }
        if let Some(baseline) = &config.baseline {
            if !self.registry.contains(baseline) {
                return Err(BenchError::UnknownBaseline {
                    name: baseline.clone(),
                });
            }
        }

        let Harness {
            registry,
            clock,
            stop,
        } = self;
        let mut workloads = registry.into_workloads();

        let precheck_failures = if config.precheck {
            precheck(&mut workloads)
        } else {
            vec![None; workloads.len()]
        };

        info!(workloads = workloads.len(), "starting run");

        let mut reports = Vec::with_capacity(workloads.len());
        let mut cancelled = false;

        for (workload, precheck_failure) in workloads.iter_mut().zip(precheck_failures) {
            if let Some(err) = precheck_failure {
                reports.push(WorkloadReport::failed(workload.name(), &err, None));
                continue;
            }
            if cancelled || stop.should_stop(clock.now()) {
                cancelled = true;
                reports.push(WorkloadReport::skipped(workload.name(), "run cancelled"));
                continue;
            }

            let report = run_workload(&clock, workload, config, &stop);
            if report.stop_reason.as_deref() == Some(StopReason::Cancelled.as_str()) {
                cancelled = true;
            }
            reports.push(report);
        }

        let comparable: Vec<Summary> = reports
            .iter()
            .filter(|r| r.status.is_comparable())
            .filter_map(|r| r.summary.clone())
            .collect();

        let baseline = config
            .baseline
            .as_deref()
            .filter(|name| comparable.iter().any(|s| s.workload_name == *name));
        if let (Some(requested), None) = (&config.baseline, baseline) {
            warn!(
                baseline = requested.as_str(),
                "baseline has no comparable result, falling back to fastest workload"
            );
        }
        let comparison = compare(&comparable, baseline)?;

        info!(
            baseline = comparison.baseline.as_deref().unwrap_or("-"),
            cancelled, "run finished"
        );

        Ok(RunReport {
            workloads: reports,
            comparison,
            cancelled,
        })
    }
}

/// Invokes each workload once, in parallel. Returns failures by position.
fn precheck(workloads: &mut [Workload]) -> Vec<Option<BenchError>> {
    workloads
        .par_iter_mut()
        .map(|workload| {
            workload.run_cycle(1).err().map(|message| {
                warn!(workload = workload.name(), "pre-check failed: {}", message);
                BenchError::invocation(workload.name(), Phase::Precheck, message)
            })
        })
        .collect()
}

fn run_workload<C: Clock>(
    clock: &C,
    workload: &mut Workload,
    config: &BenchConfig,
    stop: &StopSignal,
) -> WorkloadReport {
    let estimate = match calibrate(
        clock,
        workload,
        config.target_calibration_window,
        config.max_calibration_rounds,
        stop,
    ) {
        Ok(Some(estimate)) => estimate,
        Ok(None) => {
            info!(workload = workload.name(), "cancelled during calibration");
            return WorkloadReport::cancelled(workload.name(), None);
        }
        Err(err) => {
            warn!("{}", err);
            return WorkloadReport::failed(workload.name(), &err, None);
        }
    };

    let measurement = measure(clock, workload, &estimate, config, stop);
    if measurement.samples.is_empty() && measurement.stop_reason == StopReason::Cancelled {
        info!(workload = workload.name(), "cancelled before the first sample");
        return WorkloadReport::cancelled(workload.name(), Some(estimate));
    }
    let summary = aggregate(
        workload.name(),
        &measurement.samples,
        config.min_samples,
        config.confidence_level,
    );

    let status = match measurement.failure() {
        Some(err) => WorkloadStatus::Failed {
            reason: err.to_string(),
        },
        None if summary.insufficient_data => {
            let insufficient = BenchError::InsufficientSamples {
                workload: workload.name().to_string(),
                collected: summary.sample_count,
                required: config.min_samples,
            };
            warn!("{}", insufficient);
            WorkloadStatus::InsufficientData {
                collected: summary.sample_count,
                required: config.min_samples,
            }
        }
        None => WorkloadStatus::Completed,
    };

    info!(
        workload = workload.name(),
        status = status.as_str(),
        samples = summary.sample_count,
        "{:.1} i/s",
        summary.mean_rate
    );

    WorkloadReport {
        name: workload.name().to_string(),
        status,
        calibration: Some(estimate),
        summary: Some(summary),
        stop_reason: Some(measurement.stop_reason.as_str().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use std::time::Duration;

    fn fast_config() -> BenchConfig {
        BenchConfig::default()
            .with_calibration_window(Duration::from_millis(10))
            .with_min_samples(3)
            .with_stability_threshold(Duration::from_millis(30))
            .with_max_duration(Duration::from_secs(1))
    }

    fn ticking(harness: &mut Harness<ManualClock>, clock: &ManualClock, name: &str, per_call: Duration) {
        let tick = clock.clone();
        harness
            .register(name, move || tick.advance(per_call))
            .unwrap();
    }

    #[test]
    fn test_duplicate_registration() {
        let mut harness = Harness::new();
        harness.register("a", || {}).unwrap();
        assert!(matches!(
            harness.register("a", || {}),
            Err(BenchError::DuplicateWorkloadName { .. })
        ));
        assert_eq!(harness.workload_names(), vec!["a"]);
    }

    #[test]
    fn test_invalid_config_fails_before_invocation() {
        let mut harness = Harness::new();
        harness
            .register("never", || panic!("must not be invoked"))
            .unwrap();

        let err = harness
            .run(&BenchConfig::default().with_min_samples(0))
            .unwrap_err();
        assert!(matches!(err, BenchError::InvalidConfig { .. }));
    }

    #[test]
    fn test_unknown_baseline_fails_fast() {
        let mut harness = Harness::new();
        harness.register("a", || panic!("must not be invoked")).unwrap();

        let err = harness
            .run(&BenchConfig::default().with_baseline("b"))
            .unwrap_err();
        assert_eq!(err, BenchError::UnknownBaseline { name: "b".to_string() });
    }

    #[test]
    fn test_no_workloads() {
        let err = Harness::new().run(&BenchConfig::default()).unwrap_err();
        assert_eq!(err, BenchError::NoWorkloads);
    }

    #[test]
    fn test_ranks_deterministic_rates() {
        let clock = ManualClock::new();
        let mut harness = Harness::with_clock(clock.clone());
        ticking(&mut harness, &clock, "slow", Duration::from_micros(400));
        ticking(&mut harness, &clock, "fast", Duration::from_micros(100));

        let report = harness.run(&fast_config()).unwrap();

        assert_eq!(report.comparison.order(), vec!["fast", "slow"]);
        assert_eq!(report.comparison.baseline.as_deref(), Some("fast"));
        let fast = report.summary("fast").unwrap();
        assert!((fast.mean_rate - 10_000.0).abs() < 1e-6);
        assert_eq!(fast.stddev_rate, 0.0);
        assert!((report.comparison.ratio("slow").unwrap() - 0.25).abs() < 1e-9);
        assert!(!report.cancelled);
        assert_eq!(report.summaries().len(), 2);
    }

    #[test]
    fn test_failure_isolated_to_workload() {
        let clock = ManualClock::new();
        let mut harness = Harness::with_clock(clock.clone());
        ticking(&mut harness, &clock, "ok", Duration::from_micros(100));
        harness
            .register_fallible("broken", || Err("template missing"))
            .unwrap();

        let report = harness.run(&fast_config()).unwrap();

        assert_eq!(report.workload("ok").unwrap().status, WorkloadStatus::Completed);
        let broken = report.workload("broken").unwrap();
        match &broken.status {
            WorkloadStatus::Failed { reason } => {
                assert!(reason.contains("broken"));
                assert!(reason.contains("calibration"));
                assert!(reason.contains("template missing"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(report.comparison.order(), vec!["ok"]);
        assert_eq!(report.failures().count(), 1);
    }

    #[test]
    fn test_cancelled_run_skips_remaining() {
        let clock = ManualClock::new();
        let stop = StopSignal::new();
        let mut harness = Harness::with_clock(clock.clone()).with_stop_signal(stop.clone());
        let tick = clock.clone();
        let mut calls = 0u64;
        harness
            .register("first", move || {
                calls += 1;
                tick.advance(Duration::from_micros(100));
                // calibration uses 1 + 16 + 100 calls; stop during the second cycle
                if calls == 117 + 150 {
                    stop.stop();
                }
            })
            .unwrap();
        ticking(&mut harness, &clock, "second", Duration::from_micros(100));

        let report = harness.run(&fast_config()).unwrap();

        assert!(report.cancelled);
        let first = report.summary("first").unwrap();
        assert_eq!(first.sample_count, 2);
        assert_eq!(
            report.workload("second").unwrap().status,
            WorkloadStatus::Skipped {
                reason: "run cancelled".to_string()
            }
        );
        assert_eq!(report.comparison.order(), vec!["first"]);
    }

    #[test]
    fn test_cancelled_during_calibration() {
        let clock = ManualClock::new();
        let stop = StopSignal::new();
        let mut harness = Harness::with_clock(clock.clone()).with_stop_signal(stop.clone());
        let tick = clock.clone();
        let mut calls = 0u64;
        harness
            .register("first", move || {
                calls += 1;
                tick.advance(Duration::from_micros(100));
                // second calibration round, before the window is filled
                if calls == 5 {
                    stop.stop();
                }
            })
            .unwrap();
        ticking(&mut harness, &clock, "second", Duration::from_micros(100));

        let report = harness.run(&fast_config()).unwrap();

        assert!(report.cancelled);
        let first = report.workload("first").unwrap();
        assert_eq!(
            first.status,
            WorkloadStatus::Skipped {
                reason: "run cancelled".to_string()
            }
        );
        assert_eq!(first.stop_reason.as_deref(), Some("cancelled"));
        assert!(first.calibration.is_none());
        assert!(first.summary.is_none());
        assert!(!report.workload("second").unwrap().status.is_comparable());
        assert!(report.comparison.ranking.is_empty());
    }

    #[test]
    fn test_cancelled_before_first_sample() {
        let clock = ManualClock::new();
        let stop = StopSignal::new();
        let mut harness = Harness::with_clock(clock.clone()).with_stop_signal(stop.clone());
        let tick = clock.clone();
        let mut calls = 0u64;
        harness
            .register("first", move || {
                calls += 1;
                tick.advance(Duration::from_micros(100));
                // last call of calibration (1 + 16 + 100)
                if calls == 117 {
                    stop.stop();
                }
            })
            .unwrap();
        ticking(&mut harness, &clock, "second", Duration::from_micros(100));

        let report = harness.run(&fast_config()).unwrap();

        assert!(report.cancelled);
        let first = report.workload("first").unwrap();
        assert_eq!(
            first.status,
            WorkloadStatus::Skipped {
                reason: "run cancelled".to_string()
            }
        );
        assert_eq!(
            first.calibration.as_ref().map(|c| c.iterations_per_cycle),
            Some(100)
        );
        assert!(first.summary.is_none());
        assert!(report.summaries().is_empty());
        assert!(report.comparison.ranking.is_empty());
    }

    #[test]
    fn test_insufficient_data_reported() {
        let clock = ManualClock::new();
        let mut harness = Harness::with_clock(clock.clone());
        ticking(&mut harness, &clock, "thin", Duration::from_micros(100));
        let config = fast_config()
            .with_min_samples(50)
            .with_max_duration(Duration::from_millis(25));

        let report = harness.run(&config).unwrap();

        let thin = report.workload("thin").unwrap();
        assert_eq!(
            thin.status,
            WorkloadStatus::InsufficientData {
                collected: 3,
                required: 50
            }
        );
        let summary = thin.summary.as_ref().unwrap();
        assert_eq!(summary.margin_of_error, None);
        assert_eq!(thin.stop_reason.as_deref(), Some("budget_exhausted"));
        assert_eq!(report.comparison.order(), vec!["thin"]);
    }

    #[test]
    fn test_precheck_excludes_broken_workload() {
        let clock = ManualClock::new();
        let mut harness = Harness::with_clock(clock.clone());
        ticking(&mut harness, &clock, "ok", Duration::from_micros(100));
        harness.register("panics", || panic!("bad state")).unwrap();

        let report = harness.run(&fast_config().with_precheck(true)).unwrap();

        match &report.workload("panics").unwrap().status {
            WorkloadStatus::Failed { reason } => assert!(reason.contains("precheck")),
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(report.workload("panics").unwrap().calibration.is_none());
        assert_eq!(report.workload("ok").unwrap().status, WorkloadStatus::Completed);
    }
}
