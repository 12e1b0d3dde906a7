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

//! End-to-end harness tests on the real monotonic clock.
//!
//! Workloads here sleep or spin for known durations, so assertions leave
//! room for scheduler noise.

use ipsbench::{BenchConfig, BenchError, Harness, StopSignal, WorkloadStatus};
use std::hint::black_box;
use std::thread;
use std::time::{Duration, Instant};

// ===== Test Helpers =====

/// Short windows so each workload finishes in well under a second.
fn quick_config() -> BenchConfig {
    BenchConfig::default()
        .with_calibration_window(Duration::from_millis(50))
        .with_min_samples(3)
        .with_stability_threshold(Duration::from_millis(60))
        .with_max_duration(Duration::from_secs(2))
}

/// Busy-waits for `duration`. Steadier than sleeping for sub-millisecond work.
fn spin(duration: Duration) {
    let start = Instant::now();
    while start.elapsed() < duration {
        std::hint::spin_loop();
    }
}

// ===== Ranking =====

#[test]
fn test_fast_workload_ranks_first() {
    let mut harness = Harness::new();
    harness
        .register("slow", || thread::sleep(Duration::from_millis(1)))
        .unwrap();
    harness
        .register("fast", || {
            black_box((0..16u64).sum::<u64>());
        })
        .unwrap();

    let report = harness.run(&quick_config()).unwrap();

    assert_eq!(report.comparison.order(), vec!["fast", "slow"]);
    assert_eq!(report.comparison.baseline.as_deref(), Some("fast"));
    assert_eq!(report.comparison.ratio("fast"), Some(1.0));

    let slow_ratio = report.comparison.ratio("slow").unwrap();
    assert!(slow_ratio < 0.1, "slow/fast ratio was {}", slow_ratio);

    for name in ["fast", "slow"] {
        let workload = report.workload(name).unwrap();
        assert_eq!(workload.status, WorkloadStatus::Completed, "{}", name);
        assert_eq!(workload.stop_reason.as_deref(), Some("stable"));
        let summary = workload.summary.as_ref().unwrap();
        assert!(summary.sample_count >= 3);
        assert!(summary.margin_of_error.is_some());
        assert!(workload.calibration.as_ref().unwrap().reached_target);
    }

    // 1ms per call cannot exceed 1000 i/s.
    assert!(report.summary("slow").unwrap().mean_rate <= 1000.0);
}

#[test]
fn test_equal_workloads_have_ratio_near_one() {
    let mut harness = Harness::new();
    harness
        .register("a", || thread::sleep(Duration::from_millis(1)))
        .unwrap();
    harness
        .register("b", || thread::sleep(Duration::from_millis(1)))
        .unwrap();

    let report = harness.run(&quick_config()).unwrap();

    assert_eq!(report.comparison.ranking.len(), 2);
    let runner_up = &report.comparison.ranking[1];
    let ratio = runner_up.ratio.unwrap();
    assert!((0.95..=1.0).contains(&ratio), "ratio was {}", ratio);
    assert_eq!(runner_up.overlaps_baseline, Some(true));
}

#[test]
fn test_baseline_override_is_ratio_one() {
    let mut harness = Harness::new();
    harness
        .register("fast", || spin(Duration::from_micros(50)))
        .unwrap();
    harness
        .register("slow", || spin(Duration::from_micros(400)))
        .unwrap();

    let report = harness
        .run(&quick_config().with_baseline("slow"))
        .unwrap();

    assert_eq!(report.comparison.baseline.as_deref(), Some("slow"));
    assert_eq!(report.comparison.ratio("slow"), Some(1.0));
    assert!(report.comparison.ratio("fast").unwrap() > 2.0);
    assert_eq!(report.comparison.order(), vec!["fast", "slow"]);
}

// ===== Failure Handling =====

#[test]
fn test_panicking_workload_does_not_abort_run() {
    let mut harness = Harness::new();
    harness
        .register("ok", || spin(Duration::from_micros(100)))
        .unwrap();
    let mut calls = 0u32;
    harness
        .register("explodes", move || {
            calls += 1;
            if calls > 3 {
                panic!("template cache corrupted");
            }
        })
        .unwrap();

    let report = harness.run(&quick_config()).unwrap();

    assert_eq!(report.workload("ok").unwrap().status, WorkloadStatus::Completed);
    match &report.workload("explodes").unwrap().status {
        WorkloadStatus::Failed { reason } => {
            assert!(reason.contains("explodes"), "{}", reason);
            assert!(reason.contains("template cache corrupted"), "{}", reason);
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(report.comparison.order(), vec!["ok"]);
}

#[test]
fn test_error_returning_workload_reports_phase() {
    let mut harness = Harness::new();
    harness
        .register_fallible("missing", || -> Result<(), String> {
            Err("no such template".to_string())
        })
        .unwrap();

    let report = harness.run(&quick_config()).unwrap();

    let missing = report.workload("missing").unwrap();
    assert!(missing.calibration.is_none());
    assert!(missing.summary.is_none());
    match &missing.status {
        WorkloadStatus::Failed { reason } => assert!(reason.contains("during calibration")),
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(report.comparison.ranking.is_empty());
    assert!(report.comparison.baseline.is_none());
}

#[test]
fn test_configuration_errors_before_any_invocation() {
    let cases = vec![
        quick_config().with_calibration_window(Duration::ZERO),
        quick_config().with_max_duration(Duration::ZERO),
        quick_config().with_confidence_level(1.0),
        quick_config().with_confidence_level(0.0),
        quick_config().with_max_calibration_rounds(0),
    ];

    for config in cases {
        let mut harness = Harness::new();
        harness.register("never", || panic!("invoked")).unwrap();
        assert!(matches!(
            harness.run(&config),
            Err(BenchError::InvalidConfig { .. })
        ));
    }
}

// ===== Cancellation =====

#[test]
fn test_expired_deadline_skips_everything() {
    let stop = StopSignal::new().with_deadline(Instant::now());
    let mut harness = Harness::new().with_stop_signal(stop);
    harness.register("a", || {}).unwrap();
    harness.register("b", || {}).unwrap();

    let report = harness.run(&quick_config()).unwrap();

    assert!(report.cancelled);
    for workload in &report.workloads {
        assert!(matches!(workload.status, WorkloadStatus::Skipped { .. }));
    }
    assert!(report.comparison.ranking.is_empty());
}

#[test]
fn test_stop_from_another_thread() {
    let mut harness = Harness::new();
    let stop = harness.stop_signal();
    harness
        .register("long", || thread::sleep(Duration::from_millis(1)))
        .unwrap();
    harness.register("never_started", || {}).unwrap();

    let stopper = thread::spawn(move || {
        thread::sleep(Duration::from_millis(150));
        stop.stop();
    });
    let config = quick_config()
        .with_min_samples(1_000)
        .with_max_duration(Duration::from_secs(30));
    let started = Instant::now();
    let report = harness.run(&config).unwrap();
    stopper.join().unwrap();

    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(report.cancelled);
    assert_eq!(
        report.workload("long").unwrap().stop_reason.as_deref(),
        Some("cancelled")
    );
    assert!(matches!(
        report.workload("never_started").unwrap().status,
        WorkloadStatus::Skipped { .. }
    ));
}
