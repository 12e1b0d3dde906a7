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

//! Statistics benchmarks.
//!
//! Measures the post-processing stages that run after sampling: aggregation
//! of per-cycle samples and ranking of summaries.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ipsbench::harness::aggregator::{aggregate, z_score, Summary};
use ipsbench::harness::comparator::compare;
use ipsbench::Sample;
use std::time::Duration;

fn make_samples(count: usize) -> Vec<Sample> {
    (0..count)
        .map(|i| Sample::new(Duration::from_micros(10_000 + (i as u64 * 37) % 500), 1_000))
        .collect()
}

fn make_summaries(count: usize) -> Vec<Summary> {
    (0..count)
        .map(|i| aggregate(&format!("workload_{}", i), &make_samples(8 + i % 5), 2, 0.95))
        .collect()
}

// ============================================================================
// Aggregation
// ============================================================================

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");

    for count in [2usize, 50, 1_000] {
        let samples = make_samples(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &samples, |b, samples| {
            b.iter(|| aggregate(black_box("w"), black_box(samples), 2, 0.95))
        });
    }

    group.finish();
}

fn bench_z_score(c: &mut Criterion) {
    c.bench_function("z_score", |b| b.iter(|| z_score(black_box(0.95))));
}

// ============================================================================
// Comparison
// ============================================================================

fn bench_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("compare");

    for count in [2usize, 10, 100] {
        let summaries = make_summaries(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &summaries, |b, summaries| {
            b.iter(|| compare(black_box(summaries), None))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_aggregate, bench_z_score, bench_compare);
criterion_main!(benches);
