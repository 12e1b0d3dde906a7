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

//! Sample aggregation and statistics computation.
//!
//! Reduces a workload's samples to a [`Summary`]: mean rate, sample standard
//! deviation and a normal-approximation confidence interval
//! (`z * stddev / sqrt(n)`).

use crate::core::measurement::Sample;
use std::time::Duration;

/// Statistical summary of one workload's rates.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Summary {
    /// Workload the summary describes.
    pub workload_name: String,
    /// Arithmetic mean of the per-cycle rates (iterations/second).
    pub mean_rate: f64,
    /// Sample standard deviation of the rates.
    pub stddev_rate: f64,
    /// Number of samples aggregated.
    pub sample_count: usize,
    /// Half-width of the confidence interval. `None` when data is insufficient.
    pub margin_of_error: Option<f64>,
    /// Confidence level the margin was computed for.
    pub confidence_level: f64,
    /// Fewer samples than the configured minimum.
    pub insufficient_data: bool,
    /// Slowest cycle rate.
    pub min_rate: f64,
    /// Fastest cycle rate.
    pub max_rate: f64,
    /// Iterations across all samples.
    pub total_iterations: u64,
    /// Sum of cycle durations.
    pub total_time: Duration,
}

impl Summary {
    /// Returns whether the summary met the minimum sample count.
    pub fn is_sufficient(&self) -> bool {
        !self.insufficient_data
    }

    /// Returns `(low, high)` bounds of the confidence interval.
    pub fn confidence_interval(&self) -> Option<(f64, f64)> {
        self.margin_of_error
            .map(|margin| (self.mean_rate - margin, self.mean_rate + margin))
    }

    /// Margin of error as a percentage of the mean.
    pub fn relative_margin(&self) -> Option<f64> {
        match self.margin_of_error {
            Some(margin) if self.mean_rate > 0.0 => Some(margin / self.mean_rate * 100.0),
            _ => None,
        }
    }

    /// Standard deviation as a percentage of the mean.
    pub fn relative_stddev(&self) -> f64 {
        if self.mean_rate > 0.0 {
            self.stddev_rate / self.mean_rate * 100.0
        } else {
            0.0
        }
    }
}

/// Aggregates samples into a summary.
///
/// With fewer than `min_samples` samples the summary is flagged
/// insufficient: the mean is still computed from what exists (0 for no
/// samples) and the margin of error is `None`.
///
/// # Example
///
/// ```
/// use ipsbench::core::measurement::Sample;
/// use ipsbench::harness::aggregator::aggregate;
/// use std::time::Duration;
///
/// let samples = vec![Sample::new(Duration::from_secs(1), 100); 4];
/// let summary = aggregate("render", &samples, 2, 0.95);
/// assert_eq!(summary.mean_rate, 100.0);
/// assert_eq!(summary.stddev_rate, 0.0);
/// assert_eq!(summary.margin_of_error, Some(0.0));
/// ```
pub fn aggregate(
    workload_name: &str,
    samples: &[Sample],
    min_samples: usize,
    confidence_level: f64,
) -> Summary {
    let rates: Vec<f64> = samples.iter().map(Sample::rate).collect();
    let n = rates.len();

    let (mean_rate, stddev_rate) = mean_and_stddev(&rates);
    let insufficient_data = n == 0 || n < min_samples;
    let margin_of_error = if insufficient_data {
        None
    } else {
        Some(z_score(confidence_level) * stddev_rate / (n as f64).sqrt())
    };

    Summary {
        workload_name: workload_name.to_string(),
        mean_rate,
        stddev_rate,
        sample_count: n,
        margin_of_error,
        confidence_level,
        insufficient_data,
        min_rate: rates.iter().copied().reduce(f64::min).unwrap_or(0.0),
        max_rate: rates.iter().copied().reduce(f64::max).unwrap_or(0.0),
        total_iterations: samples.iter().map(|s| s.iterations).sum(),
        total_time: samples.iter().map(|s| s.cycle_duration).sum(),
    }
}

/// Mean and sample standard deviation (n - 1).
///
/// Values are shifted by the first element before summing, so identical
/// inputs give a mean equal to that input and a deviation of exactly zero.
fn mean_and_stddev(values: &[f64]) -> (f64, f64) {
    let Some(&shift) = values.first() else {
        return (0.0, 0.0);
    };
    let n = values.len() as f64;

    let (sum, sum_sq) = values.iter().fold((0.0, 0.0), |(sum, sum_sq), &v| {
        let d = v - shift;
        (sum + d, sum_sq + d * d)
    });
    let mean = shift + sum / n;

    if values.len() < 2 {
        return (mean, 0.0);
    }
    let variance = ((sum_sq - sum * sum / n) / (n - 1.0)).max(0.0);
    (mean, variance.sqrt())
}

/// Two-sided standard-normal critical value for a confidence level.
///
/// `z_score(0.95)` is 1.959964.
pub fn z_score(confidence_level: f64) -> f64 {
    inverse_normal_cdf((1.0 + confidence_level) / 2.0)
}

/// Rational approximation of the standard normal quantile function
/// (P. J. Acklam), relative error below 1.2e-9 on (0, 1).
fn inverse_normal_cdf(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];
    const P_LOW: f64 = 0.02425;

    let tail = |q: f64| {
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    };

    if p < P_LOW {
        tail((-2.0 * p.ln()).sqrt())
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        -tail((-2.0 * (1.0 - p).ln()).sqrt())
    }
}
