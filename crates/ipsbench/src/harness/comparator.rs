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

//! Workload ranking and baseline comparison.
//!
//! Ranks summaries by mean rate and expresses every workload as a ratio of
//! the baseline's mean rate.

use crate::error::{BenchError, Result};
use crate::harness::aggregator::Summary;

/// One workload's position in the ranking.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RankedEntry {
    /// 1-based rank, 1 being the fastest.
    pub rank: usize,
    /// The workload's summary.
    pub summary: Summary,
    /// `mean_rate / baseline.mean_rate`. Exactly 1.0 for the baseline itself.
    pub ratio: Option<f64>,
    /// Whether the confidence intervals of this workload and the baseline
    /// overlap. `None` when either interval is undefined.
    pub overlaps_baseline: Option<bool>,
}

impl RankedEntry {
    /// How many times slower than the baseline (`1 / ratio`).
    pub fn slowdown(&self) -> Option<f64> {
        self.ratio.filter(|r| *r > 0.0).map(|r| 1.0 / r)
    }
}

/// Ranking of all compared workloads.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct ComparisonResult {
    /// Name of the baseline workload. `None` when nothing was compared.
    pub baseline: Option<String>,
    /// Entries by mean rate, fastest first.
    pub ranking: Vec<RankedEntry>,
}

impl ComparisonResult {
    /// Looks up a workload's entry.
    pub fn entry(&self, name: &str) -> Option<&RankedEntry> {
        self.ranking
            .iter()
            .find(|e| e.summary.workload_name == name)
    }

    /// Looks up a workload's ratio against the baseline.
    pub fn ratio(&self, name: &str) -> Option<f64> {
        self.entry(name).and_then(|e| e.ratio)
    }

    /// Names in rank order.
    pub fn order(&self) -> Vec<&str> {
        self.ranking
            .iter()
            .map(|e| e.summary.workload_name.as_str())
            .collect()
    }
}

/// Ranks summaries and computes ratios against a baseline.
///
/// `summaries` must be in registration order; equal mean rates keep that
/// order. The baseline is `baseline` if given, otherwise the fastest
/// workload with sufficient data, otherwise the fastest workload.
///
/// # Errors
///
/// [`BenchError::UnknownBaseline`] if `baseline` names no summary.
pub fn compare(summaries: &[Summary], baseline: Option<&str>) -> Result<ComparisonResult> {
    let mut ordered: Vec<&Summary> = summaries.iter().collect();
    // Stable sort: ties keep registration order.
    ordered.sort_by(|a, b| b.mean_rate.total_cmp(&a.mean_rate));

    let baseline_summary = match baseline {
        Some(name) => Some(
            *ordered
                .iter()
                .find(|s| s.workload_name == name)
                .ok_or_else(|| BenchError::UnknownBaseline {
                    name: name.to_string(),
                })?,
        ),
        None => ordered
            .iter()
            .find(|s| s.is_sufficient())
            .or_else(|| ordered.first())
            .copied(),
    };

    let Some(base) = baseline_summary else {
        return Ok(ComparisonResult::default());
    };
    let base_usable = base.is_sufficient() && base.mean_rate > 0.0 && base.mean_rate.is_finite();

    let ranking = ordered
        .into_iter()
        .enumerate()
        .map(|(i, summary)| {
            let is_base = summary.workload_name == base.workload_name;
            let ratio = if is_base {
                Some(1.0)
            } else if base_usable && summary.is_sufficient() {
                Some(summary.mean_rate / base.mean_rate)
            } else {
                None
            };
            let overlaps_baseline = match (summary.confidence_interval(), base.confidence_interval()) {
                (Some((lo, hi)), Some((base_lo, base_hi))) => Some(lo <= base_hi && base_lo <= hi),
                _ => None,
            };

            RankedEntry {
                rank: i + 1,
                summary: summary.clone(),
                ratio,
                overlaps_baseline,
            }
        })
        .collect();

    Ok(ComparisonResult {
        baseline: Some(base.workload_name.clone()),
        ranking,
    })
}
