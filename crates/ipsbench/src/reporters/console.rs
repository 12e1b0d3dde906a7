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

//! Console reporter for run results.
//!
//! Plain text, one line per workload followed by a comparison block:
//!
//! ```text
//! Calculating -------------------------------------
//!    render_template_pre      4.567k (± 1.0%) i/s -     45.670k in   5.001s
//!        render_template      1.234k (± 2.1%) i/s -     12.340k in   5.002s
//!
//! Comparison:
//!    render_template_pre:     4567.0 i/s
//!        render_template:     1234.0 i/s - 3.70x  slower
//! ```

use crate::harness::comparator::{ComparisonResult, RankedEntry};
use crate::harness::runner::{RunReport, WorkloadReport, WorkloadStatus};
use std::io::{self, Write};

const NAME_WIDTH: usize = 22;

/// Writes the full report.
pub fn write_report<W: Write>(out: &mut W, report: &RunReport) -> io::Result<()> {
    writeln!(out, "Calculating {}", "-".repeat(37))?;
    for workload in &report.workloads {
        write_workload(out, workload)?;
    }
    if report.cancelled {
        writeln!(out, "(run cancelled, results are partial)")?;
    }
    writeln!(out)?;
    write_comparison(out, &report.comparison)
}

/// Prints the full report to stdout.
pub fn print_report(report: &RunReport) -> io::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_report(&mut lock, report)
}

fn write_workload<W: Write>(out: &mut W, workload: &WorkloadReport) -> io::Result<()> {
    let name = &workload.name;
    match (&workload.status, &workload.summary) {
        (WorkloadStatus::Skipped { reason }, _) => {
            writeln!(out, "{:>width$} skipped: {}", name, reason, width = NAME_WIDTH)
        }
        (WorkloadStatus::Failed { reason }, _) => {
            writeln!(out, "{:>width$} FAILED: {}", name, reason, width = NAME_WIDTH)
        }
        (_, None) => writeln!(out, "{:>width$} no result", name, width = NAME_WIDTH),
        (status, Some(summary)) => {
            let spread = summary
                .relative_margin()
                .map(|pct| format!("(± {:.1}%)", pct))
                .unwrap_or_else(|| "(± n/a)".to_string());
            write!(
                out,
                "{:>width$} {:>10} {:>9} i/s - {:>10} in {:>7.3}s",
                name,
                format_rate(summary.mean_rate),
                spread,
                format_rate(summary.total_iterations as f64),
                summary.total_time.as_secs_f64(),
                width = NAME_WIDTH
            )?;
            if let WorkloadStatus::InsufficientData { collected, required } = status {
                write!(
                    out,
                    " [insufficient data: {}/{} samples]",
                    collected, required
                )?;
            }
            writeln!(out)
        }
    }
}

/// Writes the comparison block.
pub fn write_comparison<W: Write>(out: &mut W, comparison: &ComparisonResult) -> io::Result<()> {
    if comparison.ranking.len() < 2 {
        return Ok(());
    }
    writeln!(out, "Comparison:")?;
    for entry in &comparison.ranking {
        write_entry(out, entry, comparison.baseline.as_deref())?;
    }
    writeln!(out)
}

fn write_entry<W: Write>(out: &mut W, entry: &RankedEntry, baseline: Option<&str>) -> io::Result<()> {
    let summary = &entry.summary;
    write!(
        out,
        "{:>width$}: {:>10.1} i/s",
        summary.workload_name,
        summary.mean_rate,
        width = NAME_WIDTH
    )?;

    if baseline == Some(summary.workload_name.as_str()) {
        return writeln!(out);
    }
    if entry.overlaps_baseline == Some(true) {
        return writeln!(out, " - same-ish: difference falls within error");
    }
    match entry.ratio {
        Some(ratio) if ratio > 1.0 => writeln!(out, " - {:.2}x  faster", ratio),
        Some(ratio) if ratio > 0.0 => writeln!(out, " - {:.2}x  slower", 1.0 / ratio),
        _ => writeln!(out, " - ratio undefined"),
    }
}

/// Scales a number with a k/M/B/T suffix, keeping four significant digits.
///
/// ```
/// use ipsbench::reporters::console::format_rate;
///
/// assert_eq!(format_rate(999.0), "999.000");
/// assert_eq!(format_rate(1_234.0), "1.234k");
/// assert_eq!(format_rate(2_500_000.0), "2.500M");
/// ```
pub fn format_rate(value: f64) -> String {
    const UNITS: [&str; 5] = ["", "k", "M", "B", "T"];
    if !value.is_finite() {
        return value.to_string();
    }

    let mut scaled = value;
    let mut unit = 0;
    while scaled.abs() >= 1000.0 && unit < UNITS.len() - 1 {
        scaled /= 1000.0;
        unit += 1;
    }
    format!("{:.3}{}", scaled, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::aggregator::Summary;
    use crate::harness::comparator::compare;
    use std::time::Duration;

    fn summary(name: &str, mean: f64, margin: Option<f64>) -> Summary {
        Summary {
            workload_name: name.to_string(),
            mean_rate: mean,
            stddev_rate: 0.0,
            sample_count: 5,
            margin_of_error: margin,
            confidence_level: 0.95,
            insufficient_data: margin.is_none(),
            min_rate: mean,
            max_rate: mean,
            total_iterations: (mean * 5.0) as u64,
            total_time: Duration::from_secs(5),
        }
    }

    fn completed(summary: Summary) -> WorkloadReport {
        WorkloadReport {
            name: summary.workload_name.clone(),
            status: WorkloadStatus::Completed,
            calibration: None,
            summary: Some(summary),
            stop_reason: Some("stable".to_string()),
        }
    }

    fn render(report: &RunReport) -> String {
        let mut buf = Vec::new();
        write_report(&mut buf, report).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(0.0), "0.000");
        assert_eq!(format_rate(12.5), "12.500");
        assert_eq!(format_rate(1_000.0), "1.000k");
        assert_eq!(format_rate(45_678.0), "45.678k");
        assert_eq!(format_rate(3_000_000_000.0), "3.000B");
    }

    #[test]
    fn test_report_with_comparison() {
        let fast = summary("pre", 4000.0, Some(40.0));
        let slow = summary("parse", 1000.0, Some(10.0));
        let comparison = compare(&[slow.clone(), fast.clone()], None).unwrap();
        let report = RunReport {
            workloads: vec![completed(slow), completed(fast)],
            comparison,
            cancelled: false,
        };

        let text = render(&report);

        assert!(text.starts_with("Calculating"));
        assert!(text.contains("4.000k"));
        assert!(text.contains("(± 1.0%) i/s"));
        assert!(text.contains("Comparison:"));
        assert!(text.contains("4.00x  slower"));
        let pre_pos = text.rfind("pre:").unwrap();
        let parse_pos = text.rfind("parse:").unwrap();
        assert!(pre_pos < parse_pos, "fastest listed first:\n{}", text);
    }

    #[test]
    fn test_report_same_ish() {
        let a = summary("a", 1000.0, Some(50.0));
        let b = summary("b", 990.0, Some(50.0));
        let comparison = compare(&[a.clone(), b.clone()], None).unwrap();
        let report = RunReport {
            workloads: vec![completed(a), completed(b)],
            comparison,
            cancelled: false,
        };

        assert!(render(&report).contains("same-ish"));
    }

    #[test]
    fn test_report_failed_and_skipped() {
        let report = RunReport {
            workloads: vec![
                WorkloadReport {
                    name: "broken".to_string(),
                    status: WorkloadStatus::Failed {
                        reason: "Workload 'broken' failed during calibration: x".to_string(),
                    },
                    calibration: None,
                    summary: None,
                    stop_reason: None,
                },
                WorkloadReport {
                    name: "later".to_string(),
                    status: WorkloadStatus::Skipped {
                        reason: "run cancelled".to_string(),
                    },
                    calibration: None,
                    summary: None,
                    stop_reason: None,
                },
            ],
            comparison: ComparisonResult::default(),
            cancelled: true,
        };

        let text = render(&report);
        assert!(text.contains("broken FAILED: Workload 'broken' failed during calibration"));
        assert!(text.contains("later skipped: run cancelled"));
        assert!(text.contains("run cancelled, results are partial"));
        assert!(!text.contains("Comparison:"));
    }

    #[test]
    fn test_insufficient_data_flagged() {
        let thin = summary("thin", 10.0, None);
        let report = RunReport {
            workloads: vec![WorkloadReport {
                name: "thin".to_string(),
                status: WorkloadStatus::InsufficientData {
                    collected: 1,
                    required: 2,
                },
                calibration: None,
                summary: Some(thin),
                stop_reason: Some("budget_exhausted".to_string()),
            }],
            comparison: ComparisonResult::default(),
            cancelled: false,
        };

        let text = render(&report);
        assert!(text.contains("(± n/a)"));
        assert!(text.contains("[insufficient data: 1/2 samples]"));
    }
}
