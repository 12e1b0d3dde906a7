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

//! `ipsbench run`

use crate::cli::{OutputFormat, RunArgs};
use crate::demo::{generate_products, register_demo_workloads};
use crate::error::CliError;
use ipsbench::reporters::{export_json, to_json, write_report};
use ipsbench::{Harness, StopSignal};
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// Benchmarks the selected demo workloads and writes the report to `out`.
///
/// Workload failures are part of the report and do not make this fail.
///
/// # Errors
///
/// Invalid configuration, unknown workload or baseline names, and output
/// failures.
pub fn run<W: Write>(args: &RunArgs, out: &mut W) -> Result<(), CliError> {
    let config = args.to_config();

    let mut stop = StopSignal::new();
    if let Some(secs) = args.time_limit_secs {
        stop = stop.with_deadline(Instant::now() + Duration::from_secs(secs));
    }

    let data = Arc::new(generate_products(args.products, args.seed));
    let mut harness = Harness::new().with_stop_signal(stop);
    register_demo_workloads(&mut harness, &args.workloads, data)?;

    info!(
        workloads = harness.workload_names().len(),
        products = args.products,
        seed = args.seed,
        "benchmarking demo workloads"
    );
    let report = harness.run(&config)?;

    match args.format {
        OutputFormat::Console => write_report(out, &report).map_err(CliError::output)?,
        OutputFormat::Json => writeln!(out, "{}", to_json(&report)?).map_err(CliError::output)?,
    }

    if let Some(path) = &args.output {
        export_json(&report, path).map_err(|e| CliError::io_error(path, e))?;
        info!(path = %path.display(), "report written");
    }
    Ok(())
}
