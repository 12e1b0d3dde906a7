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

//! CLI command definitions and argument parsing.
//!
//! - [`Commands`]: top-level subcommands
//! - [`RunArgs`]: flags for `ipsbench run`, mapped onto a
//!   [`BenchConfig`](ipsbench::BenchConfig)

mod run;

use crate::commands;
use crate::error::CliError;
use clap::Subcommand;
use std::io;

pub use run::{OutputFormat, RunArgs};

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Benchmark the demo workloads and print a comparison
    ///
    /// Each selected workload is calibrated, measured until stable or out of
    /// budget, then ranked against the fastest (or the --baseline).
    Run(RunArgs),

    /// List the demo workloads
    List,
}

impl Commands {
    /// Executes the command, writing results to stdout.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the configuration is invalid, a requested workload
    /// or baseline does not exist, or output cannot be written.
    pub fn execute(self) -> Result<(), CliError> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        match self {
            Commands::Run(args) => commands::run(&args, &mut out),
            Commands::List => commands::list(&mut out),
        }
    }
}
