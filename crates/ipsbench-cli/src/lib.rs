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

//! ipsbench CLI library for command-line parsing and execution.
//!
//! # Commands
//!
//! - **run**: calibrate, measure and compare the demo workloads
//! - **list**: show the demo workloads
//!
//! # Demo workloads
//!
//! The demo renders a product listing with the `liquid` template engine.
//! Each template is measured parsed-per-call and pre-parsed, with and
//! without a filter chain ([`demo`]).
//!
//! # Examples
//!
//! ```no_run
//! use ipsbench_cli::demo::{generate_products, register_demo_workloads};
//! use ipsbench::{BenchConfig, Harness};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), ipsbench_cli::error::CliError> {
//! let mut harness = Harness::new();
//! let names = vec!["render_template".to_string(), "render_template_pre".to_string()];
//! register_demo_workloads(&mut harness, &names, Arc::new(generate_products(100, 42)))?;
//! let report = harness.run(&BenchConfig::default())?;
//! println!("{:?}", report.comparison.order());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod commands;
pub mod demo;
pub mod error;
