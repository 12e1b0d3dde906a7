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

//! Structured error types for the ipsbench CLI.
//!
//! All command handlers return `Result<T, CliError>`; `main` prints the
//! error and exits with a failure code.

use ipsbench::BenchError;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The main error type for CLI operations.
#[derive(Error, Debug, Clone)]
pub enum CliError {
    /// Registration, configuration or run error from the harness.
    #[error(transparent)]
    Bench(#[from] BenchError),

    /// `--workload` named a workload the demo catalog does not have.
    #[error("Unknown workload '{name}' (available: {available})")]
    UnknownWorkload {
        /// Requested name
        name: String,
        /// Comma-separated catalog names
        available: String,
    },

    /// A demo template failed to parse.
    #[error("Template for '{workload}' failed to parse: {message}")]
    Template {
        /// Workload whose template failed
        workload: String,
        /// The parser's message
        message: String,
    },

    /// Product data could not be turned into template globals.
    #[error("Invalid template data: {message}")]
    Globals {
        /// The error message
        message: String,
    },

    /// JSON serialization error.
    #[error("JSON format error: {message}")]
    JsonFormat {
        /// The error message
        message: String,
    },

    /// File I/O failed.
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// The file path that caused the error
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// Writing to stdout failed.
    #[error("Failed to write output: {message}")]
    Output {
        /// The error message
        message: String,
    },
}

impl CliError {
    /// Creates an I/O error for a file path.
    pub fn io_error(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            message: source.to_string(),
        }
    }

    /// Creates a template error for a demo workload.
    pub fn template(workload: &str, source: &liquid::Error) -> Self {
        Self::Template {
            workload: workload.to_string(),
            message: source.to_string(),
        }
    }

    /// Creates an error for a failed write to stdout.
    pub fn output(source: io::Error) -> Self {
        Self::Output {
            message: source.to_string(),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonFormat {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bench_error_is_transparent() {
        let err: CliError = BenchError::NoWorkloads.into();
        assert_eq!(err.to_string(), "No workloads registered");
    }

    #[test]
    fn test_io_error_display() {
        let err = CliError::io_error(
            "out/report.json",
            io::Error::new(io::ErrorKind::NotFound, "missing directory"),
        );
        let msg = err.to_string();
        assert!(msg.contains("out/report.json"));
        assert!(msg.contains("missing directory"));
    }

    #[test]
    fn test_template_error_display() {
        let parse_err = liquid::ParserBuilder::with_stdlib()
            .build()
            .unwrap()
            .parse("{% endfor %}")
            .err()
            .expect("stray endfor must not parse");
        let err = CliError::template("render_template", &parse_err);
        let msg = err.to_string();
        assert!(msg.starts_with("Template for 'render_template' failed to parse: "));
        assert!(msg.contains("endfor"), "{}", msg);
    }
}
