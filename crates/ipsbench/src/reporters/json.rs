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

//! JSON export for run reports.

use crate::harness::runner::RunReport;
use std::fs;
use std::io;
use std::path::Path;

/// Serializes a report as pretty-printed JSON.
pub fn to_json(report: &RunReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Exports a report as JSON.
///
/// # Arguments
///
/// * `report` - The run report to export
/// * `path` - Output file path
pub fn export_json(report: &RunReport, path: &Path) -> io::Result<()> {
    let json = to_json(report).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    fs::write(path, json)?;
    Ok(())
}
