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

//! Workload registration.
//!
//! A [`WorkloadRegistry`] is owned by its harness; there is no process-wide
//! registry. Registration order is preserved and later used to break ranking
//! ties.

use crate::error::{BenchError, Result};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

type InvokeFn = Box<dyn FnMut() -> std::result::Result<(), String> + Send>;

/// A named zero-argument callable to benchmark.
pub struct Workload {
    name: String,
    invoke: InvokeFn,
}

impl Workload {
    /// Wraps an infallible closure.
    pub fn new<F>(name: impl Into<String>, mut f: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        Self {
            name: name.into(),
            invoke: Box::new(move || {
                f();
                Ok(())
            }),
        }
    }

    /// Wraps a closure that can report an error.
    pub fn fallible<F, E>(name: impl Into<String>, mut f: F) -> Self
    where
        F: FnMut() -> std::result::Result<(), E> + Send + 'static,
        E: fmt::Display,
    {
        Self {
            name: name.into(),
            invoke: Box::new(move || f().map_err(|e| e.to_string())),
        }
    }

    /// Returns the workload name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invokes the workload `iterations` times back to back.
    ///
    /// Stops at the first error. A panic is caught and reported as an error
    /// message, so a misbehaving workload cannot take the harness down.
    pub fn run_cycle(&mut self, iterations: u64) -> std::result::Result<(), String> {
        let invoke = &mut self.invoke;
        let outcome = panic::catch_unwind(AssertUnwindSafe(
            || -> std::result::Result<(), String> {
                for _ in 0..iterations {
                    invoke()?;
                }
                Ok(())
            },
        ));

        match outcome {
            Ok(result) => result,
            Err(payload) => Err(panic_message(payload.as_ref())),
        }
    }
}

impl fmt::Debug for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workload").field("name", &self.name).finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", msg)
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("panicked: {}", msg)
    } else {
        "panicked".to_string()
    }
}

/// Ordered collection of uniquely named workloads.
#[derive(Debug, Default)]
pub struct WorkloadRegistry {
    workloads: Vec<Workload>,
}

impl WorkloadRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a workload.
    ///
    /// # Errors
    ///
    /// [`BenchError::DuplicateWorkloadName`] if the name is taken and
    /// [`BenchError::InvalidConfig`] if it is empty.
    pub fn register(&mut self, workload: Workload) -> Result<()> {
        if workload.name.trim().is_empty() {
            return Err(BenchError::invalid_config(
                "name",
                "workload name must not be empty",
            ));
        }
        if self.contains(&workload.name) {
            return Err(BenchError::DuplicateWorkloadName {
                name: workload.name,
            });
        }
        self.workloads.push(workload);
        Ok(())
    }

    /// Returns whether a workload with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.workloads.iter().any(|w| w.name == name)
    }

    /// Returns the workload names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.workloads.iter().map(|w| w.name()).collect()
    }

    /// Returns the number of registered workloads.
    pub fn len(&self) -> usize {
        self.workloads.len()
    }

    /// Returns whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.workloads.is_empty()
    }

    /// Mutable access in registration order.
    pub fn workloads_mut(&mut self) -> &mut [Workload] {
        &mut self.workloads
    }

    /// Consumes the registry, yielding workloads in registration order.
    pub fn into_workloads(self) -> Vec<Workload> {
        self.workloads
    }
}
