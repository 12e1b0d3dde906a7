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

//! External cancellation for a running harness.
//!
//! The signal is only consulted between cycles. A cycle that has started
//! always runs to completion so its timing stays intact.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Cloneable stop request with an optional deadline.
///
/// # Example
///
/// ```
/// use ipsbench::core::cancel::StopSignal;
/// use std::time::Instant;
///
/// let signal = StopSignal::new();
/// let handle = signal.clone();
/// assert!(!signal.should_stop(Instant::now()));
/// handle.stop();
/// assert!(signal.should_stop(Instant::now()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    stopped: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl StopSignal {
    /// Creates a signal that is not stopped and has no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops the run once `deadline` is reached.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Requests a stop. Visible to every clone.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// Returns whether an explicit stop was requested.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Returns the deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns whether the run should stop at `now`.
    pub fn should_stop(&self, now: Instant) -> bool {
        self.is_stopped() || self.deadline.is_some_and(|deadline| now >= deadline)
    }
}
