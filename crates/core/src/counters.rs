// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-project monotonic counters, persisted by the state store.

use serde::{Deserialize, Serialize};

/// `{total_iterations, successful_completions, failed_attempts, next_batch_id,
/// num_workers}`. All but `num_workers` are monotonically increasing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Counters {
    #[serde(default)]
    pub total_iterations: u64,
    #[serde(default)]
    pub successful_completions: u64,
    #[serde(default)]
    pub failed_attempts: u64,
    #[serde(default)]
    pub next_batch_id: u64,
    pub num_workers: usize,
}

impl Counters {
    pub fn new(num_workers: usize) -> Self {
        Self {
            total_iterations: 0,
            successful_completions: 0,
            failed_attempts: 0,
            next_batch_id: 1,
            num_workers,
        }
    }

    pub fn record_iteration(&mut self) {
        self.total_iterations += 1;
    }

    pub fn record_success(&mut self) {
        self.successful_completions += 1;
    }

    pub fn record_failure(&mut self) {
        self.failed_attempts += 1;
    }

    /// Allocates and returns the next batch number, bumping the counter.
    pub fn take_next_batch_id(&mut self) -> u64 {
        let id = self.next_batch_id;
        self.next_batch_id += 1;
        id
    }
}

impl Default for Counters {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
#[path = "counters_tests.rs"]
mod tests;
