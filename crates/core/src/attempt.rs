// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Attempt records: the outcome of one worker pass over an issue.

use crate::instrumentation::Instrumentation;
use serde::{Deserialize, Serialize};

/// Outcome of a single implement-review-squash attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptResult {
    Success,
    Failed,
    Timeout,
    Violation,
}

/// `{attempt_number, wallclock_timestamp, result, files_touched, notes, instrumentation}`.
///
/// The core retains only the most recent attempt per issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub attempt_number: u32,
    pub wallclock_timestamp: u64,
    pub result: AttemptResult,
    #[serde(default)]
    pub files_touched: Vec<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instrumentation: Option<Instrumentation>,
}

impl AttemptRecord {
    pub fn new(attempt_number: u32, wallclock_timestamp: u64, result: AttemptResult) -> Self {
        Self {
            attempt_number,
            wallclock_timestamp,
            result,
            files_touched: Vec::new(),
            notes: String::new(),
            instrumentation: None,
        }
    }

    pub fn with_files_touched(mut self, files: Vec<String>) -> Self {
        self.files_touched = files;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_instrumentation(mut self, instrumentation: Instrumentation) -> Self {
        self.instrumentation = Some(instrumentation);
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(self.result, AttemptResult::Success)
    }
}

#[cfg(test)]
#[path = "attempt_tests.rs"]
mod tests;
