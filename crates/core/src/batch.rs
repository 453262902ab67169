// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Batches: legacy grouping for periodic bulk dispatch by the planner.

use crate::issue::IssueId;
use serde::{Deserialize, Serialize};

crate::define_id! {
    pub struct BatchId;
}

/// `status ∈ {pending, running, completed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Pending,
    Running,
    Completed,
}

/// A planner-produced set of issues executed as a unit.
///
/// The greedy scheduler may operate without batches entirely; this exists so
/// that bulk-dispatch results can still be reported as a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    pub id: BatchId,
    pub issue_ids: Vec<IssueId>,
    pub status: BatchStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<u64>,
}

impl Batch {
    pub fn new(id: BatchId, issue_ids: Vec<IssueId>) -> Self {
        Self {
            id,
            issue_ids,
            status: BatchStatus::Pending,
            started_at: None,
            completed_at: None,
        }
    }

    pub fn start(&mut self, started_at: u64) {
        self.status = BatchStatus::Running;
        self.started_at = Some(started_at);
    }

    pub fn complete(&mut self, completed_at: u64) {
        self.status = BatchStatus::Completed;
        self.completed_at = Some(completed_at);
    }
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod tests;
