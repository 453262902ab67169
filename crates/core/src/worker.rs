// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker slots: the fixed-size array the pool dispatches onto.

use crate::issue::IssueId;
use serde::{Deserialize, Serialize};

crate::define_id! {
    pub struct WorkerId;
}

/// Size of the fixed worker-slot array. `num_workers` (Counters) must be `<= MAX_WORKERS`.
pub const MAX_WORKERS: usize = 8;

/// `status ∈ {idle, starting, running, completed, failed, timeout}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerStatus {
    Idle,
    Starting,
    Running,
    Completed,
    Failed,
    Timeout,
}

impl WorkerStatus {
    /// Slot is available for dispatch when idle, completed, or failed.
    pub fn is_available(self) -> bool {
        matches!(
            self,
            WorkerStatus::Idle | WorkerStatus::Completed | WorkerStatus::Failed
        )
    }
}

/// One entry in the fixed `MAX_WORKERS`-sized slot array.
///
/// Invariant 3 (§3): `current_issue_id` is `Some` iff `status` is `starting`
/// or `running`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerSlot {
    pub id: WorkerId,
    pub status: WorkerStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_issue_id: Option<IssueId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_pid: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<u64>,
}

impl WorkerSlot {
    pub fn idle(id: WorkerId) -> Self {
        Self {
            id,
            status: WorkerStatus::Idle,
            current_issue_id: None,
            process_pid: None,
            started_at: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status.is_available()
    }

    /// Claims the slot for `issue_id`; status becomes `starting`.
    pub fn start(&mut self, issue_id: IssueId, started_at: u64) {
        self.status = WorkerStatus::Starting;
        self.current_issue_id = Some(issue_id);
        self.started_at = Some(started_at);
        self.process_pid = None;
    }

    pub fn mark_running(&mut self, pid: u32) {
        self.status = WorkerStatus::Running;
        self.process_pid = Some(pid);
    }

    /// Releases the slot back to the available pool with a terminal status,
    /// clearing `current_issue_id` per invariant 3.
    pub fn finish(&mut self, status: WorkerStatus) {
        debug_assert!(status.is_available() || status == WorkerStatus::Timeout);
        self.status = status;
        self.current_issue_id = None;
        self.process_pid = None;
        self.started_at = None;
    }

    /// Used by crash recovery: force the slot back to `idle` regardless of
    /// its previous status (§8 property 2, Scenario F).
    pub fn reset(&mut self) {
        self.status = WorkerStatus::Idle;
        self.current_issue_id = None;
        self.process_pid = None;
        self.started_at = None;
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
