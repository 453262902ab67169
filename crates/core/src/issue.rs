// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Issue: the unit of work pulled from the external tracker.

use crate::attempt::AttemptRecord;
use crate::manifest::Manifest;
use crate::worker::WorkerId;
use serde::{Deserialize, Serialize};

crate::define_id! {
    pub struct IssueId;
}

/// `status ∈ {pending, assigned, running, completed, failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    Pending,
    Assigned,
    Running,
    Completed,
    Failed,
}

impl IssueStatus {
    /// True for the two states invariant 2/3 treat as "in flight".
    pub fn is_in_flight(self) -> bool {
        matches!(self, IssueStatus::Assigned | IssueStatus::Running)
    }
}

/// Opaque snapshot mirrored from the external tracker: title, description,
/// priority, type. The core never interprets these fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueContent {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: i64,
    #[serde(default)]
    pub issue_type: String,
}

/// One entry in an issue's append-only comment thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    pub body: String,
    pub wallclock_timestamp: u64,
}

/// An issue pulled from the external tracker and tracked by the core.
///
/// Created when first observed in the tracker (only if its tracker status is
/// `open` or `in_progress`); mutated by the scheduler (→ assigned), the
/// worker pool (→ running, → completed/failed), and the compliance engine
/// (records a violation attempt); never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: IssueId,
    pub status: IssueStatus,
    #[serde(default)]
    pub attempt_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_worker_id: Option<WorkerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<Manifest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_attempt: Option<AttemptRecord>,
    pub content: IssueContent,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Issue {
    pub fn new(id: IssueId, content: IssueContent) -> Self {
        Self {
            id,
            status: IssueStatus::Pending,
            attempt_count: 0,
            assigned_worker_id: None,
            manifest: None,
            last_attempt: None,
            content,
            comments: Vec::new(),
        }
    }

    pub fn assign(&mut self, worker_id: WorkerId) {
        self.status = IssueStatus::Assigned;
        self.assigned_worker_id = Some(worker_id);
    }

    pub fn start_running(&mut self) {
        self.status = IssueStatus::Running;
    }

    /// Records `record` as the (sole retained) attempt, bumps `attempt_count`,
    /// and transitions status to `completed` or `failed` per invariant 4.
    pub fn record_attempt(&mut self, record: AttemptRecord) {
        self.attempt_count += 1;
        self.status = if record.is_success() {
            IssueStatus::Completed
        } else {
            IssueStatus::Failed
        };
        self.last_attempt = Some(record);
        self.assigned_worker_id = None;
    }

    /// Returns the issue to `pending` with no assigned worker — used by crash
    /// recovery to undo an in-flight assignment (invariant 2 in §8).
    pub fn reset_to_pending(&mut self) {
        self.status = IssueStatus::Pending;
        self.assigned_worker_id = None;
    }

    pub fn add_comment(&mut self, comment: Comment) {
        self.comments.push(comment);
    }
}

#[cfg(test)]
#[path = "issue_tests.rs"]
mod tests;
