// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The state-store's write-ahead log event type.
//!
//! Every mutation the core makes is first expressed as an `Event`, appended
//! to the WAL, and only then applied to the in-memory `MaterializedState`.
//! Handlers in [`crate::state::MaterializedState::apply_event`] must be
//! idempotent: an event may be re-applied during WAL replay after a crash.

use noface_core::{AttemptRecord, Comment, IssueContent, Manifest, WorkerStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    #[serde(rename = "issue:discovered")]
    IssueDiscovered { issue_id: String, content: IssueContent },

    #[serde(rename = "issue:manifest_set")]
    IssueManifestSet {
        issue_id: String,
        manifest: Manifest,
    },

    #[serde(rename = "issue:assigned")]
    IssueAssigned { issue_id: String, worker_id: String },

    #[serde(rename = "issue:started")]
    IssueStarted { issue_id: String },

    #[serde(rename = "issue:attempt_recorded")]
    IssueAttemptRecorded {
        issue_id: String,
        attempt: AttemptRecord,
    },

    #[serde(rename = "issue:reset_to_pending")]
    IssueResetToPending { issue_id: String },

    #[serde(rename = "issue:comment_added")]
    IssueCommentAdded { issue_id: String, comment: Comment },

    #[serde(rename = "issue:content_updated")]
    IssueContentUpdated {
        issue_id: String,
        content: IssueContent,
    },

    #[serde(rename = "worker:started")]
    WorkerStarted {
        worker_id: String,
        issue_id: String,
        started_at_ms: u64,
    },

    #[serde(rename = "worker:running")]
    WorkerRunning { worker_id: String, pid: u32 },

    #[serde(rename = "worker:finished")]
    WorkerFinished {
        worker_id: String,
        status: WorkerStatus,
    },

    #[serde(rename = "worker:reset")]
    WorkerReset { worker_id: String },

    #[serde(rename = "batch:created")]
    BatchCreated {
        batch_id: String,
        issue_ids: Vec<String>,
    },

    #[serde(rename = "batch:started")]
    BatchStarted { batch_id: String, started_at_ms: u64 },

    #[serde(rename = "batch:completed")]
    BatchCompleted {
        batch_id: String,
        completed_at_ms: u64,
    },

    #[serde(rename = "counters:iteration_recorded")]
    IterationRecorded,

    #[serde(rename = "counters:success_recorded")]
    SuccessRecorded,

    #[serde(rename = "counters:failure_recorded")]
    FailureRecorded,

    #[serde(rename = "project:initialized")]
    ProjectInitialized {
        project_name: String,
        num_workers: usize,
    },
}

/// Convenience constructor used by the compliance engine when recording a
/// violation (so callers don't need to hand-build the event by name).
pub fn attempt_event(issue_id: impl Into<String>, attempt: AttemptRecord) -> Event {
    Event::IssueAttemptRecorded {
        issue_id: issue_id.into(),
        attempt,
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
