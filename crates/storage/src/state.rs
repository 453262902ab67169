// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized state: the in-memory projection built by replaying the WAL.

use crate::event::Event;
use noface_core::{
    Batch, BatchId, BatchStatus, Counters, Issue, IssueId, IssueStatus, WorkerId, WorkerSlot,
    WorkerStatus, MAX_WORKERS,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// State derived from applying WAL events in order.
///
/// # Idempotency
///
/// Every `apply_event` arm MUST be idempotent: a crash can cause the same
/// event to be applied twice (once for immediate visibility, once during
/// WAL replay). Handlers use assignment rather than increment-in-place for
/// anything that isn't itself routed through a dedicated counter event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterializedState {
    pub project_name: String,
    pub issues: HashMap<String, Issue>,
    /// Insertion order, so listings are deterministic without re-sorting.
    #[serde(default)]
    pub issue_order: Vec<String>,
    /// Fixed `MAX_WORKERS`-sized slot array (§3: "fixed array of size MAX_WORKERS").
    pub workers: Vec<WorkerSlot>,
    #[serde(default)]
    pub batches: HashMap<String, Batch>,
    #[serde(default)]
    pub pending_batch_ids: Vec<String>,
    pub counters: Counters,
}

impl Default for MaterializedState {
    fn default() -> Self {
        let workers = (0..MAX_WORKERS)
            .map(|i| WorkerSlot::idle(WorkerId::new(format!("w{i}"))))
            .collect();

        Self {
            project_name: String::new(),
            issues: HashMap::new(),
            issue_order: Vec::new(),
            workers,
            batches: HashMap::new(),
            pending_batch_ids: Vec::new(),
            counters: Counters::default(),
        }
    }
}

impl MaterializedState {
    pub fn get_issue(&self, id: &str) -> Option<&Issue> {
        self.issues.get(id)
    }

    pub fn get_batch(&self, id: &str) -> Option<&Batch> {
        self.batches.get(id)
    }

    pub fn get_worker(&self, id: &str) -> Option<&WorkerSlot> {
        self.workers.iter().find(|w| w.id.as_str() == id)
    }

    fn get_worker_mut(&mut self, id: &str) -> Option<&mut WorkerSlot> {
        self.workers.iter_mut().find(|w| w.id.as_str() == id)
    }

    /// Every issue with `status = pending`, in insertion order.
    pub fn pending_issues(&self) -> impl Iterator<Item = &Issue> {
        self.issue_order
            .iter()
            .filter_map(move |id| self.issues.get(id))
            .filter(|issue| issue.status == IssueStatus::Pending)
    }

    /// Every issue currently `assigned` or `running`.
    pub fn in_flight_issues(&self) -> impl Iterator<Item = &Issue> {
        self.issues.values().filter(|i| i.status.is_in_flight())
    }

    pub fn available_worker(&self) -> Option<&WorkerSlot> {
        self.workers
            .iter()
            .take(self.counters.num_workers)
            .find(|w| w.is_available())
    }

    /// Applies `event`, deriving the next state. Must stay idempotent.
    pub fn apply_event(&mut self, event: &Event) {
        match event {
            Event::ProjectInitialized {
                project_name,
                num_workers,
            } => {
                self.project_name = project_name.clone();
                self.counters.num_workers = *num_workers;
            }

            Event::IssueDiscovered { issue_id, content } => {
                self.issues.entry(issue_id.clone()).or_insert_with(|| {
                    self.issue_order.push(issue_id.clone());
                    Issue::new(IssueId::new(issue_id.clone()), content.clone())
                });
            }

            Event::IssueManifestSet { issue_id, manifest } => {
                if let Some(issue) = self.issues.get_mut(issue_id) {
                    issue.manifest = Some(manifest.clone());
                }
            }

            Event::IssueAssigned {
                issue_id,
                worker_id,
            } => {
                if let Some(issue) = self.issues.get_mut(issue_id) {
                    issue.assign(WorkerId::new(worker_id.clone()));
                }
            }

            Event::IssueStarted { issue_id } => {
                if let Some(issue) = self.issues.get_mut(issue_id) {
                    issue.start_running();
                }
            }

            Event::IssueAttemptRecorded { issue_id, attempt } => {
                if let Some(issue) = self.issues.get_mut(issue_id) {
                    issue.record_attempt(attempt.clone());
                }
            }

            Event::IssueResetToPending { issue_id } => {
                if let Some(issue) = self.issues.get_mut(issue_id) {
                    issue.reset_to_pending();
                }
            }

            Event::IssueCommentAdded { issue_id, comment } => {
                if let Some(issue) = self.issues.get_mut(issue_id) {
                    if !issue.comments.contains(comment) {
                        issue.add_comment(comment.clone());
                    }
                }
            }

            Event::IssueContentUpdated { issue_id, content } => {
                if let Some(issue) = self.issues.get_mut(issue_id) {
                    issue.content = content.clone();
                }
            }

            Event::WorkerStarted {
                worker_id,
                issue_id,
                started_at_ms,
            } => {
                if let Some(slot) = self.get_worker_mut(worker_id) {
                    slot.start(IssueId::new(issue_id.clone()), *started_at_ms);
                }
            }

            Event::WorkerRunning { worker_id, pid } => {
                if let Some(slot) = self.get_worker_mut(worker_id) {
                    slot.mark_running(*pid);
                }
            }

            Event::WorkerFinished { worker_id, status } => {
                if let Some(slot) = self.get_worker_mut(worker_id) {
                    slot.finish(*status);
                }
            }

            Event::WorkerReset { worker_id } => {
                if let Some(slot) = self.get_worker_mut(worker_id) {
                    slot.reset();
                }
            }

            Event::BatchCreated {
                batch_id,
                issue_ids,
            } => {
                self.batches.entry(batch_id.clone()).or_insert_with(|| {
                    self.pending_batch_ids.push(batch_id.clone());
                    Batch::new(
                        BatchId::new(batch_id.clone()),
                        issue_ids.iter().map(|id| IssueId::new(id.clone())).collect(),
                    )
                });
            }

            Event::BatchStarted {
                batch_id,
                started_at_ms,
            } => {
                if let Some(batch) = self.batches.get_mut(batch_id) {
                    batch.start(*started_at_ms);
                }
                self.pending_batch_ids.retain(|id| id != batch_id);
            }

            Event::BatchCompleted {
                batch_id,
                completed_at_ms,
            } => {
                if let Some(batch) = self.batches.get_mut(batch_id) {
                    if batch.status != BatchStatus::Completed {
                        batch.complete(*completed_at_ms);
                    }
                }
            }

            Event::IterationRecorded => {
                self.counters.record_iteration();
            }

            Event::SuccessRecorded => {
                self.counters.record_success();
            }

            Event::FailureRecorded => {
                self.counters.record_failure();
            }
        }
    }

    /// Crash recovery pass (§5, §8 property 2, Scenario F): every slot that
    /// was `starting`/`running` is reset to `idle`, and its issue (if any)
    /// returns to `pending`. Returns the number of slots reset.
    pub fn reconcile_after_crash(&mut self) -> usize {
        let mut reset_count = 0;
        let stuck_issue_ids: Vec<String> = self
            .workers
            .iter()
            .filter(|w| matches!(w.status, WorkerStatus::Starting | WorkerStatus::Running))
            .filter_map(|w| w.current_issue_id.as_ref().map(|id| id.as_str().to_string()))
            .collect();

        for slot in self.workers.iter_mut() {
            if matches!(slot.status, WorkerStatus::Starting | WorkerStatus::Running) {
                slot.reset();
                reset_count += 1;
            }
        }

        for issue_id in stuck_issue_ids {
            if let Some(issue) = self.issues.get_mut(&issue_id) {
                issue.reset_to_pending();
            }
        }

        reset_count
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
