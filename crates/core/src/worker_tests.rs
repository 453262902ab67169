// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::issue::IssueId;

#[test]
fn idle_slot_is_available_and_unassigned() {
    let slot = WorkerSlot::idle(WorkerId::new("w0"));
    assert!(slot.is_available());
    assert!(slot.current_issue_id.is_none());
}

#[test]
fn start_claims_slot_and_disables_availability() {
    let mut slot = WorkerSlot::idle(WorkerId::new("w0"));
    slot.start(IssueId::new("X-1"), 100);
    assert_eq!(slot.status, WorkerStatus::Starting);
    assert_eq!(slot.current_issue_id, Some(IssueId::new("X-1")));
    assert!(!slot.is_available());
}

#[test]
fn finish_clears_issue_and_restores_availability() {
    let mut slot = WorkerSlot::idle(WorkerId::new("w0"));
    slot.start(IssueId::new("X-1"), 100);
    slot.mark_running(4242);
    slot.finish(WorkerStatus::Completed);

    assert!(slot.is_available());
    assert!(slot.current_issue_id.is_none());
    assert!(slot.process_pid.is_none());
}

#[test]
fn reset_forces_idle_from_any_state() {
    let mut slot = WorkerSlot::idle(WorkerId::new("w3"));
    slot.start(IssueId::new("X-7"), 100);
    slot.mark_running(99);
    slot.reset();

    assert_eq!(slot.status, WorkerStatus::Idle);
    assert!(slot.current_issue_id.is_none());
}

#[test]
fn max_workers_bounds_the_slot_array() {
    assert_eq!(MAX_WORKERS, 8);
}
