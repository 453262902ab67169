// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::attempt::AttemptResult;

fn sample_issue() -> Issue {
    Issue::new(
        IssueId::new("X-1"),
        IssueContent {
            title: "Fix the thing".into(),
            ..Default::default()
        },
    )
}

#[test]
fn new_issue_starts_pending_with_no_attempts() {
    let issue = sample_issue();
    assert_eq!(issue.status, IssueStatus::Pending);
    assert_eq!(issue.attempt_count, 0);
    assert!(issue.assigned_worker_id.is_none());
    assert!(issue.last_attempt.is_none());
}

#[test]
fn assign_sets_worker_and_status() {
    let mut issue = sample_issue();
    issue.assign(WorkerId::new("w0"));
    assert_eq!(issue.status, IssueStatus::Assigned);
    assert_eq!(issue.assigned_worker_id, Some(WorkerId::new("w0")));
    assert!(issue.status.is_in_flight());
}

#[test]
fn record_attempt_success_completes_issue() {
    let mut issue = sample_issue();
    issue.assign(WorkerId::new("w0"));
    issue.start_running();
    issue.record_attempt(AttemptRecord::new(1, 1000, AttemptResult::Success));

    assert_eq!(issue.status, IssueStatus::Completed);
    assert_eq!(issue.attempt_count, 1);
    assert!(issue.assigned_worker_id.is_none());
    assert!(issue.last_attempt.unwrap().is_success());
}

#[test]
fn record_attempt_failure_fails_issue() {
    let mut issue = sample_issue();
    issue.record_attempt(AttemptRecord::new(1, 1000, AttemptResult::Violation));
    assert_eq!(issue.status, IssueStatus::Failed);
}

#[test]
fn reset_to_pending_clears_assignment() {
    let mut issue = sample_issue();
    issue.assign(WorkerId::new("w0"));
    issue.start_running();
    issue.reset_to_pending();

    assert_eq!(issue.status, IssueStatus::Pending);
    assert!(issue.assigned_worker_id.is_none());
}

#[test]
fn add_comment_appends() {
    let mut issue = sample_issue();
    issue.add_comment(Comment {
        author: "alice".into(),
        body: "looks good".into(),
        wallclock_timestamp: 1,
    });
    assert_eq!(issue.comments.len(), 1);
}
