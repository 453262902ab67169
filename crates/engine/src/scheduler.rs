// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Issue scheduler (C5): a pure, stateless `next_ready_issue` over a
//! `MaterializedState` snapshot and the external tracker's ready set.
//!
//! Named `IssueScheduler` rather than `Scheduler` because this crate also
//! carries a timer-style `Scheduler` for periodic passes; the two serve
//! unrelated purposes and the name collision is deliberate, not an oversight.

use noface_adapters::Tracker;
use noface_core::Issue;
use noface_storage::MaterializedState;
use std::collections::BTreeSet;

/// Default priority when an issue's tracker-supplied priority is absent.
/// The core never sees "missing" (it's `i64`), but the tracker layer may
/// map an unset priority to this value before storing it.
pub const DEFAULT_PRIORITY: i64 = 99;

#[derive(Debug, Default)]
pub struct IssueScheduler;

impl IssueScheduler {
    pub fn new() -> Self {
        Self
    }

    /// Returns the next issue that should be dispatched, or `None` if no
    /// issue is currently eligible. Never mutates `state`.
    pub async fn next_ready_issue(
        &self,
        state: &MaterializedState,
        tracker: &dyn Tracker,
    ) -> Option<Issue> {
        let pending: Vec<&Issue> = state.pending_issues().collect();
        if pending.is_empty() {
            return None;
        }

        let ready_ids = match tracker.ready(pending.len()).await {
            Ok(ids) => Some(ids.into_iter().collect::<std::collections::HashSet<_>>()),
            Err(error) => {
                tracing::debug!(%error, "tracker unavailable, failing open");
                None
            }
        };

        let in_flight_base_paths: BTreeSet<&str> = state
            .in_flight_issues()
            .filter_map(|issue| issue.manifest.as_ref())
            .flat_map(|m| m.primary_base_paths())
            .collect();

        let mut candidates: Vec<&Issue> = pending
            .into_iter()
            .filter(|issue| {
                ready_ids
                    .as_ref()
                    .map(|ids| ids.contains(issue.id.as_str()))
                    .unwrap_or(true)
            })
            .filter(|issue| {
                issue
                    .manifest
                    .as_ref()
                    .map(|m| {
                        m.primary_base_paths()
                            .iter()
                            .all(|p| !in_flight_base_paths.contains(p))
                    })
                    .unwrap_or(true)
            })
            .collect();

        candidates.sort_by(|a, b| {
            priority_of(a)
                .cmp(&priority_of(b))
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });

        candidates.into_iter().next().cloned()
    }
}

fn priority_of(issue: &Issue) -> i64 {
    issue.content.priority
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
