// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory `Tracker` for tests that need dependency/backlog behaviour
//! without shelling out to a real `bd` binary.

use crate::tracker::{Tracker, TrackerError, TrackerIssue, TrackerIssueStatus};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeSet, HashMap};

#[derive(Default)]
struct FakeTrackerState {
    issues: HashMap<String, TrackerIssue>,
    deps: HashMap<String, BTreeSet<String>>,
    comments: HashMap<String, Vec<String>>,
    next_id: u64,
}

pub struct FakeTracker {
    state: Mutex<FakeTrackerState>,
}

impl FakeTracker {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeTrackerState::default()),
        }
    }

    pub fn seed(&self, issue: TrackerIssue) {
        self.state.lock().issues.insert(issue.id.clone(), issue);
    }

    pub fn comments_for(&self, id: &str) -> Vec<String> {
        self.state
            .lock()
            .comments
            .get(id)
            .cloned()
            .unwrap_or_default()
    }
}

impl Default for FakeTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tracker for FakeTracker {
    async fn list(&self) -> Result<Vec<TrackerIssue>, TrackerError> {
        Ok(self.state.lock().issues.values().cloned().collect())
    }

    async fn ready(&self, limit: usize) -> Result<Vec<String>, TrackerError> {
        let state = self.state.lock();
        let mut ready: Vec<&TrackerIssue> = state
            .issues
            .values()
            .filter(|issue| issue.status == TrackerIssueStatus::Open)
            .filter(|issue| {
                state
                    .deps
                    .get(&issue.id)
                    .map(|deps| {
                        deps.iter().all(|dep| {
                            state
                                .issues
                                .get(dep)
                                .map(|d| d.status == TrackerIssueStatus::Closed)
                                .unwrap_or(false)
                        })
                    })
                    .unwrap_or(true)
            })
            .collect();
        ready.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.id.cmp(&b.id)));
        Ok(ready.into_iter().take(limit).map(|i| i.id.clone()).collect())
    }

    async fn create(
        &self,
        title: &str,
        body: Option<&str>,
        _labels: &[String],
    ) -> Result<String, TrackerError> {
        let mut state = self.state.lock();
        state.next_id += 1;
        let id = format!("FAKE-{}", state.next_id);
        state.issues.insert(
            id.clone(),
            TrackerIssue {
                id: id.clone(),
                title: title.to_string(),
                description: body.unwrap_or_default().to_string(),
                status: TrackerIssueStatus::Open,
                priority: 0,
                issue_type: "task".to_string(),
            },
        );
        Ok(id)
    }

    async fn update(&self, id: &str, fields: serde_json::Value) -> Result<(), TrackerError> {
        let mut state = self.state.lock();
        let Some(issue) = state.issues.get_mut(id) else {
            return Ok(());
        };
        if let Some(title) = fields.get("title").and_then(|v| v.as_str()) {
            issue.title = title.to_string();
        }
        if let Some(priority) = fields.get("priority").and_then(|v| v.as_i64()) {
            issue.priority = priority;
        }
        Ok(())
    }

    async fn close(&self, id: &str, reason: &str) -> Result<(), TrackerError> {
        let mut state = self.state.lock();
        if let Some(issue) = state.issues.get_mut(id) {
            issue.status = TrackerIssueStatus::Closed;
        }
        state
            .comments
            .entry(id.to_string())
            .or_default()
            .push(format!("closed: {reason}"));
        Ok(())
    }

    async fn comment(&self, id: &str, text: &str) -> Result<(), TrackerError> {
        self.state
            .lock()
            .comments
            .entry(id.to_string())
            .or_default()
            .push(text.to_string());
        Ok(())
    }

    async fn dep_add(&self, a: &str, b: &str) -> Result<(), TrackerError> {
        self.state
            .lock()
            .deps
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string());
        Ok(())
    }
}

#[cfg(test)]
#[path = "tracker_fake_tests.rs"]
mod tests;
