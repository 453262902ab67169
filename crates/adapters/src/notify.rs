// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Best-effort operator notifications. Never on the critical path: a
//! `Notifier` failure is logged and swallowed, never propagated.

use async_trait::async_trait;

/// An event worth surfacing to whoever is watching the orchestrator.
#[derive(Debug, Clone)]
pub enum Notification {
    IssueBlocked { issue_id: String, reason: String },
    ManifestViolation { issue_id: String, path: String },
    WorkerCrashed { worker_id: String, issue_id: String },
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: Notification);
}

/// Logs at `warn` via `tracing` and otherwise does nothing. The default
/// collaborator when no external notification channel is configured.
#[derive(Debug, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(&self, notification: Notification) {
        match notification {
            Notification::IssueBlocked { issue_id, reason } => {
                tracing::warn!(issue_id, reason, "issue blocked");
            }
            Notification::ManifestViolation { issue_id, path } => {
                tracing::warn!(issue_id, path, "manifest violation");
            }
            Notification::WorkerCrashed {
                worker_id,
                issue_id,
            } => {
                tracing::warn!(worker_id, issue_id, "worker crashed");
            }
        }
    }
}

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
