// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! External tracker client (§6): a `bd`-compatible issue tracker invoked as
//! short-lived CLI calls via the Process Runner.

use crate::process::{run_with_timeout, ProcessError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

const TRACKER_CALL_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Process(#[from] ProcessError),
    #[error("tracker call failed with exit code {code:?}: {stderr}")]
    NonZeroExit { code: Option<i32>, stderr: String },
    #[error("failed to parse tracker response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// `{id, title, description, status, priority, issue_type}`, the tracker's
/// `list()` record shape (§6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerIssue {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: TrackerIssueStatus,
    pub priority: i64,
    pub issue_type: String,
}

/// `status ∈ {open, in_progress, closed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackerIssueStatus {
    Open,
    InProgress,
    Closed,
}

#[async_trait]
pub trait Tracker: Send + Sync {
    async fn list(&self) -> Result<Vec<TrackerIssue>, TrackerError>;
    /// IDs whose dependencies are satisfied, capped at `limit`.
    async fn ready(&self, limit: usize) -> Result<Vec<String>, TrackerError>;
    async fn create(
        &self,
        title: &str,
        body: Option<&str>,
        labels: &[String],
    ) -> Result<String, TrackerError>;
    async fn update(&self, id: &str, fields: serde_json::Value) -> Result<(), TrackerError>;
    async fn close(&self, id: &str, reason: &str) -> Result<(), TrackerError>;
    async fn comment(&self, id: &str, text: &str) -> Result<(), TrackerError>;
    async fn dep_add(&self, a: &str, b: &str) -> Result<(), TrackerError>;
}

/// Shells out to the `bd` binary (or a compatible one configured via
/// `binary_name`) for every call.
pub struct CliTracker {
    binary_name: String,
}

impl CliTracker {
    pub fn new(binary_name: impl Into<String>) -> Self {
        Self {
            binary_name: binary_name.into(),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<std::process::Output, TrackerError> {
        let mut cmd = Command::new(&self.binary_name);
        cmd.args(args);
        let output = run_with_timeout(cmd, TRACKER_CALL_TIMEOUT, "bd call").await?;
        if !output.status.success() {
            return Err(TrackerError::NonZeroExit {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }
        Ok(output)
    }
}

impl Default for CliTracker {
    fn default() -> Self {
        Self::new("bd")
    }
}

#[async_trait]
impl Tracker for CliTracker {
    async fn list(&self) -> Result<Vec<TrackerIssue>, TrackerError> {
        let output = self.run(&["list"]).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut issues = Vec::new();
        for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
            issues.push(serde_json::from_str(line)?);
        }
        Ok(issues)
    }

    async fn ready(&self, limit: usize) -> Result<Vec<String>, TrackerError> {
        let limit_str = limit.to_string();
        let output = self.run(&["ready", "--limit", &limit_str]).await?;
        Ok(serde_json::from_slice(&output.stdout)?)
    }

    async fn create(
        &self,
        title: &str,
        body: Option<&str>,
        labels: &[String],
    ) -> Result<String, TrackerError> {
        let mut args = vec!["create".to_string(), title.to_string()];
        if let Some(body) = body {
            args.push("--body".to_string());
            args.push(body.to_string());
        }
        for label in labels {
            args.push("--label".to_string());
            args.push(label.clone());
        }
        let args_ref: Vec<&str> = args.iter().map(String::as_str).collect();
        let output = self.run(&args_ref).await?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn update(&self, id: &str, fields: serde_json::Value) -> Result<(), TrackerError> {
        let fields_str = fields.to_string();
        self.run(&["update", id, &fields_str]).await?;
        Ok(())
    }

    async fn close(&self, id: &str, reason: &str) -> Result<(), TrackerError> {
        self.run(&["close", id, "--reason", reason]).await?;
        Ok(())
    }

    async fn comment(&self, id: &str, text: &str) -> Result<(), TrackerError> {
        self.run(&["comment", id, text]).await?;
        Ok(())
    }

    async fn dep_add(&self, a: &str, b: &str) -> Result<(), TrackerError> {
        self.run(&["dep", "add", a, b]).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;
