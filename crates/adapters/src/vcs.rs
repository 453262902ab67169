// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! VCS Adapter (C2): isolated worker workspaces over a shared object store.
//!
//! Models one primary working copy plus up to `MAX_WORKERS` auxiliary
//! workspaces, each a sibling directory named `<project>-worker-<i>`. The
//! adapter is the only writer to the working directory; it serialises
//! concurrent callers internally so a changed-file listing is never
//! observed mid-mutation (§5).

use async_trait::async_trait;
use noface_core::WorkerId;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum VcsError {
    #[error("workspace creation failed: {0}")]
    WorkspaceCreationFailed(String),
    #[error("merge conflict squashing {0}")]
    MergeConflict(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Union of modified/added/deleted repo-relative, forward-slashed paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangedFiles {
    pub modified: BTreeSet<String>,
    pub added: BTreeSet<String>,
    pub deleted: BTreeSet<String>,
}

impl ChangedFiles {
    /// All touched paths regardless of change kind — the `candidate` input
    /// to the compliance engine (§4.4).
    pub fn union(&self) -> BTreeSet<String> {
        self.modified
            .iter()
            .chain(self.added.iter())
            .chain(self.deleted.iter())
            .cloned()
            .collect()
    }
}

#[async_trait]
pub trait VcsAdapter: Send + Sync {
    /// Establishes an isolated working directory for `worker_id`, sharing
    /// the underlying object store with the primary working copy.
    async fn create_workspace(&self, worker_id: &WorkerId) -> Result<PathBuf, VcsError>;

    /// Tears down `path`. Idempotent: removing an already-gone workspace is
    /// not an error.
    async fn remove_workspace(&self, path: &Path) -> Result<(), VcsError>;

    /// Removes any on-disk workspace matching the naming pattern that is
    /// not in `owned`. Returns the count removed. Called once at boot.
    async fn cleanup_orphaned_workspaces(&self, owned: &[PathBuf]) -> Result<usize, VcsError>;

    /// Union of changed files across the primary working copy.
    async fn get_all_changed_files(&self) -> Result<ChangedFiles, VcsError>;

    /// Finalizes the workspace's change set locally.
    async fn commit_in_workspace(&self, path: &Path, message: &str) -> Result<bool, VcsError>;

    /// Merges the workspace's change into the primary working copy.
    /// Returns `false` (not an error) iff a merge conflict arose.
    async fn squash_from_workspace(&self, path: &Path) -> Result<bool, VcsError>;

    /// Reverts a single path in the primary working copy.
    async fn rollback_file(&self, path: &str) -> Result<(), VcsError>;
}

/// Shells out to `jj` (falling back to `git worktree` semantics) to
/// implement [`VcsAdapter`]. Holds an internal mutex so that
/// `get_all_changed_files` is never interleaved with a squash — the only
/// shared-mutable-state guarantee this component owns (§5).
pub struct JjAdapter {
    project_root: PathBuf,
    project_name: String,
    lock: Mutex<()>,
}

impl JjAdapter {
    pub fn new(project_root: PathBuf, project_name: String) -> Self {
        Self {
            project_root,
            project_name,
            lock: Mutex::new(()),
        }
    }

    fn workspace_path(&self, worker_id: &WorkerId) -> PathBuf {
        let parent = self
            .project_root
            .parent()
            .unwrap_or(&self.project_root)
            .to_path_buf();
        parent.join(format!("{}-worker-{}", self.project_name, worker_id.as_str()))
    }

    fn command(&self, args: &[&str]) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new("jj");
        cmd.current_dir(&self.project_root).args(args);
        cmd
    }
}

#[async_trait]
impl VcsAdapter for JjAdapter {
    async fn create_workspace(&self, worker_id: &WorkerId) -> Result<PathBuf, VcsError> {
        let _guard = self.lock.lock().await;
        let path = self.workspace_path(worker_id);
        let path_str = path.to_string_lossy().to_string();
        let output = self
            .command(&["workspace", "add", &path_str])
            .output()
            .await?;
        if !output.status.success() {
            return Err(VcsError::WorkspaceCreationFailed(
                String::from_utf8_lossy(&output.stderr).to_string(),
            ));
        }
        Ok(path)
    }

    async fn remove_workspace(&self, path: &Path) -> Result<(), VcsError> {
        let _guard = self.lock.lock().await;
        if !path.exists() {
            return Ok(());
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let _ = self.command(&["workspace", "forget", &name]).output().await?;
        std::fs::remove_dir_all(path)?;
        Ok(())
    }

    async fn cleanup_orphaned_workspaces(&self, owned: &[PathBuf]) -> Result<usize, VcsError> {
        let _guard = self.lock.lock().await;
        let parent = self
            .project_root
            .parent()
            .unwrap_or(&self.project_root)
            .to_path_buf();
        let prefix = format!("{}-worker-", self.project_name);
        let mut removed = 0;
        let entries = match std::fs::read_dir(&parent) {
            Ok(entries) => entries,
            Err(_) => return Ok(0),
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with(&prefix) && !owned.contains(&path) {
                std::fs::remove_dir_all(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn get_all_changed_files(&self) -> Result<ChangedFiles, VcsError> {
        let _guard = self.lock.lock().await;
        let output = self.command(&["diff", "--summary"]).output().await?;
        let mut changed = ChangedFiles::default();
        for line in String::from_utf8_lossy(&output.stdout).lines() {
            let Some((kind, path)) = line.split_once(' ') else {
                continue;
            };
            let path = path.trim().to_string();
            match kind {
                "M" => {
                    changed.modified.insert(path);
                }
                "A" => {
                    changed.added.insert(path);
                }
                "D" => {
                    changed.deleted.insert(path);
                }
                _ => {}
            }
        }
        Ok(changed)
    }

    async fn commit_in_workspace(&self, path: &Path, message: &str) -> Result<bool, VcsError> {
        let _guard = self.lock.lock().await;
        let mut cmd = tokio::process::Command::new("jj");
        cmd.current_dir(path).args(["commit", "-m", message]);
        let output = cmd.output().await?;
        Ok(output.status.success())
    }

    async fn squash_from_workspace(&self, path: &Path) -> Result<bool, VcsError> {
        let _guard = self.lock.lock().await;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let output = self
            .command(&["workspace", "update-stale", &name])
            .output()
            .await?;
        Ok(output.status.success())
    }

    async fn rollback_file(&self, path: &str) -> Result<(), VcsError> {
        let _guard = self.lock.lock().await;
        let output = self.command(&["restore", path]).output().await?;
        if !output.status.success() {
            return Err(VcsError::MergeConflict(format!(
                "rollback of {path} failed"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "vcs_tests.rs"]
mod tests;
