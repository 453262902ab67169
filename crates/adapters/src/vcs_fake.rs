// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory [`VcsAdapter`] for tests: no subprocess, no filesystem.

use crate::vcs::{ChangedFiles, VcsAdapter, VcsError};
use async_trait::async_trait;
use noface_core::WorkerId;
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
struct FakeVcsState {
    changed: ChangedFiles,
    workspaces: BTreeSet<PathBuf>,
    squash_should_conflict: bool,
    committed_messages: Vec<(PathBuf, String)>,
    rolled_back: Vec<String>,
}

#[derive(Default)]
pub struct FakeVcsAdapter {
    state: Mutex<FakeVcsState>,
}

impl FakeVcsAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_changed_files(&self, changed: ChangedFiles) {
        self.state.lock().changed = changed;
    }

    pub fn set_squash_conflicts(&self, conflict: bool) {
        self.state.lock().squash_should_conflict = conflict;
    }

    pub fn committed_messages(&self) -> Vec<(PathBuf, String)> {
        self.state.lock().committed_messages.clone()
    }

    pub fn rolled_back(&self) -> Vec<String> {
        self.state.lock().rolled_back.clone()
    }
}

#[async_trait]
impl VcsAdapter for FakeVcsAdapter {
    async fn create_workspace(&self, worker_id: &WorkerId) -> Result<PathBuf, VcsError> {
        let path = PathBuf::from(format!("/fake/project-worker-{}", worker_id.as_str()));
        self.state.lock().workspaces.insert(path.clone());
        Ok(path)
    }

    async fn remove_workspace(&self, path: &Path) -> Result<(), VcsError> {
        self.state.lock().workspaces.remove(path);
        Ok(())
    }

    async fn cleanup_orphaned_workspaces(&self, owned: &[PathBuf]) -> Result<usize, VcsError> {
        let mut state = self.state.lock();
        let before = state.workspaces.len();
        state.workspaces.retain(|p| owned.contains(p));
        Ok(before - state.workspaces.len())
    }

    async fn get_all_changed_files(&self) -> Result<ChangedFiles, VcsError> {
        Ok(self.state.lock().changed.clone())
    }

    async fn commit_in_workspace(&self, path: &Path, message: &str) -> Result<bool, VcsError> {
        self.state
            .lock()
            .committed_messages
            .push((path.to_path_buf(), message.to_string()));
        Ok(true)
    }

    async fn squash_from_workspace(&self, _path: &Path) -> Result<bool, VcsError> {
        Ok(!self.state.lock().squash_should_conflict)
    }

    async fn rollback_file(&self, path: &str) -> Result<(), VcsError> {
        self.state.lock().rolled_back.push(path.to_string());
        Ok(())
    }
}

#[cfg(test)]
#[path = "vcs_fake_tests.rs"]
mod tests;
