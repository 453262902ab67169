// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Unified error type for the engine (§7). Lower-level crate errors fold in
//! via `#[from]`; the remaining variants are the named error kinds the core
//! surfaces to callers.

use noface_adapters::{ProcessError, VcsError};
use noface_storage::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("pool or state accessed before configuration load")]
    NotInitialised,
    #[error("dispatch requested while all worker slots are busy")]
    NoWorkers,
    #[error("main loop is not paused")]
    NotPaused,
    #[error("main loop is already paused")]
    AlreadyPaused,
    #[error("main loop is not running")]
    NotRunning,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("workspace creation failed: {0}")]
    WorkspaceCreationFailed(String),
    #[error("agent spawn failed: {0}")]
    AgentSpawnFailed(String),
    #[error("agent timed out waiting for the next line")]
    AgentTimeout,
    #[error("agent exited before emitting a sentinel")]
    AgentUnexpectedEof,
    #[error("merge conflict squashing workspace for issue {0}")]
    MergeConflict(String),
    #[error("manifest violation for issue {issue_id}: unauthorized={unauthorized:?} forbidden={forbidden:?}")]
    ManifestViolation {
        issue_id: String,
        unauthorized: Vec<String>,
        forbidden: Vec<String>,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Vcs(#[from] VcsError),
    #[error(transparent)]
    Process(#[from] ProcessError),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
