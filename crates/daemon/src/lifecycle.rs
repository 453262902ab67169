// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle: lock acquisition, state-store startup, and the
//! crash-recovery pass, grounded in the pack's "lock file first, then
//! directories, then WAL replay" startup ordering — the lock must be held
//! before anything else touches the project's `.noface` directory so two
//! daemons racing on the same project can't both win.

use std::fs::File;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use noface_storage::{StateStore, StoreError};
use thiserror::Error;

/// Paths the daemon owns under `<project_root>/.noface/`.
#[derive(Debug, Clone)]
pub struct Config {
    pub project_root: PathBuf,
    pub noface_dir: PathBuf,
    pub socket_path: PathBuf,
    pub lock_path: PathBuf,
}

impl Config {
    pub fn load(project_root: &Path) -> Self {
        let noface_dir = project_root.join(".noface");
        Self {
            socket_path: noface_dir.join("daemon.sock"),
            lock_path: noface_dir.join("daemon.pid"),
            noface_dir,
            project_root: project_root.to_path_buf(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("failed to acquire lock: a daemon is already running for this project")]
    LockFailed(#[source] std::io::Error),
    #[error("failed to bind socket at {0}: {1}")]
    BindFailed(PathBuf, std::io::Error),
    #[error("state store error: {0}")]
    Store(#[from] StoreError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Lock file held for the daemon's lifetime; dropping it releases the
/// advisory lock (the OS does this automatically on process exit too, but
/// an orderly shutdown releases it explicitly via [`Drop`]).
pub struct LockGuard {
    _file: File,
}

pub struct StartupResult {
    pub store: StateStore,
    pub reset_count: usize,
    pub lock: LockGuard,
}

/// Acquires the project lock, opens (or creates) the state store, and runs
/// crash recovery. On any failure after the lock is held, best-effort
/// cleanup removes the socket file so a stale one doesn't block a future
/// bind — the lock file itself is left for the next daemon to re-acquire.
pub async fn startup(config: &Config) -> Result<StartupResult, LifecycleError> {
    match startup_inner(config) {
        Ok(result) => Ok(result),
        Err(error) => {
            if !matches!(error, LifecycleError::LockFailed(_)) {
                cleanup_on_failure(config);
            }
            Err(error)
        }
    }
}

fn startup_inner(config: &Config) -> Result<StartupResult, LifecycleError> {
    std::fs::create_dir_all(&config.noface_dir)?;

    let lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&config.lock_path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(LifecycleError::LockFailed)?;

    let mut lock_file = lock_file;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;

    let (store, reset_count) = StateStore::open(&config.noface_dir)?;

    Ok(StartupResult {
        store,
        reset_count,
        lock: LockGuard { _file: lock_file },
    })
}

/// Removes the socket file left behind by a crashed or failed-to-start
/// daemon so the next bind doesn't hit `AddrInUse`.
pub fn cleanup_on_failure(config: &Config) {
    let _ = std::fs::remove_file(&config.socket_path);
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
