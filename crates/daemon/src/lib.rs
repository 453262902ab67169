// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Unix-socket daemon wrapping the main loop: project-scoped lifecycle
//! (lock file, state-store open, crash recovery) and the Command Surface
//! (C8) server.

pub mod lifecycle;
pub mod listener;
pub mod protocol;

use std::sync::Arc;

use noface_adapters::{CliTracker, JjAdapter, Tracker, VcsAdapter};
use noface_core::{Config, SystemClock, TrackerType};
use noface_engine::{MainLoop, PassConfig, PoolConfig, WorkerPool};
use noface_storage::StateStore;
use tokio::sync::Mutex;

use lifecycle::{LifecycleError, StartupResult};

/// Runs the daemon for `project_root` until its socket listener exits
/// (normally only on an unrecoverable accept error — shutdown is otherwise
/// driven by the `interrupt`/process-signal path at the binary boundary).
pub async fn run(project_root: &std::path::Path, config: Config) -> Result<(), LifecycleError> {
    let daemon_config = lifecycle::Config::load(project_root);
    let StartupResult {
        store,
        reset_count,
        lock,
    } = lifecycle::startup(&daemon_config).await?;
    if reset_count > 0 {
        tracing::info!(reset_count, "crash recovery reset stuck worker slots");
    }

    let store = Arc::new(Mutex::new(store));
    let vcs: Arc<dyn VcsAdapter> = Arc::new(JjAdapter::new(
        project_root.to_path_buf(),
        config.project.name.clone(),
    ));
    let tracker: Arc<dyn Tracker> = Arc::new(match config.tracker.r#type {
        TrackerType::Beads => CliTracker::new("bd"),
        TrackerType::Github => CliTracker::new("gh"),
    });

    let pool = Arc::new(WorkerPool::new(
        store.clone(),
        vcs,
        SystemClock,
        PoolConfig {
            implementer: config.agents.implementer.clone(),
            reviewer: config.agents.reviewer.clone(),
            agent_timeout: std::time::Duration::from_secs(config.agents.timeout_seconds),
            dry_run: config.runtime.dry_run,
        },
        config.agents.num_workers,
    ));

    let mut main_loop = MainLoop::new(
        store.clone(),
        pool.clone(),
        tracker.clone(),
        SystemClock,
        PassConfig {
            planner_enabled: config.passes.planner_enabled,
            planner_interval: config.passes.planner_interval,
            quality_enabled: config.passes.quality_enabled,
            quality_interval: config.passes.quality_interval,
            external_sync_enabled: config.tracker.sync_to_github,
            max_iterations: config.runtime.max_iterations,
        },
    );
    let loop_handle = main_loop.handle();

    let listener_state = Arc::new(listener::ListenerState {
        store,
        pool,
        tracker,
        loop_handle,
    });
    let unix_listener = listener::bind(&daemon_config.socket_path)
        .await
        .map_err(|error| LifecycleError::BindFailed(daemon_config.socket_path.clone(), error))?;

    let serve_task = tokio::spawn(listener::serve(unix_listener, listener_state));
    let result = main_loop.run().await;
    serve_task.abort();
    drop(lock);
    result.map_err(|error| {
        tracing::error!(%error, "main loop exited with an error");
        LifecycleError::Io(std::io::Error::other(error.to_string()))
    })
}
