// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use noface_adapters::FakeTracker;
use noface_core::{FakeClock, IssueContent};
use noface_storage::StateStore;
use std::sync::Arc;
use tokio::sync::Mutex;

async fn open_store(dir: &std::path::Path) -> Arc<Mutex<StateStore>> {
    let (mut store, _reset) = StateStore::open(dir).unwrap();
    store
        .append(Event::ProjectInitialized {
            project_name: "acme".to_string(),
            num_workers: 1,
        })
        .unwrap();
    Arc::new(Mutex::new(store))
}

fn test_pool(store: Arc<Mutex<StateStore>>) -> Arc<WorkerPool<FakeClock>> {
    let vcs = Arc::new(noface_adapters::FakeVcsAdapter::new());
    let config = crate::pool::PoolConfig {
        implementer: "definitely-not-a-real-agent-binary".to_string(),
        reviewer: "definitely-not-a-real-agent-binary".to_string(),
        agent_timeout: Duration::from_secs(5),
        dry_run: true,
    };
    Arc::new(WorkerPool::new(store, vcs, FakeClock::new(0), config, 1))
}

fn test_main_loop(store: Arc<Mutex<StateStore>>, pool: Arc<WorkerPool<FakeClock>>) -> MainLoop<FakeClock> {
    MainLoop::new(
        store,
        pool,
        Arc::new(FakeTracker::new()),
        FakeClock::new(0),
        PassConfig {
            planner_enabled: false,
            quality_enabled: false,
            external_sync_enabled: false,
            ..PassConfig::default()
        },
    )
}

#[test]
fn pass_due_fires_only_on_fresh_multiples() {
    assert!(!pass_due(true, 5, 0, None));
    assert!(pass_due(true, 5, 5, None));
    assert!(!pass_due(true, 5, 5, Some(5)));
    assert!(!pass_due(true, 5, 7, None));
    assert!(!pass_due(false, 5, 5, None));
    assert!(!pass_due(true, 0, 5, None));
}

#[tokio::test]
async fn pause_then_resume_toggles_dispatch_gate() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path()).await;
    let pool = test_pool(store.clone());
    let mut main_loop = test_main_loop(store, pool);

    assert!(!main_loop.paused);
    main_loop.apply_command(Command::Pause).unwrap();
    assert!(main_loop.paused);
    main_loop.apply_command(Command::Resume).unwrap();
    assert!(!main_loop.paused);
}

#[tokio::test]
async fn pausing_twice_or_resuming_while_running_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path()).await;
    let pool = test_pool(store.clone());
    let mut main_loop = test_main_loop(store, pool);

    assert!(matches!(
        main_loop.apply_command(Command::Resume),
        Err(RuntimeError::NotPaused)
    ));

    main_loop.apply_command(Command::Pause).unwrap();
    assert!(matches!(
        main_loop.apply_command(Command::Pause),
        Err(RuntimeError::AlreadyPaused)
    ));
}

#[tokio::test]
async fn loop_handle_send_surfaces_precondition_errors() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path()).await;
    let pool = test_pool(store.clone());
    let mut main_loop = test_main_loop(store, pool);
    let handle = main_loop.handle();
    let task = tokio::spawn(async move { main_loop.run().await });

    handle.send(Command::Pause).await.unwrap();
    assert!(matches!(
        handle.send(Command::Pause).await,
        Err(RuntimeError::AlreadyPaused)
    ));

    task.abort();
}

#[tokio::test]
async fn step_arms_a_single_pending_iteration() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path()).await;
    let pool = test_pool(store.clone());
    let mut main_loop = test_main_loop(store, pool);
    main_loop.apply_command(Command::Pause).unwrap();

    main_loop.apply_command(Command::Step).unwrap();
    assert!(!main_loop.paused);
    assert!(main_loop.pending_step);
}

#[tokio::test]
async fn interrupt_drains_pool_tasks_and_pauses_the_loop() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path()).await;
    store
        .lock()
        .await
        .append(Event::IssueDiscovered {
            issue_id: "X-1".to_string(),
            content: IssueContent {
                title: "do it".to_string(),
                description: String::new(),
                priority: 0,
                issue_type: "task".to_string(),
            },
        })
        .unwrap();
    let pool = test_pool(store.clone());
    pool.dispatch("X-1").await.unwrap();
    assert_eq!(pool.active_issue_count(), 1);

    let mut main_loop = test_main_loop(store, pool.clone());
    main_loop.apply_command(Command::Interrupt).unwrap();

    assert!(main_loop.paused);
    assert_eq!(pool.active_issue_count(), 0);
}

#[tokio::test]
async fn run_iteration_dispatches_the_only_pending_issue() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path()).await;
    store
        .lock()
        .await
        .append(Event::IssueDiscovered {
            issue_id: "X-1".to_string(),
            content: IssueContent {
                title: "do it".to_string(),
                description: String::new(),
                priority: 0,
                issue_type: "task".to_string(),
            },
        })
        .unwrap();
    let pool = test_pool(store.clone());
    let mut main_loop = test_main_loop(store.clone(), pool);

    main_loop.run_iteration().await.unwrap();

    let state = store.lock().await;
    assert_eq!(state.state().counters.total_iterations, 1);
    let issue = state.state().get_issue("X-1").unwrap();
    assert_eq!(issue.status, noface_core::IssueStatus::Running);
}

#[tokio::test]
async fn max_iterations_zero_means_unlimited() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path()).await;
    let pool = test_pool(store.clone());
    let main_loop = test_main_loop(store, pool);

    assert!(!main_loop.max_iterations_reached().await);
}

#[tokio::test]
async fn max_iterations_reached_stops_the_loop_from_running_more() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path()).await;
    let pool = test_pool(store.clone());
    let mut main_loop = MainLoop::new(
        store,
        pool,
        Arc::new(FakeTracker::new()),
        FakeClock::new(0),
        PassConfig {
            planner_enabled: false,
            quality_enabled: false,
            external_sync_enabled: false,
            max_iterations: 1,
            ..PassConfig::default()
        },
    );

    assert!(!main_loop.max_iterations_reached().await);
    main_loop.run_iteration().await.unwrap();
    assert!(main_loop.max_iterations_reached().await);
}

#[tokio::test(start_paused = true)]
async fn run_ticks_once_immediately_then_waits_for_the_next_interval() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path()).await;
    store
        .lock()
        .await
        .append(Event::IssueDiscovered {
            issue_id: "X-1".to_string(),
            content: IssueContent {
                title: "do it".to_string(),
                description: String::new(),
                priority: 0,
                issue_type: "task".to_string(),
            },
        })
        .unwrap();
    let pool = test_pool(store.clone());
    let mut main_loop = test_main_loop(store.clone(), pool.clone());
    let task = tokio::spawn(async move { main_loop.run().await });

    tokio::time::advance(Duration::from_millis(1)).await;
    tokio::task::yield_now().await;
    assert_eq!(pool.active_issue_count(), 1);

    task.abort();
}
