// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use noface_adapters::FakeVcsAdapter;
use noface_core::{FakeClock, IssueContent};
use noface_storage::StateStore;
use std::sync::Arc;
use tokio::sync::Mutex;

async fn open_store(dir: &std::path::Path, num_workers: usize) -> Arc<Mutex<StateStore>> {
    let (mut store, _reset) = StateStore::open(dir).unwrap();
    store
        .append(Event::ProjectInitialized {
            project_name: "acme".to_string(),
            num_workers,
        })
        .unwrap();
    store
        .append(Event::IssueDiscovered {
            issue_id: "X-1".to_string(),
            content: IssueContent {
                title: "do the thing".to_string(),
                description: String::new(),
                priority: 0,
                issue_type: "task".to_string(),
            },
        })
        .unwrap();
    Arc::new(Mutex::new(store))
}

fn config_with_missing_binary(dry_run: bool) -> PoolConfig {
    PoolConfig {
        implementer: "definitely-not-a-real-agent-binary".to_string(),
        reviewer: "definitely-not-a-real-agent-binary".to_string(),
        agent_timeout: Duration::from_secs(5),
        dry_run,
    }
}

#[tokio::test]
async fn dispatch_fails_agent_spawn_and_marks_issue_failed() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path(), 1).await;
    let vcs = Arc::new(FakeVcsAdapter::new());
    let pool = WorkerPool::new(store.clone(), vcs, FakeClock::new(0), config_with_missing_binary(true), 1);

    pool.dispatch("X-1").await.unwrap();

    let mut results = Vec::new();
    for _ in 0..50 {
        results = pool.collect_completed().await.unwrap();
        if !results.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    assert_eq!(results.len(), 1);
    assert!(!results[0].success);

    let state = store.lock().await;
    let issue = state.state().get_issue("X-1").unwrap();
    assert_eq!(issue.status, noface_core::IssueStatus::Failed);
    assert_eq!(state.state().counters.failed_attempts, 1);
}

#[tokio::test]
async fn dispatch_returns_no_workers_once_slots_are_exhausted() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path(), 1).await;
    {
        let mut guard = store.lock().await;
        guard
            .append(Event::IssueDiscovered {
                issue_id: "X-2".to_string(),
                content: IssueContent {
                    title: "second".to_string(),
                    description: String::new(),
                    priority: 0,
                    issue_type: "task".to_string(),
                },
            })
            .unwrap();
    }
    let vcs = Arc::new(FakeVcsAdapter::new());
    let pool = WorkerPool::new(store, vcs, FakeClock::new(0), config_with_missing_binary(true), 1);

    pool.dispatch("X-1").await.unwrap();
    let err = pool.dispatch("X-2").await.unwrap_err();
    assert!(matches!(err, RuntimeError::NoWorkers));
}

#[tokio::test]
async fn stream_agent_idle_timeout_reports_timeout_and_kills_the_child() {
    use noface_adapters::NoopTranscriptStore;

    let transcripts: Arc<dyn noface_adapters::TranscriptStore> = Arc::new(NoopTranscriptStore);
    let session = transcripts.start_session("X-1", "implementer").await;

    let mut cmd = tokio::process::Command::new("sleep");
    cmd.arg("10");

    let outcome = stream_agent(cmd, Duration::from_millis(50), &transcripts, &session).await;
    assert!(matches!(outcome, AgentOutcome::Timeout));
}

#[test]
fn exit_code_for_maps_timeout_notes_to_124() {
    assert_eq!(exit_code_for(true, ""), 0);
    assert_eq!(exit_code_for(false, "agent timed out"), 124);
    assert_eq!(exit_code_for(false, "blocked: needs design review"), 1);
}

#[tokio::test]
async fn build_agent_command_runs_in_the_workspace_with_the_right_env() {
    use std::os::unix::fs::PermissionsExt;

    let workspace = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    let marker_path = scratch.path().join("marker");
    let script_path = scratch.path().join("probe.sh");

    std::fs::write(
        &script_path,
        format!(
            "#!/bin/sh\nprintf '%s\\n%s\\n%s\\n' \"$(pwd)\" \"$NOFACE_WORKSPACE\" \"$NOFACE_ISSUE_ID\" > {}\necho READY_FOR_REVIEW\n",
            marker_path.display()
        ),
    )
    .unwrap();
    std::fs::set_permissions(&script_path, std::fs::Permissions::from_mode(0o755)).unwrap();

    let cmd = build_agent_command(script_path.to_str().unwrap(), "prompt", workspace.path(), "X-1");

    let transcripts: Arc<dyn noface_adapters::TranscriptStore> = Arc::new(noface_adapters::NoopTranscriptStore);
    let session = transcripts.start_session("X-1", "implementer").await;
    let outcome = stream_agent(cmd, Duration::from_secs(5), &transcripts, &session).await;
    assert!(matches!(outcome, AgentOutcome::Sentinel(Sentinel::ReadyForReview)));

    let marker = std::fs::read_to_string(&marker_path).unwrap();
    let mut lines = marker.lines();
    let workspace_str = workspace.path().to_string_lossy();
    assert_eq!(lines.next().unwrap(), workspace_str);
    assert_eq!(lines.next().unwrap(), workspace_str);
    assert_eq!(lines.next().unwrap(), "X-1");
}

#[tokio::test]
async fn interrupt_all_clears_cancellation_tokens() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path(), 1).await;
    let vcs = Arc::new(FakeVcsAdapter::new());
    let pool = WorkerPool::new(store, vcs, FakeClock::new(0), config_with_missing_binary(true), 1);

    pool.dispatch("X-1").await.unwrap();
    assert_eq!(pool.active_issue_count(), 1);
    pool.interrupt_all();
    assert_eq!(pool.active_issue_count(), 0);
}
