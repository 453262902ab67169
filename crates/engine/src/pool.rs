// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker Pool (C6): supervises up to `num_workers` concurrent tasks, each
//! running one issue's implement→review→squash cycle inside an isolated
//! workspace.
//!
//! Bounded-concurrency fan-out over a `JoinSet` with a `Semaphore` permit
//! held for each task's lifetime, matching the worker-pool idiom used
//! across the pack; cooperative cancellation via
//! `tokio_util::sync::CancellationToken`. The worker slot array itself
//! lives in `MaterializedState` — the pool has no second source of truth
//! for "which slots are busy" (§9: no in-memory singleton outside the
//! State Store).

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use noface_adapters::{
    build_argv, build_prompt, child_env, detect_sentinel, LineEvent, NoopTranscriptStore,
    Notification, Notifier, ProcessRunner, PromptRole, Sentinel, TracingNotifier,
    TranscriptEvent, TranscriptStore, VcsAdapter,
};
use noface_core::{AttemptRecord, AttemptResult, Clock, WorkerId};
use noface_storage::{attempt_event, Event, StateStore};
use parking_lot::Mutex as SyncMutex;
use tokio::process::Command;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::compliance::check_compliance;
use crate::error::RuntimeError;

/// How many implement→review rounds a single issue gets before the pool
/// gives up on it (§4.6).
pub const MAX_REVIEW_ITERATIONS: u32 = 5;

/// Outcome of one worker task, posted back to the pool for result handling.
#[derive(Debug, Clone)]
pub struct WorkerResult {
    pub issue_id: String,
    pub worker_id: String,
    pub success: bool,
    pub exit_code: i32,
    pub duration_ms: u64,
    pub baseline: BTreeSet<String>,
    pub notes: String,
}

pub struct PoolConfig {
    pub implementer: String,
    pub reviewer: String,
    pub agent_timeout: Duration,
    pub dry_run: bool,
}

pub struct WorkerPool<C: Clock + 'static> {
    store: Arc<Mutex<StateStore>>,
    vcs: Arc<dyn VcsAdapter>,
    transcripts: Arc<dyn TranscriptStore>,
    notifier: Arc<dyn Notifier>,
    clock: C,
    config: PoolConfig,
    semaphore: Arc<Semaphore>,
    tasks: Mutex<JoinSet<WorkerResult>>,
    cancel_tokens: SyncMutex<HashMap<String, CancellationToken>>,
    completed: SyncMutex<VecDeque<WorkerResult>>,
}

impl<C: Clock + 'static> WorkerPool<C> {
    pub fn new(
        store: Arc<Mutex<StateStore>>,
        vcs: Arc<dyn VcsAdapter>,
        clock: C,
        config: PoolConfig,
        num_workers: usize,
    ) -> Self {
        Self {
            store,
            vcs,
            transcripts: Arc::new(NoopTranscriptStore),
            notifier: Arc::new(TracingNotifier),
            clock,
            config,
            semaphore: Arc::new(Semaphore::new(num_workers)),
            tasks: Mutex::new(JoinSet::new()),
            cancel_tokens: SyncMutex::new(HashMap::new()),
            completed: SyncMutex::new(VecDeque::new()),
        }
    }

    pub fn with_transcripts(mut self, transcripts: Arc<dyn TranscriptStore>) -> Self {
        self.transcripts = transcripts;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Dispatches `issue_id` onto the lowest free slot. Returns
    /// [`RuntimeError::NoWorkers`] if every slot is busy.
    pub async fn dispatch(&self, issue_id: &str) -> Result<(), RuntimeError> {
        let permit = self
            .semaphore
            .clone()
            .try_acquire_owned()
            .map_err(|_| RuntimeError::NoWorkers)?;

        let worker_id = {
            let mut store = self.store.lock().await;
            let worker_id = store
                .state()
                .available_worker()
                .ok_or(RuntimeError::NoWorkers)?
                .id
                .as_str()
                .to_string();
            store.append(Event::WorkerStarted {
                worker_id: worker_id.clone(),
                issue_id: issue_id.to_string(),
                started_at_ms: self.clock.now_ms(),
            })?;
            store.append(Event::IssueAssigned {
                issue_id: issue_id.to_string(),
                worker_id: worker_id.clone(),
            })?;
            store.append(Event::IssueStarted {
                issue_id: issue_id.to_string(),
            })?;
            worker_id
        };

        let cancel_token = CancellationToken::new();
        self.cancel_tokens
            .lock()
            .insert(issue_id.to_string(), cancel_token.clone());

        let vcs = self.vcs.clone();
        let transcripts = self.transcripts.clone();
        let project_name = self.store.lock().await.state().project_name.clone();
        let implementer = self.config.implementer.clone();
        let reviewer = self.config.reviewer.clone();
        let agent_timeout = self.config.agent_timeout;
        let dry_run = self.config.dry_run;
        let issue_id_owned = issue_id.to_string();
        let worker_id_owned = worker_id.clone();

        let mut tasks = self.tasks.lock().await;
        tasks.spawn(async move {
            let _permit = permit;
            let started = Instant::now();
            let result = tokio::select! {
                biased;
                () = cancel_token.cancelled() => WorkerResult {
                    issue_id: issue_id_owned.clone(),
                    worker_id: worker_id_owned.clone(),
                    success: false,
                    exit_code: -1,
                    duration_ms: started.elapsed().as_millis() as u64,
                    baseline: BTreeSet::new(),
                    notes: "interrupted".to_string(),
                },
                result = run_worker_task(
                    vcs,
                    transcripts,
                    &issue_id_owned,
                    &worker_id_owned,
                    &project_name,
                    &implementer,
                    &reviewer,
                    agent_timeout,
                    dry_run,
                ) => result,
            };
            result
        });

        Ok(())
    }

    /// Drains every finished task, applies compliance, and persists the
    /// outcome. Returns the results for telemetry/logging by the caller.
    pub async fn collect_completed(&self) -> Result<Vec<WorkerResult>, RuntimeError> {
        let mut finished = Vec::new();
        {
            let mut tasks = self.tasks.lock().await;
            while let Some(joined) = tasks.try_join_next() {
                match joined {
                    Ok(result) => finished.push(result),
                    Err(join_err) => {
                        tracing::warn!(error = %join_err, "worker task panicked");
                    }
                }
            }
        }

        let mut handled = Vec::with_capacity(finished.len());
        for result in finished {
            self.cancel_tokens.lock().remove(&result.issue_id);
            self.apply_result(&result).await?;
            self.completed.lock().push_back(result.clone());
            handled.push(result);
        }
        Ok(handled)
    }

    async fn apply_result(&self, result: &WorkerResult) -> Result<(), RuntimeError> {
        let mut store = self.store.lock().await;
        let raw = self.vcs.get_all_changed_files().await?.union();

        let other_manifests: Vec<_> = store
            .state()
            .issues
            .values()
            .filter(|issue| issue.id.as_str() != result.issue_id)
            .filter_map(|issue| issue.manifest.clone())
            .collect();

        let issue = store
            .state()
            .get_issue(&result.issue_id)
            .cloned()
            .ok_or_else(|| RuntimeError::NotFound(result.issue_id.clone()))?;

        let report = check_compliance(&issue, &raw, &result.baseline, &other_manifests);
        let final_success = result.success && report.compliant;

        if !report.compliant {
            self.notifier
                .notify(Notification::ManifestViolation {
                    issue_id: result.issue_id.clone(),
                    path: report
                        .rollback_candidates()
                        .into_iter()
                        .next()
                        .unwrap_or_default(),
                })
                .await;
            for path in report.rollback_candidates() {
                let _ = self.vcs.rollback_file(&path).await;
            }
        }

        let attempt_result = if final_success {
            AttemptResult::Success
        } else if !report.compliant {
            AttemptResult::Violation
        } else if result.notes.contains("timeout") {
            AttemptResult::Timeout
        } else {
            AttemptResult::Failed
        };

        let mut record =
            AttemptRecord::new(issue.attempt_count + 1, self.clock.now_ms(), attempt_result)
                .with_notes(result.notes.clone());
        if let Some(instrumentation) = report.instrumentation {
            record = record.with_instrumentation(instrumentation);
        }

        store.append(attempt_event(result.issue_id.clone(), record))?;
        store.append(Event::WorkerReset {
            worker_id: result.worker_id.clone(),
        })?;
        store.append(if final_success {
            Event::SuccessRecorded
        } else {
            Event::FailureRecorded
        })?;

        Ok(())
    }

    /// Terminates every active task without waiting for sentinels. Issues
    /// remain `running` until the next crash-recovery pass resets them.
    pub fn interrupt_all(&self) {
        let tokens: Vec<CancellationToken> =
            self.cancel_tokens.lock().drain().map(|(_, t)| t).collect();
        for token in tokens {
            token.cancel();
        }
    }

    /// Number of issues currently dispatched (running or being cancelled).
    pub fn active_issue_count(&self) -> usize {
        self.cancel_tokens.lock().len()
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_worker_task(
    vcs: Arc<dyn VcsAdapter>,
    transcripts: Arc<dyn TranscriptStore>,
    issue_id: &str,
    worker_id: &str,
    project_name: &str,
    implementer: &str,
    reviewer: &str,
    agent_timeout: Duration,
    dry_run: bool,
) -> WorkerResult {
    let started = Instant::now();
    let workspace = if dry_run {
        // Dry-run skips the VCS adapter entirely (§4.6), but the agent
        // children still need a real directory to run in, so the stub path
        // is a throwaway directory under the system temp dir rather than a
        // placeholder string.
        let path = std::env::temp_dir().join(format!("noface-dry-run-{worker_id}"));
        std::fs::create_dir_all(&path)
            .map(|()| path)
            .map_err(|err| err.to_string())
    } else {
        vcs.create_workspace(&WorkerId::new(worker_id.to_string()))
            .await
            .map_err(|err| err.to_string())
    };

    let workspace = match workspace {
        Ok(path) => path,
        Err(err) => {
            return WorkerResult {
                issue_id: issue_id.to_string(),
                worker_id: worker_id.to_string(),
                success: false,
                exit_code: -1,
                duration_ms: started.elapsed().as_millis() as u64,
                baseline: BTreeSet::new(),
                notes: format!("workspace creation failed: {err}"),
            };
        }
    };

    let baseline = vcs
        .get_all_changed_files()
        .await
        .map(|c| c.union())
        .unwrap_or_default();

    let session = transcripts.start_session(issue_id, "implementer").await;
    let outcome = review_cycle(
        issue_id,
        project_name,
        implementer,
        reviewer,
        &workspace,
        agent_timeout,
        &transcripts,
        &session,
    )
    .await;
    transcripts.end_session(&session).await;

    let (success, notes) = match outcome {
        Ok(()) => {
            let commit_ok = vcs
                .commit_in_workspace(&workspace, &format!("Worker {worker_id} changes for {issue_id}"))
                .await
                .unwrap_or(false);
            if !commit_ok {
                (false, "commit failed".to_string())
            } else {
                match vcs.squash_from_workspace(&workspace).await {
                    Ok(true) => (true, String::new()),
                    Ok(false) => (false, "merge conflict squashing workspace".to_string()),
                    Err(err) => (false, format!("squash failed: {err}")),
                }
            }
        }
        Err(notes) => (false, notes),
    };

    if dry_run {
        let _ = std::fs::remove_dir_all(&workspace);
    } else {
        let _ = vcs.remove_workspace(&workspace).await;
    }

    WorkerResult {
        issue_id: issue_id.to_string(),
        worker_id: worker_id.to_string(),
        success,
        exit_code: exit_code_for(success, &notes),
        duration_ms: started.elapsed().as_millis() as u64,
        baseline,
        notes,
    }
}

/// Maps a task outcome to the process-style exit code recorded on the
/// `WorkerResult` (§8 Scenario E: a timed-out agent reports `124`, matching
/// the shell convention for a command killed by `timeout(1)`).
fn exit_code_for(success: bool, notes: &str) -> i32 {
    if success {
        0
    } else if notes.contains("timed out") || notes.contains("timeout") {
        124
    } else {
        1
    }
}

/// Runs the implement→review loop inside `workspace`. `Ok(())` on approval;
/// `Err(notes)` describing why the issue could not be approved otherwise.
#[allow(clippy::too_many_arguments)]
async fn review_cycle(
    issue_id: &str,
    project_name: &str,
    implementer: &str,
    reviewer: &str,
    workspace: &Path,
    agent_timeout: Duration,
    transcripts: &Arc<dyn TranscriptStore>,
    session: &noface_adapters::TranscriptSessionId,
) -> Result<(), String> {
    let mut feedback = String::new();

    for _round in 0..MAX_REVIEW_ITERATIONS {
        let implementer_prompt = build_prompt(
            PromptRole::Implementer,
            issue_id,
            project_name,
            "",
            &feedback,
        );
        let cmd = build_agent_command(implementer, &implementer_prompt, workspace, issue_id);
        match stream_agent(cmd, agent_timeout, transcripts, session).await {
            AgentOutcome::Sentinel(Sentinel::ReadyForReview) => {}
            AgentOutcome::Sentinel(Sentinel::Blocked(reason)) => {
                return Err(format!("blocked: {reason}"));
            }
            AgentOutcome::Timeout => return Err("agent timed out".to_string()),
            AgentOutcome::UnexpectedEof => return Err("unexpected eof from implementer".to_string()),
            AgentOutcome::SpawnFailed(err) => return Err(format!("agent spawn failed: {err}")),
            AgentOutcome::Sentinel(_) => return Err("unexpected sentinel from implementer".to_string()),
        }

        let reviewer_prompt = build_prompt(PromptRole::Reviewer, issue_id, project_name, "", "");
        let cmd = build_agent_command(reviewer, &reviewer_prompt, workspace, issue_id);
        match stream_agent(cmd, agent_timeout, transcripts, session).await {
            AgentOutcome::Sentinel(Sentinel::Approved) => return Ok(()),
            AgentOutcome::Sentinel(Sentinel::ChangesRequested(notes)) => {
                feedback = notes;
                continue;
            }
            AgentOutcome::Timeout => return Err("agent timed out".to_string()),
            AgentOutcome::UnexpectedEof => return Err("unexpected eof from reviewer".to_string()),
            AgentOutcome::SpawnFailed(err) => return Err(format!("agent spawn failed: {err}")),
            AgentOutcome::Sentinel(_) => return Err("unexpected sentinel from reviewer".to_string()),
        }
    }

    Err("max review iterations exceeded".to_string())
}

enum AgentOutcome {
    Sentinel(Sentinel),
    Timeout,
    UnexpectedEof,
    SpawnFailed(String),
}

/// Builds the child command for one agent invocation: argv per §6's
/// per-flavour convention, `NOFACE_WORKSPACE`/`NOFACE_ISSUE_ID` in the
/// environment, and `workspace` as the child's current directory so the
/// agent only ever sees (and can only ever touch) its own isolated worker
/// workspace (§4.2/§4.6).
fn build_agent_command(
    agent_name: &str,
    prompt: &str,
    workspace: &Path,
    issue_id: &str,
) -> Command {
    let argv = build_argv(agent_name, prompt);
    let mut cmd = Command::new(agent_name);
    cmd.args(&argv);
    cmd.current_dir(workspace);
    for (key, value) in child_env(workspace, issue_id) {
        cmd.env(key, value);
    }
    cmd
}

async fn stream_agent(
    cmd: Command,
    idle_timeout: Duration,
    transcripts: &Arc<dyn TranscriptStore>,
    session: &noface_adapters::TranscriptSessionId,
) -> AgentOutcome {
    let mut runner = match ProcessRunner::spawn(cmd, "agent child") {
        Ok(runner) => runner,
        Err(err) => return AgentOutcome::SpawnFailed(err.to_string()),
    };

    loop {
        match runner.read_line(idle_timeout).await {
            Ok(LineEvent::Line(line)) => {
                transcripts
                    .record_event(
                        session,
                        TranscriptEvent {
                            wallclock_timestamp: 0,
                            line: line.clone(),
                        },
                    )
                    .await;
                if let Some(sentinel) = detect_sentinel(&line) {
                    let _ = runner.wait().await;
                    return AgentOutcome::Sentinel(sentinel);
                }
            }
            Ok(LineEvent::Eof) => {
                let _ = runner.wait().await;
                return AgentOutcome::UnexpectedEof;
            }
            Ok(LineEvent::Timeout) => {
                let _ = runner.kill().await;
                return AgentOutcome::Timeout;
            }
            Err(err) => return AgentOutcome::SpawnFailed(err.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;
