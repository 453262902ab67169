// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Main Loop (C7): a single logical coordinator driven by `tokio::select!`
//! over a control-command channel and a periodic tick, grounded in the
//! daemon's engine loop (`timer_check` interval created once outside the
//! `loop {}`, re-evaluated by `select!` on every iteration rather than a
//! `sleep` that would reset on every command).

use std::sync::Arc;
use std::time::Duration;

use noface_adapters::Tracker;
use noface_core::Clock;
use noface_storage::{Event, StateStore};
use tokio::sync::{mpsc, oneshot, Mutex};

use crate::error::RuntimeError;
use crate::pool::WorkerPool;
use crate::scheduler::IssueScheduler;

/// Default tick period between scheduling attempts (§4.7).
pub const LOOP_INTERVAL: Duration = Duration::from_secs(5);

/// Externally issued control commands (§4.7, §4.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Pause,
    Resume,
    Step,
    Interrupt,
}

/// Cadence configuration for the periodic planner/quality passes.
#[derive(Debug, Clone)]
pub struct PassConfig {
    pub planner_enabled: bool,
    pub planner_interval: u64,
    pub quality_enabled: bool,
    pub quality_interval: u64,
    pub external_sync_enabled: bool,
    /// Stop the loop once `total_iterations` reaches this value. `0` means
    /// unlimited (`runtime.max_iterations` in the project config).
    pub max_iterations: u64,
}

impl Default for PassConfig {
    fn default() -> Self {
        Self {
            planner_enabled: true,
            planner_interval: 5,
            quality_enabled: true,
            quality_interval: 10,
            external_sync_enabled: true,
            max_iterations: 0,
        }
    }
}

/// A pass of kind `K` is due iff `K` is enabled, `iteration` is a positive
/// multiple of `interval`, and it is not the same iteration that last ran
/// it (so `step`/`resume` replaying the current iteration can't re-fire it).
fn pass_due(enabled: bool, interval: u64, iteration: u64, last_ran: Option<u64>) -> bool {
    enabled && interval > 0 && iteration > 0 && iteration % interval == 0 && last_ran != Some(iteration)
}

type CommandEnvelope = (Command, oneshot::Sender<Result<(), RuntimeError>>);

/// A thread-safe handle for submitting control commands from the Command
/// Surface (C8) into a running [`MainLoop`].
///
/// Commands are request/reply: `send` doesn't return until `MainLoop::run`
/// has actually applied the command and checked its preconditions, mirroring
/// the teacher's `oneshot`-backed shutdown-handle pattern for the agent
/// watcher rather than a fire-and-forget queue whose failures nobody sees.
#[derive(Clone)]
pub struct LoopHandle {
    commands: mpsc::Sender<CommandEnvelope>,
}

impl LoopHandle {
    pub async fn send(&self, command: Command) -> Result<(), RuntimeError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send((command, reply_tx))
            .await
            .map_err(|_| RuntimeError::NotRunning)?;
        reply_rx.await.map_err(|_| RuntimeError::NotRunning)?
    }
}

/// Coordinates periodic planner/quality passes with continuous dispatch
/// from the [`IssueScheduler`] to the [`WorkerPool`] (§4.7).
pub struct MainLoop<C: Clock + 'static> {
    store: Arc<Mutex<StateStore>>,
    scheduler: IssueScheduler,
    pool: Arc<WorkerPool<C>>,
    tracker: Arc<dyn Tracker>,
    clock: C,
    config: PassConfig,
    commands: mpsc::Receiver<CommandEnvelope>,
    handle: LoopHandle,
    paused: bool,
    pending_step: bool,
    last_planner_iteration: Option<u64>,
    last_quality_iteration: Option<u64>,
}

impl<C: Clock + 'static> MainLoop<C> {
    pub fn new(
        store: Arc<Mutex<StateStore>>,
        pool: Arc<WorkerPool<C>>,
        tracker: Arc<dyn Tracker>,
        clock: C,
        config: PassConfig,
    ) -> Self {
        let (tx, rx) = mpsc::channel(32);
        Self {
            store,
            scheduler: IssueScheduler::new(),
            pool,
            tracker,
            clock,
            config,
            commands: rx,
            handle: LoopHandle { commands: tx },
            paused: false,
            pending_step: false,
            last_planner_iteration: None,
            last_quality_iteration: None,
        }
    }

    /// A cloneable handle the Command Surface can hold onto and send
    /// commands through while [`MainLoop::run`] owns `self`.
    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    /// Runs until the command channel is closed (every [`LoopHandle`]
    /// dropped). Each iteration: apply any queued commands, then — unless
    /// paused — run due periodic passes and attempt one dispatch.
    pub async fn run(&mut self) -> Result<(), RuntimeError> {
        let mut tick = tokio::time::interval(LOOP_INTERVAL);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                maybe_command = self.commands.recv() => {
                    match maybe_command {
                        Some((command, reply)) => {
                            let result = self.apply_command(command);
                            let _ = reply.send(result);
                        }
                        None => return Ok(()),
                    }
                }
                _ = tick.tick() => {
                    self.pool.collect_completed().await?;
                    if !self.paused {
                        self.run_iteration().await?;
                        if self.pending_step {
                            self.pending_step = false;
                            self.paused = true;
                        }
                        if self.max_iterations_reached().await {
                            tracing::info!("max_iterations reached, stopping main loop");
                            return Ok(());
                        }
                    }
                }
            }
        }
    }

    /// Applies `command`, enforcing the preconditions named in §7:
    /// `pause` requires the loop not already paused, `resume` requires it
    /// actually paused. `step` and `interrupt` have no stated precondition
    /// and always succeed.
    fn apply_command(&mut self, command: Command) -> Result<(), RuntimeError> {
        match command {
            Command::Pause => {
                if self.paused {
                    return Err(RuntimeError::AlreadyPaused);
                }
                self.paused = true;
            }
            Command::Resume => {
                if !self.paused {
                    return Err(RuntimeError::NotPaused);
                }
                self.paused = false;
            }
            Command::Step => {
                self.paused = false;
                self.pending_step = true;
            }
            Command::Interrupt => {
                self.pool.interrupt_all();
                self.paused = true;
            }
        }
        Ok(())
    }

    /// `0` means unlimited (§6: `runtime.max_iterations`).
    async fn max_iterations_reached(&self) -> bool {
        if self.config.max_iterations == 0 {
            return false;
        }
        let store = self.store.lock().await;
        store.state().counters.total_iterations >= self.config.max_iterations
    }

    async fn run_iteration(&mut self) -> Result<(), RuntimeError> {
        let iteration = {
            let mut store = self.store.lock().await;
            store.append(Event::IterationRecorded)?;
            store.state().counters.total_iterations
        };

        if pass_due(
            self.config.planner_enabled,
            self.config.planner_interval,
            iteration,
            self.last_planner_iteration,
        ) {
            self.last_planner_iteration = Some(iteration);
            tracing::info!(iteration, "planner pass due");
        }

        let state_snapshot = {
            let store = self.store.lock().await;
            store.state().clone()
        };
        if let Some(issue) = self
            .scheduler
            .next_ready_issue(&state_snapshot, self.tracker.as_ref())
            .await
        {
            match self.pool.dispatch(issue.id.as_str()).await {
                Ok(()) | Err(RuntimeError::NoWorkers) => {}
                Err(other) => return Err(other),
            }
        }

        if pass_due(
            self.config.quality_enabled,
            self.config.quality_interval,
            iteration,
            self.last_quality_iteration,
        ) {
            self.last_quality_iteration = Some(iteration);
            tracing::info!(iteration, "quality pass due");
        }

        if self.config.external_sync_enabled {
            if let Err(error) = self.tracker.list().await {
                tracing::debug!(%error, "external tracker sync skipped");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "main_loop_tests.rs"]
mod tests;
