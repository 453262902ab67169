// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Data model for the noface agent orchestrator.
//!
//! This crate owns the types shared by every other crate in the workspace —
//! issues, manifests, worker slots, batches, counters, and configuration —
//! along with the `Clock` and ID-generation abstractions used to keep the
//! rest of the system deterministic under test.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod attempt;
pub mod batch;
pub mod clock;
pub mod config;
pub mod counters;
pub mod id;
pub mod instrumentation;
pub mod issue;
pub mod manifest;
pub mod worker;

pub use attempt::{AttemptRecord, AttemptResult};
pub use batch::{Batch, BatchId, BatchStatus};
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{AgentsConfig, Config, ConfigError, PassesConfig, PlannerMode, RuntimeConfig, TrackerConfig, TrackerType};
pub use counters::Counters;
pub use id::{IdGen, SequentialIdGen, ShortId, UuidIdGen};
pub use instrumentation::Instrumentation;
pub use issue::{Comment, Issue, IssueContent, IssueId, IssueStatus};
pub use manifest::{Manifest, ManifestEntry};
pub use worker::{WorkerId, WorkerSlot, WorkerStatus, MAX_WORKERS};
