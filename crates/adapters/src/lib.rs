// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! External-process and external-service adapters for the noface
//! orchestrator: agent spawning conventions, VCS workspace management, the
//! issue tracker client, prompt construction, transcript recording, and
//! operator notification.

pub mod agent;
pub mod notify;
pub mod process;
pub mod prompt;
pub mod tracker;
pub mod transcript;
pub mod vcs;

#[cfg(any(test, feature = "test-support"))]
pub mod tracker_fake;
#[cfg(any(test, feature = "test-support"))]
pub mod vcs_fake;

pub use agent::{build_argv, child_env, detect_sentinel, Sentinel};
pub use notify::{Notification, Notifier, TracingNotifier};
pub use process::{run_with_timeout, LineEvent, ProcessError, ProcessRunner};
pub use prompt::{build_prompt, PromptRole};
pub use tracker::{CliTracker, Tracker, TrackerError, TrackerIssue, TrackerIssueStatus};
pub use transcript::{
    InMemoryTranscriptStore, NoopTranscriptStore, TranscriptEvent, TranscriptSessionId,
    TranscriptStore,
};
pub use vcs::{ChangedFiles, JjAdapter, VcsAdapter, VcsError};

#[cfg(any(test, feature = "test-support"))]
pub use tracker_fake::FakeTracker;
#[cfg(any(test, feature = "test-support"))]
pub use vcs_fake::FakeVcsAdapter;
