// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process Runner (C1): spawns child processes and streams their stdout
//! line-by-line with a per-line idle timeout.
//!
//! Two shapes are exposed: [`run_with_timeout`] for short-lived CLI calls
//! (external tracker, VCS plumbing) that only need a captured `Output`, and
//! [`ProcessRunner`] for the long-lived implementer/reviewer children whose
//! stdout must be read incrementally so a hung agent can be killed instead
//! of blocking forever.

use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStdout, Command};

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("{description} failed: {source}")]
    Io {
        description: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{description} timed out after {timeout_secs}s")]
    Timeout {
        description: String,
        timeout_secs: u64,
    },
}

/// Runs `cmd` to completion, killing it if it exceeds `timeout`.
///
/// Used for short CLI calls (tracker list/ready/create, VCS plumbing) where
/// only the final captured output matters.
pub async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    description: &str,
) -> Result<std::process::Output, ProcessError> {
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(source)) => Err(ProcessError::Io {
            description: description.to_string(),
            source,
        }),
        Err(_elapsed) => Err(ProcessError::Timeout {
            description: description.to_string(),
            timeout_secs: timeout.as_secs(),
        }),
    }
}

/// Outcome of reading one line from a streaming child's stdout.
#[derive(Debug)]
pub enum LineEvent {
    /// A line was produced (sentinel substrings are matched by the caller).
    Line(String),
    /// The child closed stdout without another line.
    Eof,
    /// No line arrived within the idle timeout; the child is still alive.
    Timeout,
}

/// A spawned child whose stdout is read one line at a time.
///
/// Suspension points — spawning, each `read_line`, and the final `wait` —
/// are all plain `.await`s and so are cancellation-safe drop points for a
/// `tokio::select!` around a `CancellationToken`.
pub struct ProcessRunner {
    child: Child,
    stdout: BufReader<ChildStdout>,
    /// Bytes of the next line read so far but not yet terminated by a
    /// newline, carried across `Timeout` returns (§4.1: "a partially
    /// buffered line survives across timeout returns; the next call resumes
    /// it"). `read_line` appends to this buffer rather than replacing it, so
    /// a sentinel split across an idle-timeout boundary is never lost.
    pending: String,
}

impl ProcessRunner {
    /// Spawns `cmd` with stdout piped (stdin/stderr are left to the caller's
    /// configuration of `cmd`).
    pub fn spawn(mut cmd: Command, description: &str) -> Result<Self, ProcessError> {
        cmd.stdout(Stdio::piped());
        let mut child = cmd.spawn().map_err(|source| ProcessError::Io {
            description: description.to_string(),
            source,
        })?;
        let stdout = child.stdout.take().ok_or_else(|| ProcessError::Io {
            description: description.to_string(),
            source: std::io::Error::other("child stdout was not piped"),
        })?;
        Ok(Self {
            child,
            stdout: BufReader::new(stdout),
            pending: String::new(),
        })
    }

    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    /// Reads one line, or times out if none arrives within `idle_timeout`.
    /// A zero timeout means block indefinitely (§4.1).
    pub async fn read_line(&mut self, idle_timeout: Duration) -> Result<LineEvent, ProcessError> {
        if idle_timeout.is_zero() {
            return match self.stdout.read_line(&mut self.pending).await {
                Ok(0) => Ok(LineEvent::Eof),
                Ok(_) => Ok(LineEvent::Line(self.take_pending_line())),
                Err(source) => Err(ProcessError::Io {
                    description: "reading child stdout".to_string(),
                    source,
                }),
            };
        }
        match tokio::time::timeout(idle_timeout, self.stdout.read_line(&mut self.pending)).await {
            Ok(Ok(0)) => Ok(LineEvent::Eof),
            Ok(Ok(_)) => Ok(LineEvent::Line(self.take_pending_line())),
            Ok(Err(source)) => Err(ProcessError::Io {
                description: "reading child stdout".to_string(),
                source,
            }),
            // `self.pending` keeps whatever partial bytes were already read
            // this call; the next call resumes appending into it.
            Err(_elapsed) => Ok(LineEvent::Timeout),
        }
    }

    /// Takes the accumulated line out of `pending`, trimming its terminator.
    fn take_pending_line(&mut self) -> String {
        std::mem::take(&mut self.pending).trim_end().to_string()
    }

    /// Kills the child immediately. Used on idle-timeout and on
    /// `interrupt_all` cancellation.
    pub async fn kill(&mut self) -> Result<(), ProcessError> {
        self.child.kill().await.map_err(|source| ProcessError::Io {
            description: "killing child process".to_string(),
            source,
        })
    }

    /// Waits for the child to exit, returning its exit code (`-1` if it was
    /// killed by a signal rather than exiting normally — matches the
    /// `WorkerResult` convention for crashed children).
    pub async fn wait(&mut self) -> Result<i32, ProcessError> {
        let status = self.child.wait().await.map_err(|source| ProcessError::Io {
            description: "waiting for child process".to_string(),
            source,
        })?;
        Ok(status.code().unwrap_or(-1))
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
