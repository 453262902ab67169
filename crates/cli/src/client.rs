// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon client: connects to the project's Unix socket, starting the
//! daemon on demand if it isn't already running.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use noface_daemon::lifecycle;
use noface_daemon::protocol::{self, ProtocolError, Request, Response};
use thiserror::Error;
use tokio::net::UnixStream;

use crate::daemon_process;

fn timeout_connect() -> Duration {
    std::env::var("NOFACE_TIMEOUT_CONNECT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}

fn poll_interval() -> Duration {
    Duration::from_millis(50)
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("daemon is not running for this project")]
    DaemonNotRunning,
    #[error("failed to start daemon: {0}")]
    DaemonStartFailed(String),
    #[error("timed out waiting for the daemon to start")]
    DaemonStartTimeout,
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct DaemonClient {
    socket_path: PathBuf,
}

impl DaemonClient {
    /// Connects to an already-running daemon for `project_root`, failing
    /// with [`ClientError::DaemonNotRunning`] rather than starting one.
    pub async fn connect(project_root: &Path) -> Result<Self, ClientError> {
        let config = lifecycle::Config::load(project_root);
        if UnixStream::connect(&config.socket_path).await.is_err() {
            return Err(ClientError::DaemonNotRunning);
        }
        Ok(Self { socket_path: config.socket_path })
    }

    /// Connects to the daemon for `project_root`, spawning it in the
    /// background and polling the socket until it accepts connections.
    pub async fn connect_or_start(project_root: &Path) -> Result<Self, ClientError> {
        let config = lifecycle::Config::load(project_root);
        if UnixStream::connect(&config.socket_path).await.is_ok() {
            return Ok(Self { socket_path: config.socket_path });
        }

        daemon_process::start_daemon_background(project_root)
            .map_err(|error| ClientError::DaemonStartFailed(error.to_string()))?;

        let deadline = Instant::now() + timeout_connect();
        loop {
            if UnixStream::connect(&config.socket_path).await.is_ok() {
                return Ok(Self { socket_path: config.socket_path });
            }
            if Instant::now() >= deadline {
                return Err(ClientError::DaemonStartTimeout);
            }
            tokio::time::sleep(poll_interval()).await;
        }
    }

    pub async fn send(&self, request: &Request) -> Result<Response, ClientError> {
        let mut stream = UnixStream::connect(&self.socket_path).await?;
        let bytes = protocol::encode(request)?;
        protocol::write_message(&mut stream, &bytes).await?;
        let reply = protocol::read_message(&mut stream).await?;
        Ok(protocol::decode(&reply)?)
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
