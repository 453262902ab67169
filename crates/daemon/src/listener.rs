// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command Surface (C8) server: accepts connections on the project's Unix
//! socket and translates each request into a call against the state store,
//! the worker pool, or the main loop's [`LoopHandle`].

use std::path::Path;
use std::sync::Arc;

use noface_adapters::Tracker;
use noface_core::Clock;
use noface_engine::{Command, LoopHandle, RuntimeError, WorkerPool};
use noface_storage::StateStore;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Mutex;
use tracing::{error, warn};

use crate::protocol::{self, Request, Response, StatusSummary, DEFAULT_TIMEOUT};

/// Shared handles the listener dispatches requests against.
pub struct ListenerState<C: Clock + 'static> {
    pub store: Arc<Mutex<StateStore>>,
    pub pool: Arc<WorkerPool<C>>,
    pub tracker: Arc<dyn Tracker>,
    pub loop_handle: LoopHandle,
}

pub async fn bind(socket_path: &Path) -> std::io::Result<UnixListener> {
    let _ = std::fs::remove_file(socket_path);
    UnixListener::bind(socket_path)
}

/// Accepts connections until the listener itself is dropped (daemon
/// shutdown). Each connection is handled on its own task so a slow CLI
/// client can't stall other callers.
pub async fn serve<C: Clock + 'static>(listener: UnixListener, state: Arc<ListenerState<C>>) {
    loop {
        match listener.accept().await {
            Ok((stream, _addr)) => {
                let state = state.clone();
                tokio::spawn(async move {
                    if let Err(error) = handle_connection(stream, state).await {
                        warn!(%error, "command surface connection ended with an error");
                    }
                });
            }
            Err(error) => {
                error!(%error, "failed to accept a command surface connection");
                break;
            }
        }
    }
}

async fn handle_connection<C: Clock + 'static>(
    mut stream: UnixStream,
    state: Arc<ListenerState<C>>,
) -> Result<(), protocol::ProtocolError> {
    loop {
        let request = match protocol::read_request(&mut stream, DEFAULT_TIMEOUT).await {
            Ok(request) => request,
            Err(protocol::ProtocolError::ConnectionClosed) => return Ok(()),
            Err(error) => return Err(error),
        };
        let response = dispatch(&request, &state).await;
        protocol::write_response(&mut stream, &response, DEFAULT_TIMEOUT).await?;
    }
}

async fn dispatch<C: Clock + 'static>(request: &Request, state: &ListenerState<C>) -> Response {
    match request {
        Request::Status => {
            let store = state.store.lock().await;
            let snapshot = store.state();
            Response::Status(StatusSummary {
                total_iterations: snapshot.counters.total_iterations,
                successful_completions: snapshot.counters.successful_completions,
                failed_attempts: snapshot.counters.failed_attempts,
                num_workers: snapshot.counters.num_workers,
                pending_issues: snapshot.pending_issues().count(),
                in_flight_issues: snapshot.in_flight_issues().count(),
            })
        }
        Request::Pause => send_command(state, Command::Pause).await,
        Request::Resume => send_command(state, Command::Resume).await,
        Request::Step => send_command(state, Command::Step).await,
        Request::Interrupt => send_command(state, Command::Interrupt).await,
        Request::FileIssue { title, body, labels } => {
            match state
                .tracker
                .create(title, body.as_deref(), labels)
                .await
            {
                Ok(id) => Response::IssueCreated { id },
                Err(error) => error_response("tracker_error", error.to_string()),
            }
        }
        Request::InspectIssue { id } => {
            let store = state.store.lock().await;
            match store.state().get_issue(id) {
                Some(issue) => match serde_json::to_value(issue) {
                    Ok(value) => Response::Issue(value),
                    Err(error) => error_response("serialize_error", error.to_string()),
                },
                None => error_response("not_found", format!("unknown issue: {id}")),
            }
        }
        Request::AddComment { id, author, body } => {
            match state.tracker.comment(id, &format!("{author}: {body}")).await {
                Ok(()) => Response::Ack,
                Err(error) => error_response("tracker_error", error.to_string()),
            }
        }
        Request::UpdateIssueContent { id, fields } => {
            let value = serde_json::to_value(fields).unwrap_or(serde_json::Value::Null);
            match state.tracker.update(id, value).await {
                Ok(()) => Response::Ack,
                Err(error) => error_response("tracker_error", error.to_string()),
            }
        }
    }
}

async fn send_command<C: Clock + 'static>(state: &ListenerState<C>, command: Command) -> Response {
    match state.loop_handle.send(command).await {
        Ok(()) => Response::Ack,
        Err(RuntimeError::NotRunning) => error_response("not_running", "main loop is not running".to_string()),
        Err(RuntimeError::AlreadyPaused) => error_response("already_paused", "main loop is already paused".to_string()),
        Err(RuntimeError::NotPaused) => error_response("not_paused", "main loop is not paused".to_string()),
        Err(other) => error_response("internal_error", other.to_string()),
    }
}

fn error_response(kind: &str, message: String) -> Response {
    Response::Error {
        kind: kind.to_string(),
        message,
    }
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
