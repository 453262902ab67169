// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transcript recording for agent sessions (§6). The orchestrator never
//! depends on transcripts for correctness; they exist purely for operator
//! observability, so a no-op implementation is a legitimate collaborator.

use async_trait::async_trait;
use parking_lot::Mutex;

/// A single recorded line of agent output or a control marker, with the
/// wallclock time it was observed.
#[derive(Debug, Clone)]
pub struct TranscriptEvent {
    pub wallclock_timestamp: u64,
    pub line: String,
}

#[async_trait]
pub trait TranscriptStore: Send + Sync {
    async fn start_session(&self, issue_id: &str, role: &str) -> TranscriptSessionId;
    async fn record_event(&self, session: &TranscriptSessionId, event: TranscriptEvent);
    async fn end_session(&self, session: &TranscriptSessionId);
}

/// Opaque handle identifying one recorded session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TranscriptSessionId(pub String);

/// Drops everything. The default collaborator when no transcript backend is
/// configured.
#[derive(Debug, Default)]
pub struct NoopTranscriptStore;

#[async_trait]
impl TranscriptStore for NoopTranscriptStore {
    async fn start_session(&self, issue_id: &str, role: &str) -> TranscriptSessionId {
        TranscriptSessionId(format!("{issue_id}:{role}"))
    }

    async fn record_event(&self, _session: &TranscriptSessionId, _event: TranscriptEvent) {}

    async fn end_session(&self, _session: &TranscriptSessionId) {}
}

/// Keeps every recorded event in memory, for tests that need to assert on
/// what was recorded.
#[derive(Default)]
pub struct InMemoryTranscriptStore {
    sessions: Mutex<Vec<(TranscriptSessionId, Vec<TranscriptEvent>)>>,
}

impl InMemoryTranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events_for(&self, session: &TranscriptSessionId) -> Vec<TranscriptEvent> {
        self.sessions
            .lock()
            .iter()
            .find(|(id, _)| id == session)
            .map(|(_, events)| events.clone())
            .unwrap_or_default()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().len()
    }
}

#[async_trait]
impl TranscriptStore for InMemoryTranscriptStore {
    async fn start_session(&self, issue_id: &str, role: &str) -> TranscriptSessionId {
        let id = TranscriptSessionId(format!("{issue_id}:{role}"));
        self.sessions.lock().push((id.clone(), Vec::new()));
        id
    }

    async fn record_event(&self, session: &TranscriptSessionId, event: TranscriptEvent) {
        let mut sessions = self.sessions.lock();
        if let Some((_, events)) = sessions.iter_mut().find(|(id, _)| id == session) {
            events.push(event);
        }
    }

    async fn end_session(&self, _session: &TranscriptSessionId) {}
}

#[cfg(test)]
#[path = "transcript_tests.rs"]
mod tests;
