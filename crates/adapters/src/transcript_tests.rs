// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn noop_store_accepts_any_number_of_events() {
    let store = NoopTranscriptStore;
    let session = store.start_session("X-1", "implementer").await;
    store
        .record_event(
            &session,
            TranscriptEvent {
                wallclock_timestamp: 0,
                line: "hello".to_string(),
            },
        )
        .await;
    store.end_session(&session).await;
}

#[tokio::test]
async fn in_memory_store_retains_recorded_events_in_order() {
    let store = InMemoryTranscriptStore::new();
    let session = store.start_session("X-1", "implementer").await;
    store
        .record_event(
            &session,
            TranscriptEvent {
                wallclock_timestamp: 1,
                line: "first".to_string(),
            },
        )
        .await;
    store
        .record_event(
            &session,
            TranscriptEvent {
                wallclock_timestamp: 2,
                line: "second".to_string(),
            },
        )
        .await;

    let events = store.events_for(&session);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].line, "first");
    assert_eq!(events[1].line, "second");
}

#[tokio::test]
async fn distinct_sessions_do_not_share_events() {
    let store = InMemoryTranscriptStore::new();
    let session_a = store.start_session("X-1", "implementer").await;
    let session_b = store.start_session("X-2", "reviewer").await;
    store
        .record_event(
            &session_a,
            TranscriptEvent {
                wallclock_timestamp: 1,
                line: "only in a".to_string(),
            },
        )
        .await;

    assert_eq!(store.events_for(&session_a).len(), 1);
    assert!(store.events_for(&session_b).is_empty());
    assert_eq!(store.session_count(), 2);
}
