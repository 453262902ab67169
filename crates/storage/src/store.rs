// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `StateStore`: the facade the rest of the system talks to.
//!
//! Wires together the WAL, the snapshot file, and `MaterializedState` into a
//! single-writer store. The key durability invariant, carried over from the
//! checkpointing design this is grounded on: the snapshot must be durable on
//! disk *before* the WAL is truncated, so a crash between the two leaves the
//! WAL as the source of truth rather than losing events.

use crate::event::Event;
use crate::snapshot::{Snapshot, SnapshotError};
use crate::state::MaterializedState;
use crate::wal::{Wal, WalError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::info;

const SNAPSHOT_EVENT_CAPACITY: usize = 256;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Wal(#[from] WalError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Emitted after every successfully applied event, in mutation order.
///
/// Carries a full clone of the materialized state as of `seq`, not just the
/// triggering event, so a subscriber that only sees the latest broadcast
/// (a slow observer that dropped intermediate ones) still has a consistent,
/// complete point-in-time view rather than a diff it can't apply. Observers
/// (e.g. a status-watching CLI) may be slow and drop events; they should
/// read `state` directly rather than try to replay the skipped `event`s.
#[derive(Debug, Clone)]
pub struct SnapshotEvent {
    pub seq: u64,
    pub event: Event,
    pub state: MaterializedState,
}

/// Single-writer, crash-recoverable state store.
///
/// `<projroot>/.noface/state.wal` and `.../state.snapshot` back one store.
/// All mutations go through [`Self::append`]; reads of [`Self::state`] may
/// happen concurrently with writes from other tasks holding the same
/// `Arc<Mutex<StateStore>>` (the mutex is the caller's responsibility — this
/// type itself is `!Sync` by convention, matching the teacher's single
/// writer policy for the VCS adapter).
pub struct StateStore {
    wal: Wal,
    state: MaterializedState,
    snapshot_path: PathBuf,
    events_tx: broadcast::Sender<SnapshotEvent>,
}

impl StateStore {
    /// Opens (or creates) a store rooted at `dir`, replaying the snapshot and
    /// any WAL entries written after it. Returns the number of slots the
    /// crash-recovery pass reset (0 on a clean start).
    pub fn open(dir: &Path) -> Result<(Self, usize), StoreError> {
        std::fs::create_dir_all(dir).map_err(WalError::Io)?;
        let snapshot_path = dir.join("state.snapshot");
        let wal_path = dir.join("state.wal");

        let snapshot = Snapshot::load(&snapshot_path)?;
        let (mut state, processed_seq) = match snapshot {
            Some(s) => (s.state, s.seq),
            None => (MaterializedState::default(), 0),
        };

        let mut wal = Wal::open(&wal_path, processed_seq)?;
        while let Some(entry) = wal.next_unprocessed()? {
            state.apply_event(&entry.event);
            wal.mark_processed(entry.seq);
        }

        let reset_count = state.reconcile_after_crash();
        if reset_count > 0 {
            info!(reset_count, "crash recovery reset stuck worker slots");
        }

        let (events_tx, _) = broadcast::channel(SNAPSHOT_EVENT_CAPACITY);

        Ok((
            Self {
                wal,
                state,
                snapshot_path,
                events_tx,
            },
            reset_count,
        ))
    }

    /// Appends `event`, flushes it durably, applies it to the materialized
    /// state, and broadcasts it to subscribers. This is the only mutation
    /// path — state-store writes are linearised by requiring `&mut self`.
    pub fn append(&mut self, event: Event) -> Result<u64, StoreError> {
        let seq = self.wal.append(&event)?;
        self.wal.flush()?;
        self.state.apply_event(&event);
        self.wal.mark_processed(seq);
        let _ = self.events_tx.send(SnapshotEvent {
            seq,
            event: event.clone(),
            state: self.state.clone(),
        });
        Ok(seq)
    }

    pub fn state(&self) -> &MaterializedState {
        &self.state
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SnapshotEvent> {
        self.events_tx.subscribe()
    }

    /// Writes a snapshot at the current sequence and truncates the WAL
    /// before it. Snapshot-then-truncate, never the reverse.
    pub fn checkpoint(&mut self) -> Result<(), StoreError> {
        let seq = self.wal.processed_seq();
        let snapshot = Snapshot::new(seq, self.state.clone());
        snapshot.save(&self.snapshot_path)?;
        self.wal.truncate_before(seq)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
