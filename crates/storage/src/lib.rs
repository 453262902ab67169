// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Crash-recoverable event-sourced state store for the noface orchestrator.

mod event;
mod snapshot;
mod state;
mod store;
mod wal;

pub use event::{attempt_event, Event};
pub use snapshot::{Snapshot, SnapshotError};
pub use state::MaterializedState;
pub use store::{SnapshotEvent, StateStore, StoreError};
pub use wal::{Wal, WalEntry, WalError};
