// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

#[test]
fn save_then_load_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshot.json");

    let mut state = MaterializedState::default();
    state.project_name = "noface".to_string();

    let snapshot = Snapshot::new(5, state);
    snapshot.save(&path).unwrap();

    let loaded = Snapshot::load(&path).unwrap().unwrap();
    assert_eq!(loaded.seq, 5);
    assert_eq!(loaded.state.project_name, "noface");
}

#[test]
fn load_returns_none_when_absent() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.json");
    assert!(Snapshot::load(&path).unwrap().is_none());
}

#[test]
fn load_rotates_corrupt_file_to_bak_and_returns_none() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    std::fs::write(&path, b"not json").unwrap();

    let result = Snapshot::load(&path).unwrap();
    assert!(result.is_none());
    assert!(path.with_extension("bak").exists());
    assert!(!path.exists());
}

#[test]
fn rotate_bak_path_shifts_existing_backups() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    let bak1 = path.with_extension("bak");
    let bak2 = path.with_extension("bak.2");

    std::fs::write(&bak1, b"first").unwrap();
    let next = rotate_bak_path(&path);
    assert_eq!(next, bak1);

    std::fs::write(&bak1, b"second").unwrap();
    std::fs::rename(&bak1, &bak2).unwrap();
    assert!(bak2.exists());
}
