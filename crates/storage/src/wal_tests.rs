// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

fn sample_event(issue_id: &str) -> Event {
    Event::IssueStarted {
        issue_id: issue_id.to_string(),
    }
}

#[test]
fn append_and_flush_persists_entries() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.jsonl");

    let mut wal = Wal::open(&path, 0).unwrap();
    let seq1 = wal.append(&sample_event("X-1")).unwrap();
    let seq2 = wal.append(&sample_event("X-2")).unwrap();
    assert_eq!((seq1, seq2), (1, 2));
    wal.flush().unwrap();

    assert_eq!(wal.write_seq(), 2);
    assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 2);
}

#[test]
fn next_unprocessed_advances_past_processed_seq() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.jsonl");

    let mut wal = Wal::open(&path, 0).unwrap();
    wal.append(&sample_event("X-1")).unwrap();
    wal.append(&sample_event("X-2")).unwrap();
    wal.flush().unwrap();

    let first = wal.next_unprocessed().unwrap().unwrap();
    assert_eq!(first.seq, 1);
    wal.mark_processed(first.seq);

    let second = wal.next_unprocessed().unwrap().unwrap();
    assert_eq!(second.seq, 2);

    assert!(wal.next_unprocessed().unwrap().is_none());
}

#[test]
fn reopening_resumes_from_processed_seq() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.jsonl");

    {
        let mut wal = Wal::open(&path, 0).unwrap();
        wal.append(&sample_event("X-1")).unwrap();
        wal.append(&sample_event("X-2")).unwrap();
        wal.flush().unwrap();
    }

    let mut wal = Wal::open(&path, 1).unwrap();
    assert_eq!(wal.write_seq(), 2);
    let entry = wal.next_unprocessed().unwrap().unwrap();
    assert_eq!(entry.seq, 2);
}

#[test]
fn entries_after_returns_only_newer_entries() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.jsonl");

    let mut wal = Wal::open(&path, 0).unwrap();
    wal.append(&sample_event("X-1")).unwrap();
    wal.append(&sample_event("X-2")).unwrap();
    wal.append(&sample_event("X-3")).unwrap();
    wal.flush().unwrap();

    let entries = wal.entries_after(1).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].seq, 2);
    assert_eq!(entries[1].seq, 3);
}

#[test]
fn truncate_before_drops_old_entries_and_keeps_rest() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.jsonl");

    let mut wal = Wal::open(&path, 0).unwrap();
    wal.append(&sample_event("X-1")).unwrap();
    wal.append(&sample_event("X-2")).unwrap();
    wal.append(&sample_event("X-3")).unwrap();
    wal.flush().unwrap();
    wal.mark_processed(3);

    wal.truncate_before(3).unwrap();

    let entries = wal.entries_after(0).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].seq, 3);
}

#[test]
fn corrupt_tail_is_rotated_to_bak_on_open() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.jsonl");

    {
        let mut wal = Wal::open(&path, 0).unwrap();
        wal.append(&sample_event("X-1")).unwrap();
        wal.flush().unwrap();
    }
    use std::io::Write as _;
    let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
    writeln!(file, "{{not valid json").unwrap();

    let mut wal = Wal::open(&path, 0).unwrap();
    assert!(path.with_extension("bak").exists());
    let entry = wal.next_unprocessed().unwrap().unwrap();
    assert_eq!(entry.seq, 1);
}
