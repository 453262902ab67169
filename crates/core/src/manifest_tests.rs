// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn base_path_strips_line_range_suffix() {
    let entry = ManifestEntry::new("src/a.rs:10-40");
    assert_eq!(entry.base_path(), "src/a.rs");
}

#[test]
fn base_path_is_noop_without_suffix() {
    let entry = ManifestEntry::new("src/a.rs");
    assert_eq!(entry.base_path(), "src/a.rs");
}

#[test]
fn owns_path_matches_base_path() {
    let manifest = Manifest::new(vec!["src/a.rs:1-5".into()], vec![], vec![]);
    assert!(manifest.owns_path("src/a.rs"));
    assert!(!manifest.owns_path("src/b.rs"));
}

#[test]
fn forbids_path_matches_forbidden_entries() {
    let manifest = Manifest::new(vec![], vec![], vec!["src/secret.rs".into()]);
    assert!(manifest.forbids_path("src/secret.rs"));
}

#[test]
fn conflicts_with_detects_shared_primary_base_path() {
    let a = Manifest::new(vec!["src/a.rs:1-10".into()], vec![], vec![]);
    let b = Manifest::new(vec!["src/a.rs:20-30".into()], vec![], vec![]);
    assert!(a.conflicts_with(&b));
}

#[test]
fn conflicts_with_is_false_for_disjoint_files() {
    let a = Manifest::new(vec!["src/a.rs".into()], vec![], vec![]);
    let b = Manifest::new(vec!["src/b.rs".into()], vec![], vec![]);
    assert!(!a.conflicts_with(&b));
}
