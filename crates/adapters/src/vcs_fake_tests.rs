// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn create_workspace_names_it_after_worker_id() {
    let vcs = FakeVcsAdapter::new();
    let path = vcs.create_workspace(&WorkerId::new("w0")).await.unwrap();
    assert!(path.to_string_lossy().ends_with("project-worker-w0"));
}

#[tokio::test]
async fn squash_respects_conflict_flag() {
    let vcs = FakeVcsAdapter::new();
    assert!(vcs
        .squash_from_workspace(Path::new("/fake/w0"))
        .await
        .unwrap());

    vcs.set_squash_conflicts(true);
    assert!(!vcs
        .squash_from_workspace(Path::new("/fake/w0"))
        .await
        .unwrap());
}

#[tokio::test]
async fn cleanup_removes_workspaces_not_in_owned_list() {
    let vcs = FakeVcsAdapter::new();
    let owned = vcs.create_workspace(&WorkerId::new("w0")).await.unwrap();
    vcs.create_workspace(&WorkerId::new("w1")).await.unwrap();

    let removed = vcs.cleanup_orphaned_workspaces(&[owned]).await.unwrap();
    assert_eq!(removed, 1);
}

#[tokio::test]
async fn rollback_file_is_recorded() {
    let vcs = FakeVcsAdapter::new();
    vcs.rollback_file("src/b.rs").await.unwrap();
    assert_eq!(vcs.rolled_back(), vec!["src/b.rs".to_string()]);
}
