// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn is_success_reflects_result() {
    let ok = AttemptRecord::new(1, 0, AttemptResult::Success);
    assert!(ok.is_success());

    let fail = AttemptRecord::new(1, 0, AttemptResult::Failed);
    assert!(!fail.is_success());
}

#[test]
fn builder_methods_set_fields() {
    let record = AttemptRecord::new(2, 1000, AttemptResult::Violation)
        .with_files_touched(vec!["src/a.rs".into()])
        .with_notes("touched forbidden file");

    assert_eq!(record.files_touched, vec!["src/a.rs".to_string()]);
    assert_eq!(record.notes, "touched forbidden file");
    assert!(record.instrumentation.is_none());
}
