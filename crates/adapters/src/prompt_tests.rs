// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn implementer_prompt_interpolates_issue_fields() {
    let prompt = build_prompt(
        PromptRole::Implementer,
        "X-1",
        "acme",
        "add a widget",
        "",
    );
    assert!(prompt.contains("issue X-1 in project acme"));
    assert!(prompt.contains("add a widget"));
    assert!(prompt.contains("READY_FOR_REVIEW"));
}

#[test]
fn reviewer_prompt_mentions_approval_sentinels() {
    let prompt = build_prompt(PromptRole::Reviewer, "X-1", "acme", "desc", "");
    assert!(prompt.contains("APPROVED"));
    assert!(prompt.contains("CHANGES_REQUESTED:"));
}

#[test]
fn extras_are_appended_verbatim() {
    let prompt = build_prompt(
        PromptRole::Planner,
        "",
        "acme",
        "",
        "Focus on the billing module.",
    );
    assert!(prompt.contains("Focus on the billing module."));
}

#[test]
fn unknown_placeholder_is_left_untouched() {
    let mut vars = HashMap::new();
    vars.insert("known".to_string(), "value".to_string());
    let rendered = interpolate("${known} ${unknown}", &vars);
    assert_eq!(rendered, "value ${unknown}");
}
