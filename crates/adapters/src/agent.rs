// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent child-process conventions (§6): argv construction for the two
//! built-in agent flavours, environment variables exported to every child,
//! and sentinel-line detection for the streaming implement/review phases.

use std::path::Path;

/// `NOFACE_WORKSPACE` / `NOFACE_ISSUE_ID`, exported to every agent child.
pub fn child_env(workspace: &Path, issue_id: &str) -> Vec<(String, String)> {
    vec![
        (
            "NOFACE_WORKSPACE".to_string(),
            workspace.to_string_lossy().to_string(),
        ),
        ("NOFACE_ISSUE_ID".to_string(), issue_id.to_string()),
    ]
}

/// Builds the argv for `agent_name` given a fully-rendered `prompt`.
///
/// `claude` and `codex` have bespoke conventions; every other name falls
/// back to the generic `--print`/`--output-format stream-json` form.
pub fn build_argv(agent_name: &str, prompt: &str) -> Vec<String> {
    match agent_name {
        "claude" => vec![
            "--print".to_string(),
            prompt.to_string(),
            "--output-format".to_string(),
            "stream-json".to_string(),
            "--dangerously-skip-permissions".to_string(),
        ],
        "codex" => vec!["-q".to_string(), "--full-auto".to_string(), prompt.to_string()],
        _ => vec![
            "--print".to_string(),
            prompt.to_string(),
            "--output-format".to_string(),
            "stream-json".to_string(),
        ],
    }
}

/// A sentinel emitted by a child on stdout, matched by substring (one per
/// line). `READY_FOR_REVIEW` and `APPROVED` carry no payload;
/// `BLOCKED`/`CHANGES_REQUESTED` carry the text after the colon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sentinel {
    ReadyForReview,
    Blocked(String),
    Approved,
    ChangesRequested(String),
}

/// Scans `line` for a known sentinel substring. Returns `None` if the line
/// is ordinary agent chatter.
pub fn detect_sentinel(line: &str) -> Option<Sentinel> {
    if let Some(idx) = line.find("BLOCKED:") {
        return Some(Sentinel::Blocked(line[idx + "BLOCKED:".len()..].trim().to_string()));
    }
    if let Some(idx) = line.find("CHANGES_REQUESTED:") {
        return Some(Sentinel::ChangesRequested(
            line[idx + "CHANGES_REQUESTED:".len()..].trim().to_string(),
        ));
    }
    if line.contains("READY_FOR_REVIEW") {
        return Some(Sentinel::ReadyForReview);
    }
    if line.contains("APPROVED") {
        return Some(Sentinel::Approved);
    }
    None
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
