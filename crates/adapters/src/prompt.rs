// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure prompt construction for agent roles (§6). Templates are interpolated
//! with `${name}` placeholders, following the same substitution convention
//! the workspace uses for runbook variables.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::expect_used)]
static VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([a-zA-Z_][a-zA-Z0-9_]*)\}").expect("constant regex pattern is valid")
});

/// The role an agent child process is spawned to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptRole {
    Implementer,
    Reviewer,
    Merge,
    Planner,
    Quality,
    Breakdown,
}

impl PromptRole {
    fn template(self) -> &'static str {
        match self {
            PromptRole::Implementer => IMPLEMENTER_TEMPLATE,
            PromptRole::Reviewer => REVIEWER_TEMPLATE,
            PromptRole::Merge => MERGE_TEMPLATE,
            PromptRole::Planner => PLANNER_TEMPLATE,
            PromptRole::Quality => QUALITY_TEMPLATE,
            PromptRole::Breakdown => BREAKDOWN_TEMPLATE,
        }
    }
}

const IMPLEMENTER_TEMPLATE: &str = "\
You are implementing issue ${issue_id} in project ${project_name}.

${issue_description}

Work only within your assigned workspace. When the change is complete and \
tests pass, print READY_FOR_REVIEW on its own line. If you cannot proceed, \
print BLOCKED: <reason> instead.
${extras}";

const REVIEWER_TEMPLATE: &str = "\
Review the change made for issue ${issue_id} in project ${project_name}.

${issue_description}

If the change is acceptable, print APPROVED on its own line. Otherwise print \
CHANGES_REQUESTED: <feedback>.
${extras}";

const MERGE_TEMPLATE: &str = "\
Prepare the approved change for issue ${issue_id} in project ${project_name} \
for merge. Squash the workspace history into a single commit with a \
descriptive message.
${extras}";

const PLANNER_TEMPLATE: &str = "\
You are the planner for project ${project_name}. Review the current \
backlog and file any new issues, dependencies, or priority adjustments \
that would help the project move forward.
${extras}";

const QUALITY_TEMPLATE: &str = "\
You are running a quality pass over project ${project_name}. Look for \
regressions, flaky behaviour, or missing coverage introduced by recent \
merges, and file issues for anything you find.
${extras}";

const BREAKDOWN_TEMPLATE: &str = "\
Issue ${issue_id} in project ${project_name} is too large for a single \
attempt.

${issue_description}

Break it down into smaller issues and file them, adding dependencies \
between them as needed.
${extras}";

/// Renders the prompt for `role`. `extras` is interpolated verbatim as the
/// trailing `${extras}` section (empty string if the caller has nothing to
/// add); all other placeholders come from `vars`.
pub fn build_prompt(
    role: PromptRole,
    issue_id: &str,
    project_name: &str,
    issue_description: &str,
    extras: &str,
) -> String {
    let mut vars = HashMap::new();
    vars.insert("issue_id".to_string(), issue_id.to_string());
    vars.insert("project_name".to_string(), project_name.to_string());
    vars.insert(
        "issue_description".to_string(),
        issue_description.to_string(),
    );
    vars.insert("extras".to_string(), extras.to_string());
    interpolate(role.template(), &vars)
}

fn interpolate(template: &str, vars: &HashMap<String, String>) -> String {
    VAR_PATTERN
        .replace_all(template, |caps: &regex::Captures| {
            let name = &caps[1];
            vars.get(name).cloned().unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod tests;
