// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Compliance Engine (C4): a pure function module operating on snapshots of
//! `MaterializedState`. No adapter trait — just small, serializable value
//! types with a thin `impl` block.

use noface_core::{Instrumentation, Issue, Manifest};
use std::collections::BTreeSet;

/// Result of checking one issue's change-set against its manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceReport {
    pub compliant: bool,
    pub unauthorized: BTreeSet<String>,
    pub forbidden_touched: BTreeSet<String>,
    pub instrumentation: Option<Instrumentation>,
}

impl ComplianceReport {
    /// Union of every file that should be rolled back on non-compliance.
    pub fn rollback_candidates(&self) -> BTreeSet<String> {
        self.unauthorized
            .union(&self.forbidden_touched)
            .cloned()
            .collect()
    }
}

/// Checks `issue`'s change-set for compliance with its manifest.
///
/// `raw` is the current changed-file set from the VCS adapter; `baseline` is
/// the pre-run snapshot; `other_manifests` is every other known issue's
/// manifest (not only in-flight ones — any issue that has ever declared
/// ownership of a file is honoured).
pub fn check_compliance<'a>(
    issue: &Issue,
    raw: &BTreeSet<String>,
    baseline: &BTreeSet<String>,
    other_manifests: impl IntoIterator<Item = &'a Manifest>,
) -> ComplianceReport {
    let other_base_paths: BTreeSet<String> = other_manifests
        .into_iter()
        .flat_map(|m| m.primary_base_paths())
        .map(str::to_string)
        .collect();

    let candidate: BTreeSet<String> = raw
        .difference(baseline)
        .filter(|f| !other_base_paths.contains(base_path(f)))
        .cloned()
        .collect();

    let Some(manifest) = &issue.manifest else {
        return ComplianceReport {
            compliant: true,
            unauthorized: BTreeSet::new(),
            forbidden_touched: BTreeSet::new(),
            instrumentation: None,
        };
    };

    let mut unauthorized = BTreeSet::new();
    let mut forbidden_touched = BTreeSet::new();
    for f in &candidate {
        if manifest.forbids_path(f) {
            forbidden_touched.insert(f.clone());
        } else if !manifest.owns_path(f) {
            unauthorized.insert(f.clone());
        }
    }

    let predicted: BTreeSet<String> = manifest
        .primary_base_paths()
        .into_iter()
        .map(str::to_string)
        .collect();
    let instrumentation = Instrumentation {
        predicted,
        touched: candidate,
    };

    ComplianceReport {
        compliant: unauthorized.is_empty() && forbidden_touched.is_empty(),
        unauthorized,
        forbidden_touched,
        instrumentation: Some(instrumentation),
    }
}

fn base_path(path: &str) -> &str {
    path.split_once(':').map_or(path, |(base, _)| base)
}

#[cfg(test)]
#[path = "compliance_tests.rs"]
mod tests;
