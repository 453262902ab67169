// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Manifest: the per-issue declaration of which files it may touch.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A `primary_files`/`read_files`/`forbidden_files` entry.
///
/// May carry an optional `:startLine-endLine` suffix (e.g.
/// `"src/a.rs:10-40"`); only the substring before the first `:` — the
/// *base path* — matters for ownership and conflict checks.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManifestEntry(pub String);

impl ManifestEntry {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// The substring before the first `:`, used for ownership/conflict checks.
    pub fn base_path(&self) -> &str {
        match self.0.split_once(':') {
            Some((base, _)) => base,
            None => &self.0,
        }
    }
}

impl From<&str> for ManifestEntry {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for ManifestEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Three disjoint file sets belonging to one issue.
///
/// Set at planning time or when first encountered; replaced atomically;
/// never partially mutated (§3).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Exclusive write set.
    #[serde(default)]
    pub primary_files: Vec<ManifestEntry>,
    /// Advisory read set.
    #[serde(default)]
    pub read_files: Vec<ManifestEntry>,
    /// Must not be touched.
    #[serde(default)]
    pub forbidden_files: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn new(
        primary_files: Vec<ManifestEntry>,
        read_files: Vec<ManifestEntry>,
        forbidden_files: Vec<ManifestEntry>,
    ) -> Self {
        Self {
            primary_files,
            read_files,
            forbidden_files,
        }
    }

    /// Base paths of `primary_files`, deduplicated.
    pub fn primary_base_paths(&self) -> BTreeSet<&str> {
        self.primary_files.iter().map(|e| e.base_path()).collect()
    }

    /// True if `path` equals, or shares a base path with, any `primary_files` entry.
    pub fn owns_path(&self, path: &str) -> bool {
        self.primary_files
            .iter()
            .any(|e| e.0 == path || e.base_path() == path)
    }

    /// True if `path` matches any `forbidden_files` entry (by base path).
    pub fn forbids_path(&self, path: &str) -> bool {
        self.forbidden_files
            .iter()
            .any(|e| e.0 == path || e.base_path() == path)
    }

    /// True if this manifest's `primary_files` base paths intersect `other`'s.
    pub fn conflicts_with(&self, other: &Manifest) -> bool {
        let ours = self.primary_base_paths();
        other
            .primary_base_paths()
            .iter()
            .any(|p| ours.contains(p))
    }
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
