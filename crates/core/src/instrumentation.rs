// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Instrumentation: how well a manifest predicted the files an attempt touched.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// `{predicted, touched}` plus derived accuracy quantities.
///
/// `null` (i.e. absent) when the issue has no manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrumentation {
    pub predicted: BTreeSet<String>,
    pub touched: BTreeSet<String>,
}

impl Instrumentation {
    pub fn new(predicted: BTreeSet<String>, touched: BTreeSet<String>) -> Self {
        Self { predicted, touched }
    }

    /// `predicted − touched`.
    pub fn false_positives(&self) -> BTreeSet<String> {
        self.predicted.difference(&self.touched).cloned().collect()
    }

    /// `touched − predicted`.
    pub fn false_negatives(&self) -> BTreeSet<String> {
        self.touched.difference(&self.predicted).cloned().collect()
    }

    /// `|predicted ∩ touched| / |predicted ∪ touched|`, or `1.0` if both sets are empty.
    pub fn accuracy(&self) -> f64 {
        let union = self.predicted.union(&self.touched).count();
        if union == 0 {
            return 1.0;
        }
        let intersection = self.predicted.intersection(&self.touched).count();
        intersection as f64 / union as f64
    }
}

#[cfg(test)]
#[path = "instrumentation_tests.rs"]
mod tests;
