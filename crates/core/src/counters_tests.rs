// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn new_counters_start_at_zero_except_next_batch_id() {
    let counters = Counters::new(4);
    assert_eq!(counters.total_iterations, 0);
    assert_eq!(counters.successful_completions, 0);
    assert_eq!(counters.failed_attempts, 0);
    assert_eq!(counters.next_batch_id, 1);
    assert_eq!(counters.num_workers, 4);
}

#[test]
fn take_next_batch_id_increments_monotonically() {
    let mut counters = Counters::new(1);
    assert_eq!(counters.take_next_batch_id(), 1);
    assert_eq!(counters.take_next_batch_id(), 2);
    assert_eq!(counters.next_batch_id, 3);
}

#[test]
fn record_methods_are_monotonic() {
    let mut counters = Counters::new(1);
    counters.record_iteration();
    counters.record_iteration();
    counters.record_success();
    counters.record_failure();

    assert_eq!(counters.total_iterations, 2);
    assert_eq!(counters.successful_completions, 1);
    assert_eq!(counters.failed_attempts, 1);
}
