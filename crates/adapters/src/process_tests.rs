// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tokio::process::Command;

#[tokio::test]
async fn run_with_timeout_success() {
    let mut cmd = Command::new("echo");
    cmd.arg("hello");
    let output = run_with_timeout(cmd, Duration::from_secs(5), "echo")
        .await
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "hello");
}

#[tokio::test]
async fn run_with_timeout_elapsed_reports_timeout() {
    let mut cmd = Command::new("sleep");
    cmd.arg("10");
    let result = run_with_timeout(cmd, Duration::from_millis(100), "test sleep").await;
    assert!(matches!(result, Err(ProcessError::Timeout { .. })));
}

#[tokio::test]
async fn run_with_timeout_missing_binary_is_io_error() {
    let cmd = Command::new("/nonexistent/binary");
    let result = run_with_timeout(cmd, Duration::from_secs(5), "nonexistent").await;
    assert!(matches!(result, Err(ProcessError::Io { .. })));
}

#[tokio::test]
async fn process_runner_streams_lines_then_eof() {
    let mut cmd = Command::new("printf");
    cmd.arg("a\\nb\\n");
    let mut runner = ProcessRunner::spawn(cmd, "printf").unwrap();

    let first = runner.read_line(Duration::from_secs(5)).await.unwrap();
    assert!(matches!(first, LineEvent::Line(ref s) if s == "a"));

    let second = runner.read_line(Duration::from_secs(5)).await.unwrap();
    assert!(matches!(second, LineEvent::Line(ref s) if s == "b"));

    let third = runner.read_line(Duration::from_secs(5)).await.unwrap();
    assert!(matches!(third, LineEvent::Eof));

    let exit_code = runner.wait().await.unwrap();
    assert_eq!(exit_code, 0);
}

#[tokio::test]
async fn zero_timeout_means_block_indefinitely() {
    let mut cmd = Command::new("printf");
    cmd.arg("line\\n");
    let mut runner = ProcessRunner::spawn(cmd, "printf").unwrap();

    let event = runner.read_line(Duration::from_secs(0)).await.unwrap();
    assert!(matches!(event, LineEvent::Line(ref s) if s == "line"));
}

#[tokio::test]
async fn process_runner_read_line_times_out_on_idle_child() {
    let mut cmd = Command::new("sleep");
    cmd.arg("10");
    let mut runner = ProcessRunner::spawn(cmd, "sleep").unwrap();

    let event = runner
        .read_line(Duration::from_millis(50))
        .await
        .unwrap();
    assert!(matches!(event, LineEvent::Timeout));

    runner.kill().await.unwrap();
}

#[tokio::test]
async fn a_partial_line_split_by_a_timeout_is_not_lost() {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg("printf 'REA'; sleep 0.3; printf 'DY_FOR_REVIEW\\n'");
    let mut runner = ProcessRunner::spawn(cmd, "sentinel split across idle").unwrap();

    let first = runner.read_line(Duration::from_millis(50)).await.unwrap();
    assert!(matches!(first, LineEvent::Timeout));

    let second = runner.read_line(Duration::from_secs(5)).await.unwrap();
    assert!(matches!(second, LineEvent::Line(ref s) if s == "READY_FOR_REVIEW"));

    let exit_code = runner.wait().await.unwrap();
    assert_eq!(exit_code, 0);
}
