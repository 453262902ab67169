// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Spawns the `noface-daemon` binary in the background.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

/// Starts `noface-daemon` for `project_root`, detached from the CLI's own
/// stdio so the daemon keeps running after the CLI invocation exits.
pub fn start_daemon_background(project_root: &Path) -> std::io::Result<Child> {
    let daemon_path = find_daemon_binary();
    Command::new(daemon_path)
        .arg(project_root)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
}

/// Resolves the `noface-daemon` binary path: an explicit override, a
/// sibling of the running CLI binary (the common installed layout), or a
/// bare name left for `PATH` lookup by [`Command::spawn`].
fn find_daemon_binary() -> PathBuf {
    if let Ok(path) = std::env::var("NOFACE_DAEMON_BIN") {
        return PathBuf::from(path);
    }

    if let Ok(current_exe) = std::env::current_exe() {
        if let Some(dir) = current_exe.parent() {
            let sibling = dir.join("noface-daemon");
            if sibling.is_file() {
                return sibling;
            }
        }
    }

    PathBuf::from("noface-daemon")
}
