// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `noface-daemon`: background process owning one project's main loop.
//!
//! Not meant to be invoked directly — `noface` (the CLI) spawns and talks
//! to it over the project's Unix socket.

use std::path::PathBuf;

use noface_core::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let project_root = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or(std::env::current_dir()?);

    let config_path = project_root.join(".noface").join("config.toml");
    let config = Config::load(&config_path)?;

    tracing::info!(project = %config.project.name, "starting noface-daemon");
    noface_daemon::run(&project_root, config).await?;
    Ok(())
}
