// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `noface` - Command Surface client for the noface agent orchestrator.

mod client;
mod daemon_process;
mod output;

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use noface_daemon::protocol::{Request, Response};

use client::DaemonClient;

#[derive(Parser)]
#[command(name = "noface", version, about = "Command Surface client for the noface agent orchestrator")]
struct Cli {
    /// Project root to talk to (defaults to the current directory)
    #[arg(short = 'C', long = "directory", global = true, value_name = "DIR")]
    directory: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the daemon's current counters and backlog size
    Status,
    /// Pause dispatch after the in-flight batch drains
    Pause,
    /// Resume dispatch
    Resume,
    /// Run exactly one more iteration, then pause
    Step,
    /// Cancel every in-flight worker and pause
    Interrupt,
    /// File a new issue against the tracker
    FileIssue {
        title: String,
        #[arg(long)]
        body: Option<String>,
        #[arg(long = "label")]
        labels: Vec<String>,
    },
    /// Show one issue's manifest, status, and attempt history
    InspectIssue { id: String },
    /// Append a comment to an issue
    AddComment { id: String, author: String, body: String },
    /// Overwrite fields on an issue's tracked content
    UpdateIssueContent {
        id: String,
        /// `key=value` pairs, repeatable
        #[arg(long = "set", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) => Ok((key.to_string(), value.to_string())),
        None => Err(format!("expected key=value, got {raw:?}")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let project_root = match cli.directory {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let request = match cli.command {
        Commands::Status => Request::Status,
        Commands::Pause => Request::Pause,
        Commands::Resume => Request::Resume,
        Commands::Step => Request::Step,
        Commands::Interrupt => Request::Interrupt,
        Commands::FileIssue { title, body, labels } => Request::FileIssue { title, body, labels },
        Commands::InspectIssue { id } => Request::InspectIssue { id },
        Commands::AddComment { id, author, body } => Request::AddComment { id, author, body },
        Commands::UpdateIssueContent { id, fields } => Request::UpdateIssueContent {
            id,
            fields: fields.into_iter().collect::<BTreeMap<_, _>>(),
        },
    };

    // Read-only status queries don't warrant starting a daemon that isn't
    // already running; every other verb needs one to act on.
    let client = match request {
        Request::Status | Request::InspectIssue { .. } => DaemonClient::connect(&project_root).await?,
        _ => DaemonClient::connect_or_start(&project_root).await?,
    };

    let response = client.send(&request).await?;
    match response {
        Response::Error { kind, message } => bail!("{kind}: {message}"),
        other => {
            output::print_response(&other);
            Ok(())
        }
    }
}
