// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plain-text rendering of daemon responses.

use noface_daemon::protocol::Response;

pub fn print_response(response: &Response) {
    match response {
        Response::Status(summary) => {
            println!("iterations:    {}", summary.total_iterations);
            println!("completed:     {}", summary.successful_completions);
            println!("failed:        {}", summary.failed_attempts);
            println!("workers:       {}", summary.num_workers);
            println!("pending:       {}", summary.pending_issues);
            println!("in flight:     {}", summary.in_flight_issues);
        }
        Response::Ack => println!("ok"),
        Response::IssueCreated { id } => println!("created {id}"),
        Response::Issue(value) => {
            match serde_json::to_string_pretty(value) {
                Ok(rendered) => println!("{rendered}"),
                Err(_) => println!("{value}"),
            }
        }
        Response::Error { kind, message } => println!("error ({kind}): {message}"),
    }
}
