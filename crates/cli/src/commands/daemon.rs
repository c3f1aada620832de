// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `onsite daemon` - Daemon management

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::client::{self, find_roster_file, ClientError, DaemonClient};

#[derive(Args)]
pub struct DaemonArgs {
    #[command(subcommand)]
    pub command: DaemonCommand,
}

#[derive(Subcommand)]
pub enum DaemonCommand {
    /// Start the daemon for the roster, if not already running
    Start,
    /// Stop the daemon (graceful, then forceful)
    Stop,
    /// Show daemon counters
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn daemon(args: DaemonArgs, roster_flag: Option<PathBuf>) -> Result<()> {
    let roster_path = roster_flag.map_or_else(find_roster_file, Ok)?;

    match args.command {
        DaemonCommand::Start => {
            let client = DaemonClient::connect_or_start(roster_path).await?;
            let version = client.hello().await?;
            println!("Daemon running (v{})", version);
        }

        DaemonCommand::Stop => {
            if client::daemon_stop(&roster_path).await? {
                println!("Daemon stopped");
            } else {
                println!("Daemon was not running");
            }
        }

        DaemonCommand::Status { json } => match DaemonClient::connect(roster_path) {
            Ok(client) => {
                let (uptime_secs, sessions_tracked, open_shifts) = client.daemon_status().await?;
                if json {
                    println!(
                        "{}",
                        serde_json::json!({
                            "running": true,
                            "uptime_secs": uptime_secs,
                            "sessions_tracked": sessions_tracked,
                            "open_shifts": open_shifts,
                        })
                    );
                } else {
                    println!("Daemon running (uptime {}s)", uptime_secs);
                    println!("  sessions tracked: {}", sessions_tracked);
                    println!("  open shifts:      {}", open_shifts);
                }
            }
            Err(ClientError::DaemonNotRunning) => {
                if json {
                    println!("{}", serde_json::json!({ "running": false }));
                } else {
                    println!("Daemon not running");
                }
            }
            Err(e) => return Err(e.into()),
        },
    }

    Ok(())
}
