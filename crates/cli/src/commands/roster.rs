// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `onsite roster` - Roster file tooling

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::client::find_roster_file;

#[derive(Args)]
pub struct RosterArgs {
    #[command(subcommand)]
    pub command: RosterCommand,
}

#[derive(Subcommand)]
pub enum RosterCommand {
    /// Parse and validate a roster file without starting the daemon
    Check {
        /// Roster path (defaults to --roster, ONSITE_ROSTER, or the nearest roster.toml)
        path: Option<PathBuf>,
    },
}

pub fn check(args: RosterArgs, roster_flag: Option<PathBuf>) -> Result<()> {
    match args.command {
        RosterCommand::Check { path } => {
            let path = match path.or(roster_flag) {
                Some(path) => path,
                None => find_roster_file()?,
            };

            let roster = onsite_roster::load_roster(&path)?;

            println!("Roster OK: {}", roster.org.name);
            println!("  roles:   {}", roster.roles.len());
            println!("  sites:   {}", roster.sites.len());
            println!(
                "  workers: {} ({} synthetic)",
                roster.workers.len(),
                roster.synthetic_workers().count()
            );

            Ok(())
        }
    }
}
