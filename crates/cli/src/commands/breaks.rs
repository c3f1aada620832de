// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `onsite break` - Break management

use clap::{Args, Subcommand};

#[derive(Args)]
pub struct BreakArgs {
    #[command(subcommand)]
    pub command: BreakCommand,
}

#[derive(Subcommand)]
pub enum BreakCommand {
    /// Start the day's break
    Start {
        /// Latitude where the break starts
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude where the break starts
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },
    /// End the running break
    End,
}
