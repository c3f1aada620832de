// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `onsite status` - Point-in-time view of the worker's day

use clap::Args;

#[derive(Args)]
pub struct StatusArgs {
    /// Print the raw snapshot as JSON
    #[arg(long)]
    pub json: bool,
}
