// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `onsite completed-today` - Whether the worker already finished a shift

use clap::Args;

#[derive(Args)]
pub struct CompletedTodayArgs {
    /// Print the raw report as JSON
    #[arg(long)]
    pub json: bool,
}
