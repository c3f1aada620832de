// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `onsite ping` - Report a location fix for the open shift

use clap::Args;

#[derive(Args)]
pub struct PingArgs {
    /// Latitude of the device fix
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude of the device fix
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,
}
