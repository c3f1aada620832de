// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `onsite clock-in` - Open a work segment

use clap::Args;

#[derive(Args)]
pub struct ClockInArgs {
    /// Site to clock in at (defaults to the worker's assigned site)
    #[arg(long)]
    pub site: Option<String>,

    /// Latitude of the device fix
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude of the device fix
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Claim presence without a GPS fix (flagged for review)
    #[arg(long)]
    pub self_declared: bool,
}
