// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `onsite clock-out` - Close the open segment

use clap::Args;

#[derive(Args)]
pub struct ClockOutArgs {
    /// Latitude of the device fix
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude of the device fix
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,
}
