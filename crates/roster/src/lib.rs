// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Roster parsing: org settings, roles, sites, and workers from TOML

mod parser;
mod types;

pub use parser::{load_roster, parse_roster, ParseError};
pub use types::{
    OrgSettings, Role, Roster, WorkerEntry, DEFAULT_GEOFENCE_RADIUS_M,
    DEFAULT_MAX_OVERTIME_MINUTES, DEFAULT_SEED_HOUR,
};
