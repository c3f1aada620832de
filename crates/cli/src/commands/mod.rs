// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod breaks;
pub mod clock_in;
pub mod clock_out;
pub mod completed;
pub mod daemon;
pub mod ping;
pub mod roster;
pub mod status;
