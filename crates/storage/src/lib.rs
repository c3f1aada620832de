// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Durable storage: an append-only WAL of attendance operations and the
//! in-memory state rebuilt from it

mod state;
mod wal;

pub use state::AttendanceState;
pub use wal::{Wal, WalError};
