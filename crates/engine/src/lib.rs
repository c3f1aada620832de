// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Work-session accounting engine

mod engine;
mod error;
mod outcome;
mod seed;

pub use engine::Engine;
pub use error::{EngineError, ErrorKind};
pub use outcome::{
    BreakEndedOutcome, BreakStartedOutcome, ClockInOutcome, ClockOutSummary, CompletedToday,
    PingOutcome, PingStatus, ScheduleInfo, StatusSnapshot,
};
pub use seed::{seed_synthetic_workers, DailyTrigger};
