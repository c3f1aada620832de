// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Work-schedule window and overtime rules
//!
//! Schedule enforcement gates only the *start* of a day's work. A worker who
//! is already mid-shift may always continue; a long-running shift is never
//! retroactively blocked. The deadline for forgotten shifts is
//! `work_end + max_overtime_minutes` (see the engine's auto-close policy).

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minutes before `work_start` during which clock-in is already allowed
pub const CLOCK_IN_GRACE_MINUTES: i64 = 30;

/// A site's configured working window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkSchedule {
    pub work_start: NaiveTime,
    pub work_end: NaiveTime,
    pub max_overtime_minutes: i64,
}

impl WorkSchedule {
    /// Earliest wall-clock time a new shift may start
    pub fn earliest_clock_in(&self) -> NaiveTime {
        self.work_start
            .overflowing_sub_signed(Duration::minutes(CLOCK_IN_GRACE_MINUTES))
            .0
    }

    /// The instant past which an open shift on `date` is force-closed
    pub fn deadline(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.work_end) + Duration::minutes(self.max_overtime_minutes)
    }

    /// Whole minutes worked past `work_end`, zero when inside the window
    pub fn overtime_minutes(&self, check_out: NaiveDateTime) -> i64 {
        let end = check_out.date().and_time(self.work_end);
        (check_out - end).num_minutes().max(0)
    }
}

/// Rejection reasons for a clock-in outside the allowed window
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleViolation {
    #[error("clock-in opens at {earliest} (work starts at {work_start}, 30 min grace)")]
    TooEarly {
        earliest: NaiveTime,
        work_start: NaiveTime,
    },
    #[error("work ended at {work_end}; a new shift cannot start after schedule end")]
    TooLate { work_end: NaiveTime },
}

/// Whether a new segment may start now. Applies only when the session has no
/// prior segments today; continuation of an existing day is never gated.
pub fn can_start_shift(
    now: NaiveDateTime,
    schedule: Option<&WorkSchedule>,
    has_existing_segments: bool,
) -> Result<(), ScheduleViolation> {
    if has_existing_segments {
        return Ok(());
    }
    let Some(schedule) = schedule else {
        return Ok(());
    };
    let time = now.time();
    let earliest = schedule.earliest_clock_in();
    if time < earliest {
        return Err(ScheduleViolation::TooEarly {
            earliest,
            work_start: schedule.work_start,
        });
    }
    if time > schedule.work_end {
        return Err(ScheduleViolation::TooLate {
            work_end: schedule.work_end,
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
