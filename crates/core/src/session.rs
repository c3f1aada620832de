// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session state machine
//!
//! A session is all of one worker's segments for one organization-local
//! calendar day. `ShiftState` is a tagged union, so "at most one open
//! segment" holds by construction: the only place an open segment can live
//! is the single `Open` slot.
//!
//! Hour totals are always reported across the whole day — stored totals for
//! closed segments plus a live evaluation of the open one — because a worker
//! may leave and return several times in one day.

use crate::geo::GeoPoint;
use crate::segment::{CloseCause, ClosedSegment, HoursBreakdown, OpenSegment};
use crate::worker::WorkerId;
use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

/// Map key for the one-session-per-worker-per-day invariant
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub worker: WorkerId,
    pub date: NaiveDate,
}

/// Errors from session transitions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("a shift is already open; clock out before clocking in again")]
    ShiftAlreadyOpen,
    #[error("no open shift for today")]
    NoOpenShift,
}

/// Whether the day currently has an open segment
#[derive(Debug, Clone, PartialEq)]
pub enum ShiftState {
    Closed,
    Open(OpenSegment),
}

/// One worker's day of work
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub worker: WorkerId,
    pub date: NaiveDate,
    /// Chronological by check-in
    pub closed: Vec<ClosedSegment>,
    pub shift: ShiftState,
}

impl Session {
    pub fn new(worker: WorkerId, date: NaiveDate) -> Self {
        Self {
            worker,
            date,
            closed: Vec::new(),
            shift: ShiftState::Closed,
        }
    }

    pub fn open_segment(&self) -> Option<&OpenSegment> {
        match &self.shift {
            ShiftState::Open(segment) => Some(segment),
            ShiftState::Closed => None,
        }
    }

    pub fn open_segment_mut(&mut self) -> Option<&mut OpenSegment> {
        match &mut self.shift {
            ShiftState::Open(segment) => Some(segment),
            ShiftState::Closed => None,
        }
    }

    /// Any segment at all today, open or closed (schedule enforcement skips
    /// days that already started)
    pub fn has_segments(&self) -> bool {
        !self.closed.is_empty() || self.open_segment().is_some()
    }

    /// Any *closed* segment today (drives "continue your shift?" prompts)
    pub fn has_completed_segment(&self) -> bool {
        !self.closed.is_empty()
    }

    pub fn start_shift(&mut self, segment: OpenSegment) -> Result<(), SessionError> {
        match self.shift {
            ShiftState::Closed => {
                self.shift = ShiftState::Open(segment);
                Ok(())
            }
            ShiftState::Open(_) => Err(SessionError::ShiftAlreadyOpen),
        }
    }

    /// Close the open shift, moving it to the closed list
    pub fn close_shift(
        &mut self,
        at: NaiveDateTime,
        location: Option<GeoPoint>,
        cause: CloseCause,
        overtime_minutes: i64,
    ) -> Result<&ClosedSegment, SessionError> {
        match std::mem::replace(&mut self.shift, ShiftState::Closed) {
            ShiftState::Open(segment) => {
                self.closed
                    .push(segment.close(at, location, cause, overtime_minutes));
                self.closed.last().ok_or(SessionError::NoOpenShift)
            }
            ShiftState::Closed => Err(SessionError::NoOpenShift),
        }
    }

    /// Cross-segment totals: stored for closed segments, live for the open one
    pub fn total_hours(&self, now: NaiveDateTime) -> HoursBreakdown {
        let mut total = HoursBreakdown::default();
        for segment in &self.closed {
            total.add(&segment.hours());
        }
        if let Some(open) = self.open_segment() {
            total.add(&open.hours_as_of(now));
        }
        total
    }

    /// How the most recent segment ended, if any ended
    pub fn last_close_cause(&self) -> Option<CloseCause> {
        self.closed.last().map(|s| s.cause)
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
