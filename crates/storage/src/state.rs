// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Attendance state rebuilt from WAL replay

use chrono::NaiveDate;
use onsite_core::{
    GeofenceVerdict, OpenSegment, Operation, Session, SessionKey, WorkerId,
};
use std::collections::HashMap;

/// Every session the daemon knows about, keyed by worker and day
///
/// Built by replaying the WAL at startup and kept current by applying each
/// operation right after it is appended. Apply never fails: an operation
/// that does not fit the current state (a break for a worker with no open
/// shift, say) is dropped, so a log written by a newer build still replays.
#[derive(Debug, Default)]
pub struct AttendanceState {
    pub sessions: HashMap<SessionKey, Session>,
}

impl AttendanceState {
    /// Get one worker's session for a given day
    pub fn session(&self, key: &SessionKey) -> Option<&Session> {
        self.sessions.get(key)
    }

    /// Number of sessions with a shift currently open
    pub fn open_shift_count(&self) -> usize {
        self.sessions
            .values()
            .filter(|session| session.open_segment().is_some())
            .count()
    }

    /// Total sessions tracked, open or finished
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Apply an operation to the in-memory state
    pub fn apply(&mut self, op: &Operation) {
        match op {
            Operation::SegmentOpened {
                worker,
                date,
                segment_id,
                site,
                at,
                location,
                within_geofence,
                self_declared,
                distance_m,
            } => {
                let session = self
                    .sessions
                    .entry(op.session_key())
                    .or_insert_with(|| Session::new(worker.clone(), *date));
                let verdict = GeofenceVerdict {
                    within_geofence: *within_geofence,
                    self_declared: *self_declared,
                    distance_m: *distance_m,
                };
                let segment =
                    OpenSegment::new(segment_id.clone(), site.clone(), *at, *location, verdict);
                let _ = session.start_shift(segment);
            }
            Operation::BreakStarted {
                worker,
                date,
                at,
                location,
            } => {
                if let Some(open) = self.open_segment_mut(worker, *date) {
                    let _ = open.start_break(*at, *location);
                }
            }
            Operation::BreakEnded { worker, date, at } => {
                if let Some(open) = self.open_segment_mut(worker, *date) {
                    let _ = open.end_break(*at);
                }
            }
            Operation::PingSeen { worker, date, at } => {
                if let Some(open) = self.open_segment_mut(worker, *date) {
                    open.record_ping(*at);
                }
            }
            Operation::PauseOpened {
                worker,
                date,
                at,
                distance_m,
                location,
            } => {
                if let Some(open) = self.open_segment_mut(worker, *date) {
                    // Never stack pauses, even replaying a damaged log
                    if !open.has_open_pause() {
                        open.pauses.open(*at, *distance_m, *location);
                    }
                }
            }
            Operation::PauseClosed { worker, date, at } => {
                if let Some(open) = self.open_segment_mut(worker, *date) {
                    open.pauses.close(*at);
                }
            }
            Operation::SegmentClosed {
                at,
                location,
                cause,
                overtime_minutes,
                ..
            } => {
                if let Some(session) = self.sessions.get_mut(&op.session_key()) {
                    let _ = session.close_shift(*at, *location, *cause, *overtime_minutes);
                }
            }
            Operation::OvertimeApproved {
                segment_id,
                approved_by,
                at,
                ..
            } => {
                if let Some(session) = self.sessions.get_mut(&op.session_key()) {
                    if let Some(segment) = session
                        .closed
                        .iter_mut()
                        .find(|segment| segment.id == *segment_id)
                    {
                        segment.approve_overtime(approved_by.clone(), *at);
                    }
                }
            }
        }
    }

    fn open_segment_mut(&mut self, worker: &WorkerId, date: NaiveDate) -> Option<&mut OpenSegment> {
        self.sessions
            .get_mut(&SessionKey {
                worker: worker.clone(),
                date,
            })
            .and_then(Session::open_segment_mut)
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
