// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Segment state machine
//!
//! A segment is one continuous on-site stay: check-in, at most one break,
//! geofence pauses, check-out. `OpenSegment` and `ClosedSegment` are separate
//! types; closing consumes the open segment, so "mutating a closed segment"
//! is unrepresentable (overtime approval is the one sanctioned exception).
//!
//! Hour accounting uses a single formula for live queries and final
//! accounting: `worked = max(0, elapsed − break − pause)`, evaluated at
//! "now" while open and at the check-out instant once closed.

use crate::geo::{distance_meters, GeoPoint};
use crate::pause::PauseLedger;
use crate::site::{Site, SiteId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Seconds without a ping after which an open segment counts as GPS-lost
pub const GPS_LOSS_SECONDS: i64 = 120;

/// Unique identifier for a segment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SegmentId(pub String);

impl std::fmt::Display for SegmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a segment was closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloseCause {
    /// The worker clocked out
    Worker,
    /// Force-closed at `work_end + max_overtime` by the auto-close policy
    Deadline,
}

/// Errors from segment transitions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SegmentError {
    #[error("a break is already running")]
    BreakAlreadyOpen,
    #[error("the break for this shift was already taken")]
    BreakAlreadyTaken,
    #[error("no break is currently open")]
    NoOpenBreak,
}

/// The single optional break of a segment
#[derive(Debug, Clone, PartialEq)]
pub enum BreakState {
    NotTaken,
    Open {
        started_at: NaiveDateTime,
        location: GeoPoint,
    },
    Taken {
        started_at: NaiveDateTime,
        ended_at: NaiveDateTime,
        location: GeoPoint,
    },
}

impl BreakState {
    /// (start, end) of the break; end is None while the break runs
    pub fn span(&self) -> Option<(NaiveDateTime, Option<NaiveDateTime>)> {
        match self {
            BreakState::NotTaken => None,
            BreakState::Open { started_at, .. } => Some((*started_at, None)),
            BreakState::Taken {
                started_at,
                ended_at,
                ..
            } => Some((*started_at, Some(*ended_at))),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, BreakState::Open { .. })
    }
}

/// Hour totals for one segment (or summed across a session)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HoursBreakdown {
    pub elapsed_hours: f64,
    pub break_hours: f64,
    pub pause_hours: f64,
    pub worked_hours: f64,
}

impl HoursBreakdown {
    pub fn add(&mut self, other: &HoursBreakdown) {
        self.elapsed_hours += other.elapsed_hours;
        self.break_hours += other.break_hours;
        self.pause_hours += other.pause_hours;
        self.worked_hours += other.worked_hours;
    }
}

/// Geofence outcome of a clock-in attempt.
///
/// `within_geofence` is true only when GPS was available, the worker was
/// inside the radius, and the attempt was not self-declared. An out-of-radius
/// attempt is accepted but downgraded to self-declared; nothing is blocked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeofenceVerdict {
    pub within_geofence: bool,
    pub self_declared: bool,
    pub distance_m: Option<f64>,
}

impl GeofenceVerdict {
    pub fn evaluate(location: Option<GeoPoint>, claimed_on_site: bool, site: &Site) -> Self {
        let Some(at) = location else {
            return Self {
                within_geofence: false,
                self_declared: true,
                distance_m: None,
            };
        };
        let Some(site_location) = site.location else {
            // GPS present but nothing to verify against
            return Self {
                within_geofence: false,
                self_declared: claimed_on_site,
                distance_m: None,
            };
        };
        let distance = distance_meters(at, site_location);
        let within = distance <= site.geofence_radius_m;
        Self {
            within_geofence: within && !claimed_on_site,
            self_declared: claimed_on_site || !within,
            distance_m: Some(distance),
        }
    }
}

/// What a location ping should do to the pause ledger, given the current
/// pause state and whether the worker is inside the radius. Purely a function
/// of current state — out-of-order pings are tolerated because transitions
/// are idempotent on state, never sequenced by ping order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingAction {
    /// Outside and not yet paused: open a pause
    OpenPause,
    /// Back inside with a pause open: close it
    ClosePause,
    /// Inside, no pause: nothing to do
    StillActive,
    /// Outside, already paused: nothing to do
    StillPaused,
}

/// One continuous on-site stay that has not been checked out
#[derive(Debug, Clone, PartialEq)]
pub struct OpenSegment {
    pub id: SegmentId,
    pub site: SiteId,
    pub checked_in_at: NaiveDateTime,
    pub check_in_location: Option<GeoPoint>,
    pub within_geofence: bool,
    pub self_declared: bool,
    pub distance_from_site_m: Option<f64>,
    pub break_state: BreakState,
    pub pauses: PauseLedger,
    /// Absent until the first ping; GPS-loss falls back to the check-in time
    pub last_ping_at: Option<NaiveDateTime>,
}

impl OpenSegment {
    pub fn new(
        id: SegmentId,
        site: SiteId,
        checked_in_at: NaiveDateTime,
        check_in_location: Option<GeoPoint>,
        verdict: GeofenceVerdict,
    ) -> Self {
        Self {
            id,
            site,
            checked_in_at,
            check_in_location,
            within_geofence: verdict.within_geofence,
            self_declared: verdict.self_declared,
            distance_from_site_m: verdict.distance_m,
            break_state: BreakState::NotTaken,
            pauses: PauseLedger::new(),
            last_ping_at: None,
        }
    }

    pub fn start_break(
        &mut self,
        now: NaiveDateTime,
        location: GeoPoint,
    ) -> Result<(), SegmentError> {
        match self.break_state {
            BreakState::NotTaken => {
                self.break_state = BreakState::Open {
                    started_at: now,
                    location,
                };
                Ok(())
            }
            BreakState::Open { .. } => Err(SegmentError::BreakAlreadyOpen),
            BreakState::Taken { .. } => Err(SegmentError::BreakAlreadyTaken),
        }
    }

    pub fn end_break(&mut self, now: NaiveDateTime) -> Result<(), SegmentError> {
        match self.break_state {
            BreakState::Open {
                started_at,
                location,
            } => {
                self.break_state = BreakState::Taken {
                    started_at,
                    ended_at: now,
                    location,
                };
                Ok(())
            }
            _ => Err(SegmentError::NoOpenBreak),
        }
    }

    /// The sole unconditional write of every ping
    pub fn record_ping(&mut self, now: NaiveDateTime) {
        self.last_ping_at = Some(now);
    }

    /// Decide the pause transition for a ping that resolved to
    /// `within_radius`; the caller persists and applies the action.
    pub fn ping_action(&self, within_radius: bool) -> PingAction {
        match (self.pauses.open_pause().is_some(), within_radius) {
            (false, false) => PingAction::OpenPause,
            (true, true) => PingAction::ClosePause,
            (false, true) => PingAction::StillActive,
            (true, false) => PingAction::StillPaused,
        }
    }

    pub fn has_open_break(&self) -> bool {
        self.break_state.is_open()
    }

    pub fn has_open_pause(&self) -> bool {
        self.pauses.open_pause().is_some()
    }

    /// No ping (or check-in) for more than `GPS_LOSS_SECONDS`
    pub fn is_gps_lost(&self, now: NaiveDateTime) -> bool {
        let reference = self.last_ping_at.unwrap_or(self.checked_in_at);
        (now - reference).num_seconds() > GPS_LOSS_SECONDS
    }

    pub fn hours_as_of(&self, as_of: NaiveDateTime) -> HoursBreakdown {
        breakdown(
            self.checked_in_at,
            as_of,
            self.break_state.span(),
            &self.pauses,
        )
    }

    /// Check out. In order: close an open break at `at`, force-close an open
    /// pause at `at`, stamp the check-out, freeze the final hour totals.
    /// `overtime_minutes` is computed by the caller from the site schedule.
    pub fn close(
        mut self,
        at: NaiveDateTime,
        location: Option<GeoPoint>,
        cause: CloseCause,
        overtime_minutes: i64,
    ) -> ClosedSegment {
        self.break_state = match self.break_state {
            BreakState::Open {
                started_at,
                location,
            } => BreakState::Taken {
                started_at,
                ended_at: at,
                location,
            },
            other => other,
        };
        self.pauses.close(at);
        let hours = breakdown(self.checked_in_at, at, self.break_state.span(), &self.pauses);
        ClosedSegment {
            id: self.id,
            site: self.site,
            checked_in_at: self.checked_in_at,
            check_in_location: self.check_in_location,
            within_geofence: self.within_geofence,
            self_declared: self.self_declared,
            distance_from_site_m: self.distance_from_site_m,
            break_state: self.break_state,
            pauses: self.pauses,
            last_ping_at: self.last_ping_at,
            checked_out_at: at,
            check_out_location: location,
            cause,
            overtime_minutes,
            hours,
            overtime_approval: None,
        }
    }
}

/// Later sign-off on overtime, recorded by an external reviewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OvertimeApproval {
    pub approved_by: String,
    pub approved_at: NaiveDateTime,
}

/// A checked-out segment. Immutable except for overtime approval.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedSegment {
    pub id: SegmentId,
    pub site: SiteId,
    pub checked_in_at: NaiveDateTime,
    pub check_in_location: Option<GeoPoint>,
    pub within_geofence: bool,
    pub self_declared: bool,
    pub distance_from_site_m: Option<f64>,
    pub break_state: BreakState,
    pub pauses: PauseLedger,
    pub last_ping_at: Option<NaiveDateTime>,
    pub checked_out_at: NaiveDateTime,
    pub check_out_location: Option<GeoPoint>,
    pub cause: CloseCause,
    pub overtime_minutes: i64,
    hours: HoursBreakdown,
    pub overtime_approval: Option<OvertimeApproval>,
}

impl ClosedSegment {
    /// The totals frozen at check-out
    pub fn hours(&self) -> HoursBreakdown {
        self.hours
    }

    /// Recompute the totals from the stored instants. Equal to `hours()` by
    /// construction; exists so the live and final formulas cannot drift.
    pub fn hours_as_of_close(&self) -> HoursBreakdown {
        breakdown(
            self.checked_in_at,
            self.checked_out_at,
            self.break_state.span(),
            &self.pauses,
        )
    }

    pub fn approve_overtime(&mut self, approved_by: String, approved_at: NaiveDateTime) {
        self.overtime_approval = Some(OvertimeApproval {
            approved_by,
            approved_at,
        });
    }
}

fn hours_between(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    (end - start).num_seconds() as f64 / 3600.0
}

fn breakdown(
    check_in: NaiveDateTime,
    as_of: NaiveDateTime,
    break_span: Option<(NaiveDateTime, Option<NaiveDateTime>)>,
    pauses: &PauseLedger,
) -> HoursBreakdown {
    let elapsed_hours = hours_between(check_in, as_of);
    let break_hours = match break_span {
        Some((start, end)) => hours_between(start, end.unwrap_or(as_of)),
        None => 0.0,
    };
    let pause_hours = pauses.cumulative_seconds(as_of) / 3600.0;
    HoursBreakdown {
        elapsed_hours,
        break_hours,
        pause_hours,
        worked_hours: (elapsed_hours - break_hours - pause_hours).max(0.0),
    }
}

#[cfg(test)]
#[path = "segment_tests.rs"]
mod tests;
