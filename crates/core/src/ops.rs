// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operations for the write-ahead log
//!
//! Every state change is one `Operation`, appended to the WAL before it is
//! applied to the materialized state. Operations carry everything replay
//! needs — geofence verdicts and overtime minutes are resolved by the engine
//! at decision time, never re-derived during recovery. Break, ping, and
//! pause operations target the day's open segment; there is at most one.

use crate::geo::GeoPoint;
use crate::segment::{CloseCause, SegmentId};
use crate::site::SiteId;
use crate::worker::WorkerId;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Operations that can be persisted to the WAL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    /// Clock-in: lazily creates the (worker, date) session if needed and
    /// opens a segment
    SegmentOpened {
        worker: WorkerId,
        date: NaiveDate,
        segment_id: SegmentId,
        site: SiteId,
        at: NaiveDateTime,
        location: Option<GeoPoint>,
        within_geofence: bool,
        self_declared: bool,
        distance_m: Option<f64>,
    },

    /// Start the segment's single break
    BreakStarted {
        worker: WorkerId,
        date: NaiveDate,
        at: NaiveDateTime,
        location: GeoPoint,
    },

    /// End the open break
    BreakEnded {
        worker: WorkerId,
        date: NaiveDate,
        at: NaiveDateTime,
    },

    /// A location ping arrived; refreshes GPS-loss tracking
    PingSeen {
        worker: WorkerId,
        date: NaiveDate,
        at: NaiveDateTime,
    },

    /// Worker detected outside the geofence
    PauseOpened {
        worker: WorkerId,
        date: NaiveDate,
        at: NaiveDateTime,
        distance_m: f64,
        location: GeoPoint,
    },

    /// Worker back inside the geofence
    PauseClosed {
        worker: WorkerId,
        date: NaiveDate,
        at: NaiveDateTime,
    },

    /// Clock-out or deadline force-close
    SegmentClosed {
        worker: WorkerId,
        date: NaiveDate,
        at: NaiveDateTime,
        location: Option<GeoPoint>,
        cause: CloseCause,
        overtime_minutes: i64,
    },

    /// External reviewer signed off on a closed segment's overtime
    OvertimeApproved {
        worker: WorkerId,
        date: NaiveDate,
        segment_id: SegmentId,
        approved_by: String,
        at: NaiveDateTime,
    },
}

impl Operation {
    /// The session this operation belongs to
    pub fn session_key(&self) -> crate::session::SessionKey {
        let (worker, date) = match self {
            Operation::SegmentOpened { worker, date, .. }
            | Operation::BreakStarted { worker, date, .. }
            | Operation::BreakEnded { worker, date, .. }
            | Operation::PingSeen { worker, date, .. }
            | Operation::PauseOpened { worker, date, .. }
            | Operation::PauseClosed { worker, date, .. }
            | Operation::SegmentClosed { worker, date, .. }
            | Operation::OvertimeApproved { worker, date, .. } => (worker.clone(), *date),
        };
        crate::session::SessionKey { worker, date }
    }
}

#[cfg(test)]
#[path = "ops_tests.rs"]
mod tests;
