// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Live status derivation
//!
//! Status is computed, never stored. While a segment is open the precedence
//! is break > pause > gps-loss > active (a worker on break who also drifted
//! out of the radius shows as on break). A day whose last segment was
//! force-closed by the deadline policy reports `no_session`; `finished` is
//! reserved for days the worker closed.

use crate::segment::CloseCause;
use crate::session::Session;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A worker's live status for one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    NoSession,
    Active,
    OnBreak,
    OutsideGeofence,
    GpsLost,
    Finished,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SessionStatus::NoSession => "no_session",
            SessionStatus::Active => "active",
            SessionStatus::OnBreak => "on_break",
            SessionStatus::OutsideGeofence => "outside_geofence",
            SessionStatus::GpsLost => "gps_lost",
            SessionStatus::Finished => "finished",
        };
        write!(f, "{s}")
    }
}

/// Derive the status of a (possibly missing) session as of `now`
pub fn session_status(session: Option<&Session>, now: NaiveDateTime) -> SessionStatus {
    let Some(session) = session else {
        return SessionStatus::NoSession;
    };
    if let Some(open) = session.open_segment() {
        if open.has_open_break() {
            return SessionStatus::OnBreak;
        }
        if open.has_open_pause() {
            return SessionStatus::OutsideGeofence;
        }
        if open.is_gps_lost(now) {
            return SessionStatus::GpsLost;
        }
        return SessionStatus::Active;
    }
    if !session.has_completed_segment() {
        return SessionStatus::NoSession;
    }
    match session.last_close_cause() {
        Some(CloseCause::Deadline) => SessionStatus::NoSession,
        _ => SessionStatus::Finished,
    }
}
