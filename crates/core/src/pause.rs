// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Geofence-pause ledger
//!
//! One `Pause` is an interval during which the worker was detected outside
//! the site's geofence. Pauses are excluded from worked hours. At most one
//! pause is open at a time; that is enforced by the ping path, not
//! re-validated here.

use crate::geo::GeoPoint;
use chrono::NaiveDateTime;

/// One interval of "worker outside the allowed radius"
#[derive(Debug, Clone, PartialEq)]
pub struct Pause {
    pub started_at: NaiveDateTime,
    /// None while the worker is still outside
    pub ended_at: Option<NaiveDateTime>,
    /// Distance from the site when the pause was triggered
    pub distance_m: f64,
    /// Worker position when the pause was triggered
    pub location: GeoPoint,
}

impl Pause {
    fn seconds_as_of(&self, as_of: NaiveDateTime) -> f64 {
        let end = self.ended_at.unwrap_or(as_of);
        (end - self.started_at).num_seconds().max(0) as f64
    }
}

/// Ordered pause intervals belonging to one segment
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PauseLedger {
    pauses: Vec<Pause>,
}

impl PauseLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total paused seconds as of `as_of`; an open pause contributes up to
    /// `as_of`.
    pub fn cumulative_seconds(&self, as_of: NaiveDateTime) -> f64 {
        self.pauses.iter().map(|p| p.seconds_as_of(as_of)).sum()
    }

    /// The pause with no end, if any
    pub fn open_pause(&self) -> Option<&Pause> {
        self.pauses.iter().find(|p| p.ended_at.is_none())
    }

    pub fn open(&mut self, started_at: NaiveDateTime, distance_m: f64, location: GeoPoint) {
        self.pauses.push(Pause {
            started_at,
            ended_at: None,
            distance_m,
            location,
        });
    }

    /// Close the open pause, returning its duration in seconds. No-op-safe:
    /// segment check-out calls this unconditionally so no pause outlives its
    /// segment.
    pub fn close(&mut self, ended_at: NaiveDateTime) -> Option<f64> {
        let pause = self.pauses.iter_mut().find(|p| p.ended_at.is_none())?;
        pause.ended_at = Some(ended_at);
        Some((ended_at - pause.started_at).num_seconds().max(0) as f64)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pause> {
        self.pauses.iter()
    }

    pub fn len(&self) -> usize {
        self.pauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pauses.is_empty()
    }
}
