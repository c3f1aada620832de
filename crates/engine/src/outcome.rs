// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Results returned to clients, serialized as-is over the protocol

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use onsite_core::{
    HoursBreakdown, SegmentId, SessionStatus, SiteId, WorkSchedule, WorkerId,
};
use serde::{Deserialize, Serialize};

/// Schedule window echoed back on clock-in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleInfo {
    pub work_start: NaiveTime,
    pub work_end: NaiveTime,
    pub max_overtime_minutes: i64,
}

impl From<WorkSchedule> for ScheduleInfo {
    fn from(schedule: WorkSchedule) -> Self {
        Self {
            work_start: schedule.work_start,
            work_end: schedule.work_end,
            max_overtime_minutes: schedule.max_overtime_minutes,
        }
    }
}

/// A successful clock-in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockInOutcome {
    pub worker: WorkerId,
    pub site: SiteId,
    pub segment_id: SegmentId,
    pub at: NaiveDateTime,
    pub within_geofence: bool,
    /// Set both on an explicit self-declared clock-in and on an
    /// out-of-radius one accepted for later review
    pub self_declared: bool,
    pub distance_m: Option<f64>,
    /// True when earlier segments exist today (leave-and-return)
    pub resumed: bool,
    pub schedule: Option<ScheduleInfo>,
}

/// A successful clock-out with the day's accounting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockOutSummary {
    pub worker: WorkerId,
    pub site: SiteId,
    pub checked_in_at: NaiveDateTime,
    pub checked_out_at: NaiveDateTime,
    /// Totals frozen for the segment just closed
    pub segment_hours: HoursBreakdown,
    /// Totals across every segment today
    pub day_hours: HoursBreakdown,
    pub overtime_minutes: i64,
    /// Overtime ran past the site allowance; the clock-out still succeeded
    pub overtime_allowance_exceeded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakStartedOutcome {
    pub worker: WorkerId,
    pub started_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakEndedOutcome {
    pub worker: WorkerId,
    pub started_at: NaiveDateTime,
    pub ended_at: NaiveDateTime,
    pub break_minutes: f64,
}

/// Geofence status reported for a location ping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PingStatus {
    /// Outside the radius with a pause open (newly or still)
    Paused,
    /// Back inside; the open pause was closed
    Resumed,
    /// Inside the radius, nothing to do
    Active,
    /// No open segment, role not enforced, or the site has no coordinates
    NotApplicable,
}

impl std::fmt::Display for PingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PingStatus::Paused => "paused",
            PingStatus::Resumed => "resumed",
            PingStatus::Active => "active",
            PingStatus::NotApplicable => "not_applicable",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingOutcome {
    pub status: PingStatus,
    pub status_changed: bool,
    pub distance_m: Option<f64>,
    /// Length of the pause that a return-to-site ping just closed
    pub pause_duration_seconds: Option<f64>,
}

impl PingOutcome {
    pub(crate) fn not_applicable() -> Self {
        Self {
            status: PingStatus::NotApplicable,
            status_changed: false,
            distance_m: None,
            pause_duration_seconds: None,
        }
    }
}

/// Point-in-time view of a worker's day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub worker: WorkerId,
    pub date: NaiveDate,
    pub status: SessionStatus,
    /// Open segment details; absent when nothing is open
    pub site: Option<SiteId>,
    pub checked_in_at: Option<NaiveDateTime>,
    pub last_ping_at: Option<NaiveDateTime>,
    /// Sum across all of today's segments, live for the open one
    pub hours: HoursBreakdown,
    pub segments_completed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedToday {
    pub worker: WorkerId,
    pub date: NaiveDate,
    pub completed: bool,
    pub segments: usize,
}
