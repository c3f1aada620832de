// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::NaiveDateTime;
use onsite_core::{CloseCause, GeoPoint, SegmentId, SiteId};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

fn at(hour: u32, min: u32) -> NaiveDateTime {
    day().and_hms_opt(hour, min, 0).unwrap()
}

fn worker(name: &str) -> WorkerId {
    WorkerId(name.to_string())
}

fn key(name: &str) -> SessionKey {
    SessionKey {
        worker: worker(name),
        date: day(),
    }
}

fn here() -> GeoPoint {
    GeoPoint {
        lat: 44.4268,
        lon: 26.1025,
    }
}

fn opened(name: &str, segment: &str, hour: u32, min: u32) -> Operation {
    Operation::SegmentOpened {
        worker: worker(name),
        date: day(),
        segment_id: SegmentId(segment.to_string()),
        site: SiteId("yard-north".to_string()),
        at: at(hour, min),
        location: Some(here()),
        within_geofence: true,
        self_declared: false,
        distance_m: Some(12.0),
    }
}

fn closed(name: &str, hour: u32, min: u32) -> Operation {
    Operation::SegmentClosed {
        worker: worker(name),
        date: day(),
        at: at(hour, min),
        location: Some(here()),
        cause: CloseCause::Worker,
        overtime_minutes: 0,
    }
}

#[test]
fn apply_segment_opened_creates_session() {
    let mut state = AttendanceState::default();
    state.apply(&opened("maria", "seg-1", 7, 35));

    let session = state.session(&key("maria")).unwrap();
    assert!(session.open_segment().is_some());
    assert_eq!(state.open_shift_count(), 1);
    assert_eq!(state.session_count(), 1);
}

#[test]
fn apply_full_day_freezes_hours() {
    let mut state = AttendanceState::default();
    state.apply(&opened("maria", "seg-1", 7, 0));
    state.apply(&Operation::PauseOpened {
        worker: worker("maria"),
        date: day(),
        at: at(10, 0),
        distance_m: 150.0,
        location: here(),
    });
    state.apply(&Operation::PauseClosed {
        worker: worker("maria"),
        date: day(),
        at: at(10, 10),
    });
    state.apply(&Operation::BreakStarted {
        worker: worker("maria"),
        date: day(),
        at: at(12, 0),
        location: here(),
    });
    state.apply(&Operation::BreakEnded {
        worker: worker("maria"),
        date: day(),
        at: at(12, 30),
    });
    state.apply(&closed("maria", 15, 0));

    let session = state.session(&key("maria")).unwrap();
    assert!(session.open_segment().is_none());
    assert_eq!(session.closed.len(), 1);

    let hours = session.closed[0].hours();
    assert!((hours.elapsed_hours - 8.0).abs() < 1e-9);
    assert!((hours.break_hours - 0.5).abs() < 1e-9);
    assert!((hours.pause_hours - 1.0 / 6.0).abs() < 1e-9);
    assert!((hours.worked_hours - (8.0 - 0.5 - 1.0 / 6.0)).abs() < 1e-9);
}

#[test]
fn replay_rebuilds_open_shift_across_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("attendance.wal");

    // First run: clock in, wander off site, ping
    {
        let mut wal = crate::Wal::open(&path).unwrap();
        let mut state = AttendanceState::default();
        for op in [
            opened("maria", "seg-1", 7, 35),
            Operation::PauseOpened {
                worker: worker("maria"),
                date: day(),
                at: at(9, 0),
                distance_m: 180.0,
                location: here(),
            },
            Operation::PingSeen {
                worker: worker("maria"),
                date: day(),
                at: at(9, 0),
            },
        ] {
            wal.append(&op).unwrap();
            state.apply(&op);
        }
    }

    // Second run rebuilds the same picture from the log alone
    let mut state = AttendanceState::default();
    for op in crate::Wal::replay(&path).unwrap() {
        state.apply(&op);
    }

    let session = state.session(&key("maria")).unwrap();
    let open = session.open_segment().unwrap();
    assert!(open.has_open_pause());
    assert_eq!(open.last_ping_at, Some(at(9, 0)));
    assert_eq!(open.checked_in_at, at(7, 35));
}

#[test]
fn mismatched_operations_are_dropped() {
    let mut state = AttendanceState::default();

    // Break for a worker who never clocked in
    state.apply(&Operation::BreakStarted {
        worker: worker("ghost"),
        date: day(),
        at: at(9, 0),
        location: here(),
    });
    assert!(state.session(&key("ghost")).is_none());

    // Double open keeps the first segment
    state.apply(&opened("maria", "seg-1", 7, 0));
    state.apply(&opened("maria", "seg-2", 8, 0));
    let open = state
        .session(&key("maria"))
        .unwrap()
        .open_segment()
        .unwrap();
    assert_eq!(open.id, SegmentId("seg-1".to_string()));

    // Pauses never stack
    for _ in 0..2 {
        state.apply(&Operation::PauseOpened {
            worker: worker("maria"),
            date: day(),
            at: at(9, 0),
            distance_m: 150.0,
            location: here(),
        });
    }
    let open = state
        .session(&key("maria"))
        .unwrap()
        .open_segment()
        .unwrap();
    assert_eq!(open.pauses.len(), 1);
}

#[test]
fn overtime_approval_tags_the_closed_segment() {
    let mut state = AttendanceState::default();
    state.apply(&opened("maria", "seg-1", 7, 0));
    state.apply(&closed("maria", 17, 0));
    state.apply(&Operation::OvertimeApproved {
        worker: worker("maria"),
        date: day(),
        segment_id: SegmentId("seg-1".to_string()),
        approved_by: "foreman-ana".to_string(),
        at: at(17, 30),
    });

    let session = state.session(&key("maria")).unwrap();
    let approval = session.closed[0].overtime_approval.as_ref().unwrap();
    assert_eq!(approval.approved_by, "foreman-ana");
    assert_eq!(approval.approved_at, at(17, 30));
}
