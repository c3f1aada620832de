// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::{NaiveDate, NaiveDateTime};
use onsite_core::{GeoPoint, Operation, SegmentId, SiteId, WorkerId};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

fn at(hour: u32, min: u32) -> NaiveDateTime {
    day().and_hms_opt(hour, min, 0).unwrap()
}

fn opened(worker: &str) -> Operation {
    Operation::SegmentOpened {
        worker: WorkerId(worker.to_string()),
        date: day(),
        segment_id: SegmentId("seg-1".to_string()),
        site: SiteId("yard-north".to_string()),
        at: at(7, 35),
        location: Some(GeoPoint {
            lat: 44.4268,
            lon: 26.1025,
        }),
        within_geofence: true,
        self_declared: false,
        distance_m: Some(12.0),
    }
}

#[test]
fn wal_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("attendance.wal");

    // Write operations
    {
        let mut wal = Wal::open(&path).unwrap();
        wal.append(&opened("maria")).unwrap();
        wal.append(&Operation::PingSeen {
            worker: WorkerId("maria".to_string()),
            date: day(),
            at: at(7, 40),
        })
        .unwrap();
    }

    // Read back
    let ops = Wal::replay(&path).unwrap();
    assert_eq!(ops.len(), 2);
    assert!(matches!(ops[0], Operation::SegmentOpened { .. }));
    assert!(matches!(ops[1], Operation::PingSeen { .. }));
}

#[test]
fn wal_sequence_continues() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("attendance.wal");

    // First run
    {
        let mut wal = Wal::open(&path).unwrap();
        assert_eq!(wal.sequence(), 0);
        wal.append(&opened("maria")).unwrap();
        assert_eq!(wal.sequence(), 1);
    }

    // Second run resumes where the first left off
    {
        let wal = Wal::open(&path).unwrap();
        assert_eq!(wal.sequence(), 1);
    }
}

#[test]
fn wal_replay_nonexistent() {
    let path = Path::new("/nonexistent/path/attendance.wal");
    let ops = Wal::replay(path).unwrap();
    assert!(ops.is_empty());
}
