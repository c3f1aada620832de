// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! onsite-core: Core library for the onsite attendance engine
//!
//! This crate provides:
//! - Pure state machines for work sessions, segments, and geofence pauses
//! - Schedule-window and overtime rules
//! - Great-circle distance math for geofence evaluation
//! - Operations for the write-ahead log

pub mod clock;
pub mod id;

pub mod geo;
pub mod schedule;
pub mod site;
pub mod worker;

// State machines (order matters for dependencies)
pub mod pause;
pub mod segment;
pub mod session;
pub mod status;
pub mod ops;

// Re-exports
pub use clock::{Clock, FakeClock, SystemClock};
pub use geo::{distance_meters, GeoError, GeoPoint};
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use ops::Operation;
pub use pause::{Pause, PauseLedger};
pub use schedule::{can_start_shift, ScheduleViolation, WorkSchedule, CLOCK_IN_GRACE_MINUTES};
pub use segment::{
    BreakState, CloseCause, ClosedSegment, GeofenceVerdict, HoursBreakdown, OpenSegment,
    OvertimeApproval, PingAction, SegmentError, SegmentId, GPS_LOSS_SECONDS,
};
pub use session::{Session, SessionError, SessionKey, ShiftState};
pub use site::{Site, SiteId};
pub use status::{session_status, SessionStatus};
pub use worker::{Worker, WorkerId};
