// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine operations
//!
//! Every operation validates against current state, appends to the WAL, and
//! only then applies to the in-memory state, all under the state mutex. Site
//! lookups go through the directory before the lock is taken; nothing awaits
//! while a lock is held. A failed WAL append leaves state untouched.

use crate::error::EngineError;
use crate::outcome::{
    BreakEndedOutcome, BreakStartedOutcome, ClockInOutcome, ClockOutSummary, CompletedToday,
    PingOutcome, PingStatus, ScheduleInfo, StatusSnapshot,
};
use onsite_adapters::SiteDirectory;
use onsite_core::{
    can_start_shift, distance_meters, session_status, BreakState, Clock, CloseCause, GeoPoint,
    GeofenceVerdict, IdGen, Operation, PingAction, SegmentError, Session, SessionError,
    SessionKey, SiteId, Worker,
};
use onsite_storage::{AttendanceState, Wal};
use std::sync::{Arc, Mutex, MutexGuard};

/// Work-session accounting engine
///
/// Generic over the site directory, the clock, and the id generator so tests
/// can pin time and ids while the daemon runs the real ones.
pub struct Engine<D, C, I> {
    directory: D,
    clock: C,
    ids: I,
    state: Arc<Mutex<AttendanceState>>,
    wal: Arc<Mutex<Wal>>,
}

impl<D, C, I> Engine<D, C, I>
where
    D: SiteDirectory,
    C: Clock,
    I: IdGen,
{
    pub fn new(
        directory: D,
        clock: C,
        ids: I,
        state: Arc<Mutex<AttendanceState>>,
        wal: Arc<Mutex<Wal>>,
    ) -> Self {
        Self {
            directory,
            clock,
            ids,
            state,
            wal,
        }
    }

    /// Open a segment for the worker's day
    ///
    /// Out-of-radius coordinates are accepted but recorded as self-declared
    /// with `within_geofence = false`; the schedule window only gates the
    /// first segment of the day.
    pub async fn clock_in(
        &self,
        worker: &Worker,
        site: Option<SiteId>,
        location: Option<(f64, f64)>,
        self_declared: bool,
    ) -> Result<ClockInOutcome, EngineError> {
        let location = parse_location(location)?;
        if location.is_none() && !self_declared {
            return Err(EngineError::LocationRequired);
        }
        let site_id = site
            .or_else(|| worker.default_site.clone())
            .ok_or(EngineError::SiteRequired)?;
        let site = self.directory.site(&site_id).await?;

        let now = self.clock.now();
        let date = now.date();
        let key = SessionKey {
            worker: worker.id.clone(),
            date,
        };

        let mut state = self.lock_state();
        if state
            .session(&key)
            .is_some_and(|s| s.open_segment().is_some())
        {
            return Err(SessionError::ShiftAlreadyOpen.into());
        }
        let resumed = state.session(&key).is_some_and(Session::has_segments);
        can_start_shift(now, site.schedule.as_ref(), resumed)?;

        let verdict = GeofenceVerdict::evaluate(location, self_declared, &site);
        let segment_id = self.ids.segment_id();
        self.persist(
            &mut state,
            Operation::SegmentOpened {
                worker: worker.id.clone(),
                date,
                segment_id: segment_id.clone(),
                site: site.id.clone(),
                at: now,
                location,
                within_geofence: verdict.within_geofence,
                self_declared: verdict.self_declared,
                distance_m: verdict.distance_m,
            },
        )?;

        tracing::info!(
            worker = %worker.id,
            site = %site.id,
            within_geofence = verdict.within_geofence,
            self_declared = verdict.self_declared,
            resumed,
            "clocked in"
        );

        Ok(ClockInOutcome {
            worker: worker.id.clone(),
            site: site.id.clone(),
            segment_id,
            at: now,
            within_geofence: verdict.within_geofence,
            self_declared: verdict.self_declared,
            distance_m: verdict.distance_m,
            resumed,
            schedule: site.schedule.map(ScheduleInfo::from),
        })
    }

    /// Close the open segment and freeze its hours
    ///
    /// Overtime past the site allowance is reported, never blocked.
    pub async fn clock_out(
        &self,
        worker: &Worker,
        location: Option<(f64, f64)>,
    ) -> Result<ClockOutSummary, EngineError> {
        let location = parse_location(location)?;
        let now = self.clock.now();
        let date = now.date();
        let key = SessionKey {
            worker: worker.id.clone(),
            date,
        };

        let site_id = {
            let state = self.lock_state();
            state
                .session(&key)
                .and_then(Session::open_segment)
                .map(|open| open.site.clone())
                .ok_or(SessionError::NoOpenShift)?
        };

        // A site that vanished from the roster must not block clock-out
        let schedule = match self.directory.site(&site_id).await {
            Ok(site) => site.schedule,
            Err(e) => {
                tracing::warn!(site = %site_id, error = %e, "site unknown at clock-out");
                None
            }
        };
        let overtime_minutes = schedule.as_ref().map_or(0, |s| s.overtime_minutes(now));
        let exceeded = schedule
            .as_ref()
            .is_some_and(|s| overtime_minutes > s.max_overtime_minutes);

        let mut state = self.lock_state();
        if state
            .session(&key)
            .and_then(Session::open_segment)
            .is_none()
        {
            return Err(SessionError::NoOpenShift.into());
        }
        self.persist(
            &mut state,
            Operation::SegmentClosed {
                worker: worker.id.clone(),
                date,
                at: now,
                location,
                cause: CloseCause::Worker,
                overtime_minutes,
            },
        )?;

        let session = state.session(&key).ok_or(SessionError::NoOpenShift)?;
        let closed = session.closed.last().ok_or(SessionError::NoOpenShift)?;
        let summary = ClockOutSummary {
            worker: worker.id.clone(),
            site: closed.site.clone(),
            checked_in_at: closed.checked_in_at,
            checked_out_at: closed.checked_out_at,
            segment_hours: closed.hours(),
            day_hours: session.total_hours(now),
            overtime_minutes,
            overtime_allowance_exceeded: exceeded,
        };

        if exceeded {
            tracing::warn!(
                worker = %worker.id,
                overtime_minutes,
                "overtime past the site allowance"
            );
        }
        tracing::info!(
            worker = %worker.id,
            worked_hours = summary.segment_hours.worked_hours,
            overtime_minutes,
            "clocked out"
        );

        Ok(summary)
    }

    /// Start the shift's single break
    pub fn start_break(
        &self,
        worker: &Worker,
        lat: f64,
        lon: f64,
    ) -> Result<BreakStartedOutcome, EngineError> {
        let location = GeoPoint::new(lat, lon)?;
        let now = self.clock.now();
        let date = now.date();
        let key = SessionKey {
            worker: worker.id.clone(),
            date,
        };

        let mut state = self.lock_state();
        let open = state
            .session(&key)
            .and_then(Session::open_segment)
            .ok_or(SessionError::NoOpenShift)?;
        match open.break_state {
            BreakState::Open { .. } => return Err(SegmentError::BreakAlreadyOpen.into()),
            BreakState::Taken { .. } => return Err(SegmentError::BreakAlreadyTaken.into()),
            BreakState::NotTaken => {}
        }
        self.persist(
            &mut state,
            Operation::BreakStarted {
                worker: worker.id.clone(),
                date,
                at: now,
                location,
            },
        )?;

        tracing::info!(worker = %worker.id, "break started");
        Ok(BreakStartedOutcome {
            worker: worker.id.clone(),
            started_at: now,
        })
    }

    /// End the open break
    pub fn end_break(&self, worker: &Worker) -> Result<BreakEndedOutcome, EngineError> {
        let now = self.clock.now();
        let date = now.date();
        let key = SessionKey {
            worker: worker.id.clone(),
            date,
        };

        let mut state = self.lock_state();
        let open = state
            .session(&key)
            .and_then(Session::open_segment)
            .ok_or(SessionError::NoOpenShift)?;
        let started_at = match open.break_state {
            BreakState::Open { started_at, .. } => started_at,
            _ => return Err(SegmentError::NoOpenBreak.into()),
        };
        self.persist(
            &mut state,
            Operation::BreakEnded {
                worker: worker.id.clone(),
                date,
                at: now,
            },
        )?;

        let break_minutes = (now - started_at).num_seconds().max(0) as f64 / 60.0;
        tracing::info!(worker = %worker.id, break_minutes, "break ended");
        Ok(BreakEndedOutcome {
            worker: worker.id.clone(),
            started_at,
            ended_at: now,
            break_minutes,
        })
    }

    /// Process a location ping
    ///
    /// The liveness timestamp is the sole unconditional write; pause
    /// transitions run only for geofence-enforced roles against a surveyed
    /// site, per the current pause state and the ping's distance.
    pub async fn record_ping(
        &self,
        worker: &Worker,
        lat: f64,
        lon: f64,
    ) -> Result<PingOutcome, EngineError> {
        let ping = GeoPoint::new(lat, lon)?;
        let now = self.clock.now();
        let date = now.date();
        let key = SessionKey {
            worker: worker.id.clone(),
            date,
        };

        let site_id = {
            let mut state = self.lock_state();
            let Some(open) = state.session(&key).and_then(Session::open_segment) else {
                return Ok(PingOutcome::not_applicable());
            };
            let site_id = open.site.clone();
            self.persist(
                &mut state,
                Operation::PingSeen {
                    worker: worker.id.clone(),
                    date,
                    at: now,
                },
            )?;
            site_id
        };

        if !worker.geofence_enforced {
            return Ok(PingOutcome::not_applicable());
        }

        let site = match self.directory.site(&site_id).await {
            Ok(site) => site,
            Err(e) => {
                tracing::warn!(site = %site_id, error = %e, "site unknown for ping");
                return Ok(PingOutcome::not_applicable());
            }
        };
        let Some(site_location) = site.location else {
            return Ok(PingOutcome::not_applicable());
        };
        let distance = distance_meters(ping, site_location);
        let within = distance <= site.geofence_radius_m;

        let mut state = self.lock_state();
        let Some(open) = state.session(&key).and_then(Session::open_segment) else {
            return Ok(PingOutcome::not_applicable());
        };

        match open.ping_action(within) {
            PingAction::OpenPause => {
                self.persist(
                    &mut state,
                    Operation::PauseOpened {
                        worker: worker.id.clone(),
                        date,
                        at: now,
                        distance_m: distance,
                        location: ping,
                    },
                )?;
                tracing::info!(worker = %worker.id, distance_m = distance, "left the geofence");
                Ok(PingOutcome {
                    status: PingStatus::Paused,
                    status_changed: true,
                    distance_m: Some(distance),
                    pause_duration_seconds: None,
                })
            }
            PingAction::ClosePause => {
                let duration = open
                    .pauses
                    .open_pause()
                    .map(|p| (now - p.started_at).num_seconds().max(0) as f64);
                self.persist(
                    &mut state,
                    Operation::PauseClosed {
                        worker: worker.id.clone(),
                        date,
                        at: now,
                    },
                )?;
                tracing::info!(worker = %worker.id, distance_m = distance, "back inside the geofence");
                Ok(PingOutcome {
                    status: PingStatus::Resumed,
                    status_changed: true,
                    distance_m: Some(distance),
                    pause_duration_seconds: duration,
                })
            }
            PingAction::StillActive => Ok(PingOutcome {
                status: PingStatus::Active,
                status_changed: false,
                distance_m: Some(distance),
                pause_duration_seconds: None,
            }),
            PingAction::StillPaused => Ok(PingOutcome {
                status: PingStatus::Paused,
                status_changed: false,
                distance_m: Some(distance),
                pause_duration_seconds: None,
            }),
        }
    }

    /// Current status, with the overtime deadline enforced lazily
    ///
    /// When the open segment's site defines a schedule and `now` is past
    /// `work_end + max_overtime`, the segment is force-closed as of that
    /// deadline instant before the status is derived; the call then reports
    /// `no_session`, as do all later reads that day.
    pub async fn active_status(&self, worker: &Worker) -> Result<StatusSnapshot, EngineError> {
        let now = self.clock.now();
        let date = now.date();
        let key = SessionKey {
            worker: worker.id.clone(),
            date,
        };

        let open_site = {
            let state = self.lock_state();
            state
                .session(&key)
                .and_then(Session::open_segment)
                .map(|open| open.site.clone())
        };

        if let Some(site_id) = open_site {
            let schedule = match self.directory.site(&site_id).await {
                Ok(site) => site.schedule,
                Err(e) => {
                    tracing::warn!(site = %site_id, error = %e, "site unknown for status");
                    None
                }
            };
            if let Some(schedule) = schedule {
                let deadline = schedule.deadline(date);
                if now > deadline {
                    let mut state = self.lock_state();
                    // Re-check under the lock; polls race and closing twice
                    // must stay a no-op
                    if state
                        .session(&key)
                        .and_then(Session::open_segment)
                        .is_some()
                    {
                        self.persist(
                            &mut state,
                            Operation::SegmentClosed {
                                worker: worker.id.clone(),
                                date,
                                at: deadline,
                                location: None,
                                cause: CloseCause::Deadline,
                                overtime_minutes: schedule.max_overtime_minutes,
                            },
                        )?;
                        tracing::info!(
                            worker = %worker.id,
                            %deadline,
                            "force-closed open segment at the overtime deadline"
                        );
                    }
                }
            }
        }

        let state = self.lock_state();
        let session = state.session(&key);
        let open = session.and_then(Session::open_segment);
        Ok(StatusSnapshot {
            worker: worker.id.clone(),
            date,
            status: session_status(session, now),
            site: open.map(|o| o.site.clone()),
            checked_in_at: open.map(|o| o.checked_in_at),
            last_ping_at: open.and_then(|o| o.last_ping_at),
            hours: session.map(|s| s.total_hours(now)).unwrap_or_default(),
            segments_completed: session.map_or(0, |s| s.closed.len()),
        })
    }

    /// Whether any segment was completed today
    pub fn completed_today(&self, worker: &Worker) -> CompletedToday {
        let now = self.clock.now();
        let date = now.date();
        let key = SessionKey {
            worker: worker.id.clone(),
            date,
        };

        let state = self.lock_state();
        let session = state.session(&key);
        CompletedToday {
            worker: worker.id.clone(),
            date,
            completed: session.is_some_and(Session::has_completed_segment),
            segments: session.map_or(0, |s| s.closed.len()),
        }
    }

    /// Whether the worker has any session today, open or closed
    pub fn has_session_today(&self, worker: &Worker) -> bool {
        let date = self.clock.now().date();
        let key = SessionKey {
            worker: worker.id.clone(),
            date,
        };
        self.lock_state()
            .session(&key)
            .is_some_and(Session::has_segments)
    }

    /// Counts for the daemon status report: (tracked sessions, open shifts)
    pub fn session_counts(&self) -> (usize, usize) {
        let state = self.lock_state();
        (state.session_count(), state.open_shift_count())
    }

    fn lock_state(&self) -> MutexGuard<'_, AttendanceState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Append to the WAL, then apply to state. Call with the state lock held
    /// so validate-persist-apply is one critical section.
    fn persist(&self, state: &mut AttendanceState, op: Operation) -> Result<(), EngineError> {
        {
            let mut wal = self.wal.lock().unwrap_or_else(|e| e.into_inner());
            wal.append(&op)?;
        }
        state.apply(&op);
        Ok(())
    }
}

fn parse_location(location: Option<(f64, f64)>) -> Result<Option<GeoPoint>, EngineError> {
    location
        .map(|(lat, lon)| GeoPoint::new(lat, lon))
        .transpose()
        .map_err(EngineError::from)
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
