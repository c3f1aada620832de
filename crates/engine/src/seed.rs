// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daily seeding of synthetic workers
//!
//! The daemon tick polls `DailyTrigger::fire_due()`; once per org-local day,
//! past the configured hour, every roster worker flagged synthetic is
//! clocked in at their default site through the ordinary clock-in path. A
//! missed fire (restart, laptop asleep) self-heals on the next tick that
//! same day.

use crate::engine::Engine;
use crate::error::EngineError;
use chrono::{NaiveDate, Timelike};
use onsite_adapters::{Identity, SiteDirectory};
use onsite_core::{Clock, IdGen};

/// Once-per-day watermark for the seeding tick
pub struct DailyTrigger<C> {
    clock: C,
    trigger_hour: u32,
    last_fired: Option<NaiveDate>,
}

impl<C: Clock> DailyTrigger<C> {
    pub fn new(clock: C, trigger_hour: u32) -> Self {
        Self {
            clock,
            trigger_hour,
            last_fired: None,
        }
    }

    /// The date to seed, exactly once per day once the hour is reached
    pub fn fire_due(&mut self) -> Option<NaiveDate> {
        let now = self.clock.now();
        if now.hour() < self.trigger_hour {
            return None;
        }
        let today = now.date();
        if self.last_fired == Some(today) {
            return None;
        }
        self.last_fired = Some(today);
        Some(today)
    }
}

/// Clock in every synthetic worker without a session today
///
/// Seeded clock-ins are self-declared (no GPS fix to offer) and go through
/// the normal validation path; schedule rejections are logged and skipped.
/// Returns how many workers were seeded.
pub async fn seed_synthetic_workers<D, C, I, A>(engine: &Engine<D, C, I>, identity: &A) -> usize
where
    D: SiteDirectory,
    C: Clock,
    I: IdGen,
    A: Identity,
{
    let mut seeded = 0;
    for worker in identity.synthetic_workers().await {
        if engine.has_session_today(&worker) {
            continue;
        }
        let Some(site) = worker.default_site.clone() else {
            tracing::warn!(worker = %worker.id, "synthetic worker has no default site");
            continue;
        };
        match engine.clock_in(&worker, Some(site), None, true).await {
            Ok(_) => seeded += 1,
            Err(e @ EngineError::Schedule(_)) => {
                tracing::warn!(worker = %worker.id, error = %e, "seed clock-in outside the window");
            }
            Err(e) => {
                tracing::warn!(worker = %worker.id, error = %e, "seed clock-in failed");
            }
        }
    }
    if seeded > 0 {
        tracing::info!(seeded, "seeded synthetic workers");
    }
    seeded
}

#[cfg(test)]
#[path = "seed_tests.rs"]
mod tests;
