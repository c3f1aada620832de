// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling
//!
//! All attendance math runs on organization-local wall-clock time
//! (`NaiveDateTime`). The daemon host may run in UTC, so `SystemClock` can
//! carry a fixed offset taken from the roster's org settings.

use chrono::{Duration, FixedOffset, Local, NaiveDateTime, Utc};
use std::sync::{Arc, Mutex};

/// A clock that provides the current organization-local time
pub trait Clock: Clone + Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Real system clock, optionally pinned to a fixed UTC offset
#[derive(Clone, Default)]
pub struct SystemClock {
    offset: Option<FixedOffset>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin organization-local time to `UTC + offset` instead of host-local
    pub fn with_offset(offset: FixedOffset) -> Self {
        Self {
            offset: Some(offset),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        match self.offset {
            Some(offset) => Utc::now().with_timezone(&offset).naive_local(),
            None => Local::now().naive_local(),
        }
    }
}

/// Fake clock for testing with controllable time
#[derive(Clone)]
pub struct FakeClock {
    current: Arc<Mutex<NaiveDateTime>>,
}

impl FakeClock {
    /// Start at an arbitrary but fixed instant
    pub fn new() -> Self {
        Self {
            current: Arc::new(Mutex::new(Local::now().naive_local())),
        }
    }

    /// Start at a specific instant
    pub fn at(instant: NaiveDateTime) -> Self {
        Self {
            current: Arc::new(Mutex::new(instant)),
        }
    }

    /// Advance the clock by the given duration
    pub fn advance(&self, duration: Duration) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current += duration;
    }

    /// Set the clock to a specific instant
    pub fn set(&self, instant: NaiveDateTime) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current = instant;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> NaiveDateTime {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
