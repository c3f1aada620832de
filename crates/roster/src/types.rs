// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parsed roster types

use onsite_core::{Site, SiteId, Worker, WorkerId};
use std::collections::HashMap;

/// Sites without an explicit radius get this one (meters)
pub const DEFAULT_GEOFENCE_RADIUS_M: f64 = 100.0;
/// Overtime allowance when a scheduled site does not set one (minutes)
pub const DEFAULT_MAX_OVERTIME_MINUTES: i64 = 120;
/// Hour of day the daily seeding trigger fires
pub const DEFAULT_SEED_HOUR: u32 = 8;

/// Organization-level settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgSettings {
    pub name: String,
    /// Pin organization-local time to UTC + this many minutes; None means
    /// host-local time
    pub utc_offset_minutes: Option<i32>,
    pub seed_hour: u32,
}

impl Default for OrgSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            utc_offset_minutes: None,
            seed_hour: DEFAULT_SEED_HOUR,
        }
    }
}

/// A worker role; capabilities, not permissions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub name: String,
    /// Whether location pings drive geofence pauses for workers in this role
    pub geofence_enforced: bool,
}

/// One roster worker with the credential that resolves to them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerEntry {
    pub worker: Worker,
    pub token: String,
    pub role: String,
}

/// A parsed, cross-validated roster
#[derive(Debug, Clone, Default)]
pub struct Roster {
    pub org: OrgSettings,
    pub roles: HashMap<String, Role>,
    pub sites: HashMap<String, Site>,
    pub workers: HashMap<String, WorkerEntry>,
}

impl Roster {
    /// Resolve a bearer token to its worker
    pub fn worker_by_token(&self, token: &str) -> Option<&WorkerEntry> {
        self.workers.values().find(|w| w.token == token)
    }

    pub fn worker(&self, id: &WorkerId) -> Option<&WorkerEntry> {
        self.workers.get(&id.0)
    }

    pub fn site(&self, id: &SiteId) -> Option<&Site> {
        self.sites.get(&id.0)
    }

    /// Workers the daily trigger clocks in automatically, in a stable order
    pub fn synthetic_workers(&self) -> impl Iterator<Item = &WorkerEntry> {
        let mut entries: Vec<&WorkerEntry> = self
            .workers
            .values()
            .filter(|w| w.worker.synthetic)
            .collect();
        entries.sort_by(|a, b| a.worker.id.0.cmp(&b.worker.id.0));
        entries.into_iter()
    }
}
