// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker reference data

use crate::site::SiteId;
use serde::{Deserialize, Serialize};

/// Unique identifier for a worker
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkerId(pub String);

impl std::fmt::Display for WorkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An already-authenticated worker, as resolved by the identity seam.
/// Capability flags come from the worker's role in the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worker {
    pub id: WorkerId,
    pub name: String,
    /// Role capability: whether location pings drive geofence pauses
    pub geofence_enforced: bool,
    /// Seeded by the daily trigger when set
    pub synthetic: bool,
    pub default_site: Option<SiteId>,
}
