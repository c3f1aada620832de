// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job-site reference data

use crate::geo::GeoPoint;
use crate::schedule::WorkSchedule;
use serde::{Deserialize, Serialize};

/// Unique identifier for a job site
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SiteId(pub String);

impl std::fmt::Display for SiteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A job site as the engine sees it: read-only reference data resolved
/// through the site directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub id: SiteId,
    pub name: String,
    /// Sites without surveyed coordinates never produce geofence pauses
    pub location: Option<GeoPoint>,
    pub geofence_radius_m: f64,
    pub schedule: Option<WorkSchedule>,
}
