// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Roster-backed site lookup

use super::{DirectoryError, SiteDirectory};
use async_trait::async_trait;
use onsite_core::{Site, SiteId};
use onsite_roster::Roster;
use std::sync::Arc;

/// Site directory backed by the parsed roster
#[derive(Clone)]
pub struct RosterDirectory {
    roster: Arc<Roster>,
}

impl RosterDirectory {
    pub fn new(roster: Arc<Roster>) -> Self {
        Self { roster }
    }
}

#[async_trait]
impl SiteDirectory for RosterDirectory {
    async fn site(&self, id: &SiteId) -> Result<Site, DirectoryError> {
        self.roster
            .site(id)
            .cloned()
            .ok_or_else(|| DirectoryError::UnknownSite(id.clone()))
    }

    async fn sites(&self) -> Vec<Site> {
        let mut sites: Vec<Site> = self.roster.sites.values().cloned().collect();
        sites.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        sites
    }
}
