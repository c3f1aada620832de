// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake site directory for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{DirectoryError, SiteDirectory};
use async_trait::async_trait;
use onsite_core::{Site, SiteId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Fake site directory for testing
#[derive(Clone, Default)]
pub struct FakeDirectory {
    sites: Arc<Mutex<HashMap<SiteId, Site>>>,
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a site, replacing any previous one with the same id
    pub fn insert(&self, site: Site) {
        self.sites
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(site.id.clone(), site);
    }
}

#[async_trait]
impl SiteDirectory for FakeDirectory {
    async fn site(&self, id: &SiteId) -> Result<Site, DirectoryError> {
        self.sites
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned()
            .ok_or_else(|| DirectoryError::UnknownSite(id.clone()))
    }

    async fn sites(&self) -> Vec<Site> {
        let mut sites: Vec<Site> = self
            .sites
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect();
        sites.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        sites
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
