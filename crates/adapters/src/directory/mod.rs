// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job-site lookup

mod roster;

pub use roster::RosterDirectory;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeDirectory;

use async_trait::async_trait;
use onsite_core::{Site, SiteId};
use thiserror::Error;

/// Errors from site lookup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    #[error("unknown site: {0}")]
    UnknownSite(SiteId),
}

/// Looks up job sites and their geofence and schedule settings
#[async_trait]
pub trait SiteDirectory: Clone + Send + Sync + 'static {
    async fn site(&self, id: &SiteId) -> Result<Site, DirectoryError>;

    /// All known sites, in a stable order
    async fn sites(&self) -> Vec<Site>;
}
