// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability
//!
//! Tokens are credentials: the identity wrapper never logs a token value,
//! only resolution outcomes.

use crate::directory::{DirectoryError, SiteDirectory};
use crate::identity::{Identity, IdentityError};
use async_trait::async_trait;
use onsite_core::{Site, SiteId, Worker};

/// Wrapper that adds tracing to any Identity
#[derive(Clone)]
pub struct TracedIdentity<I> {
    inner: I,
}

impl<I> TracedIdentity<I> {
    pub fn new(inner: I) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<I: Identity> Identity for TracedIdentity<I> {
    async fn resolve(&self, token: &str) -> Result<Worker, IdentityError> {
        let span = tracing::debug_span!("identity.resolve");
        let _guard = span.enter();

        // Precondition: tokens are non-empty opaque strings
        if token.is_empty() {
            tracing::warn!("rejected empty token");
            return Err(IdentityError::UnknownToken);
        }

        let result = self.inner.resolve(token).await;

        match &result {
            Ok(worker) => tracing::debug!(worker = %worker.id, "token resolved"),
            Err(e) => tracing::warn!(error = %e, "resolution failed"),
        }

        result
    }

    async fn synthetic_workers(&self) -> Vec<Worker> {
        let workers = self.inner.synthetic_workers().await;
        tracing::debug!(count = workers.len(), "listed synthetic workers");
        workers
    }
}

/// Wrapper that adds tracing to any SiteDirectory
#[derive(Clone)]
pub struct TracedDirectory<D> {
    inner: D,
}

impl<D> TracedDirectory<D> {
    pub fn new(inner: D) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<D: SiteDirectory> SiteDirectory for TracedDirectory<D> {
    async fn site(&self, id: &SiteId) -> Result<Site, DirectoryError> {
        let span = tracing::debug_span!("directory.site", site = %id);
        let _guard = span.enter();

        let result = self.inner.site(id).await;

        match &result {
            Ok(site) => tracing::debug!(
                radius_m = site.geofence_radius_m,
                surveyed = site.location.is_some(),
                "site found"
            ),
            Err(e) => tracing::warn!(error = %e, "lookup failed"),
        }

        result
    }

    async fn sites(&self) -> Vec<Site> {
        let sites = self.inner.sites().await;
        tracing::debug!(count = sites.len(), "listed sites");
        sites
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
