// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Token-to-worker resolution

mod roster;

pub use roster::RosterIdentity;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeIdentity;

use async_trait::async_trait;
use onsite_core::Worker;
use thiserror::Error;

/// Errors from identity resolution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// The token value is a credential and never appears in the message
    #[error("token does not match any worker")]
    UnknownToken,
}

/// Resolves bearer tokens to workers
#[async_trait]
pub trait Identity: Clone + Send + Sync + 'static {
    /// Resolve a token to the worker it authenticates
    async fn resolve(&self, token: &str) -> Result<Worker, IdentityError>;

    /// Workers the daily trigger clocks in automatically, in a stable order
    async fn synthetic_workers(&self) -> Vec<Worker>;
}
