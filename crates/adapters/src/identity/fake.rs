// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake identity for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Identity, IdentityError};
use async_trait::async_trait;
use onsite_core::Worker;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Fake identity for testing
#[derive(Clone, Default)]
pub struct FakeIdentity {
    workers: Arc<Mutex<HashMap<String, Worker>>>,
}

impl FakeIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a worker under the given token
    pub fn insert(&self, token: &str, worker: Worker) {
        self.workers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(token.to_string(), worker);
    }
}

#[async_trait]
impl Identity for FakeIdentity {
    async fn resolve(&self, token: &str) -> Result<Worker, IdentityError> {
        self.workers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(token)
            .cloned()
            .ok_or(IdentityError::UnknownToken)
    }

    async fn synthetic_workers(&self) -> Vec<Worker> {
        let mut workers: Vec<Worker> = self
            .workers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .filter(|w| w.synthetic)
            .cloned()
            .collect();
        workers.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        workers
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
