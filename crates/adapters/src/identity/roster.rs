// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Roster-backed identity resolution

use super::{Identity, IdentityError};
use async_trait::async_trait;
use onsite_core::Worker;
use onsite_roster::Roster;
use std::sync::Arc;

/// Identity backed by the parsed roster
#[derive(Clone)]
pub struct RosterIdentity {
    roster: Arc<Roster>,
}

impl RosterIdentity {
    pub fn new(roster: Arc<Roster>) -> Self {
        Self { roster }
    }
}

#[async_trait]
impl Identity for RosterIdentity {
    async fn resolve(&self, token: &str) -> Result<Worker, IdentityError> {
        self.roster
            .worker_by_token(token)
            .map(|entry| entry.worker.clone())
            .ok_or(IdentityError::UnknownToken)
    }

    async fn synthetic_workers(&self) -> Vec<Worker> {
        self.roster
            .synthetic_workers()
            .map(|entry| entry.worker.clone())
            .collect()
    }
}
