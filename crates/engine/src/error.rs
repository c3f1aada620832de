// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine errors and their client-facing kinds

use onsite_adapters::DirectoryError;
use onsite_core::{GeoError, ScheduleViolation, SegmentError, SessionError};
use onsite_storage::WalError;
use thiserror::Error;

/// Errors from engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Segment(#[from] SegmentError),
    #[error(transparent)]
    Schedule(#[from] ScheduleViolation),
    #[error(transparent)]
    Geo(#[from] GeoError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error("location required: send coordinates or set the self-declared flag")]
    LocationRequired,
    #[error("no site given and the worker has no default site")]
    SiteRequired,
    #[error("storage error: {0}")]
    Wal(#[from] WalError),
}

/// Stable classification carried over the wire; the CLI maps kinds to
/// exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    Schedule,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Conflict => "conflict",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Schedule => "schedule",
            ErrorKind::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Session(SessionError::ShiftAlreadyOpen) => ErrorKind::Conflict,
            EngineError::Session(SessionError::NoOpenShift) => ErrorKind::NotFound,
            EngineError::Segment(SegmentError::BreakAlreadyOpen)
            | EngineError::Segment(SegmentError::BreakAlreadyTaken) => ErrorKind::Conflict,
            EngineError::Segment(SegmentError::NoOpenBreak) => ErrorKind::NotFound,
            EngineError::Schedule(_) => ErrorKind::Schedule,
            EngineError::Geo(_) | EngineError::LocationRequired | EngineError::SiteRequired => {
                ErrorKind::Validation
            }
            EngineError::Directory(_) => ErrorKind::NotFound,
            EngineError::Wal(_) => ErrorKind::Internal,
        }
    }
}
