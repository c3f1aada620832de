// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire protocol: length-prefixed JSON messages over a Unix socket.
//!
//! Every message is a 4-byte big-endian length followed by one JSON
//! document. A connection carries a single request and a single response.

use std::time::Duration;

use onsite_core::SiteId;
use onsite_engine::{
    BreakEndedOutcome, BreakStartedOutcome, ClockInOutcome, ClockOutSummary, CompletedToday,
    PingOutcome, StatusSnapshot,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Protocol version exchanged in the hello handshake
pub const PROTOCOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default timeout for reading or writing a single message
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Upper bound on a single frame; anything larger is rejected unread
pub const MAX_MESSAGE_BYTES: u32 = 1024 * 1024;

/// Requests sent from the CLI to the daemon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// Version handshake
    Hello { version: String },
    /// Liveness probe
    Ping,
    /// Daemon-wide counters
    DaemonStatus,
    ClockIn {
        token: String,
        /// Overrides the worker's default site
        site: Option<SiteId>,
        location: Option<(f64, f64)>,
        self_declared: bool,
    },
    ClockOut {
        token: String,
        location: Option<(f64, f64)>,
    },
    StartBreak {
        token: String,
        lat: f64,
        lon: f64,
    },
    EndBreak {
        token: String,
    },
    LocationPing {
        token: String,
        lat: f64,
        lon: f64,
    },
    Status {
        token: String,
    },
    CompletedToday {
        token: String,
    },
    Shutdown,
}

/// Responses sent from the daemon back to the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Hello {
        version: String,
    },
    Pong,
    DaemonStatus {
        uptime_secs: u64,
        sessions_tracked: usize,
        open_shifts: usize,
    },
    ClockedIn {
        outcome: ClockInOutcome,
    },
    ClockedOut {
        summary: ClockOutSummary,
    },
    BreakStarted {
        outcome: BreakStartedOutcome,
    },
    BreakEnded {
        outcome: BreakEndedOutcome,
    },
    PingRecorded {
        outcome: PingOutcome,
    },
    Status {
        snapshot: StatusSnapshot,
    },
    CompletedToday {
        report: CompletedToday,
    },
    ShuttingDown,
    /// Engine or identity failure; `kind` is the machine-readable class
    Error {
        kind: String,
        message: String,
    },
}

/// Protocol errors
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("connection closed")]
    ConnectionClosed,

    #[error("operation timed out")]
    Timeout,

    #[error("message of {0} bytes exceeds the frame limit")]
    MessageTooLarge(usize),
}

/// Serialize a message to JSON bytes (no length prefix)
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, ProtocolError> {
    Ok(serde_json::to_vec(value)?)
}

/// Deserialize a message from JSON bytes
pub fn decode<T: DeserializeOwned>(data: &[u8]) -> Result<T, ProtocolError> {
    Ok(serde_json::from_slice(data)?)
}

/// Write a length-prefixed message
pub async fn write_message<W>(writer: &mut W, data: &[u8]) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    let len = u32::try_from(data.len()).map_err(|_| ProtocolError::MessageTooLarge(data.len()))?;
    if len > MAX_MESSAGE_BYTES {
        return Err(ProtocolError::MessageTooLarge(data.len()));
    }

    writer.write_all(&len.to_be_bytes()).await?;
    writer.write_all(data).await?;
    writer.flush().await?;
    Ok(())
}

/// Read a length-prefixed message
///
/// EOF before a complete message reads as `ConnectionClosed`.
pub async fn read_message<R>(reader: &mut R) -> Result<Vec<u8>, ProtocolError>
where
    R: AsyncRead + Unpin,
{
    let mut len_bytes = [0u8; 4];
    reader
        .read_exact(&mut len_bytes)
        .await
        .map_err(eof_as_closed)?;

    let len = u32::from_be_bytes(len_bytes);
    if len > MAX_MESSAGE_BYTES {
        return Err(ProtocolError::MessageTooLarge(len as usize));
    }

    let mut data = vec![0u8; len as usize];
    reader.read_exact(&mut data).await.map_err(eof_as_closed)?;
    Ok(data)
}

/// Read and decode one request, bounded by `timeout`
pub async fn read_request<R>(reader: &mut R, timeout: Duration) -> Result<Request, ProtocolError>
where
    R: AsyncRead + Unpin,
{
    let data = tokio::time::timeout(timeout, read_message(reader))
        .await
        .map_err(|_| ProtocolError::Timeout)??;
    decode(&data)
}

/// Encode and write one response, bounded by `timeout`
pub async fn write_response<W>(
    writer: &mut W,
    response: &Response,
    timeout: Duration,
) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    let data = encode(response)?;
    tokio::time::timeout(timeout, write_message(writer, &data))
        .await
        .map_err(|_| ProtocolError::Timeout)?
}

fn eof_as_closed(e: std::io::Error) -> ProtocolError {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        ProtocolError::ConnectionClosed
    } else {
        ProtocolError::Io(e)
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
