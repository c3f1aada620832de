// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Socket server and connection handling.

use onsite_adapters::Identity;
use onsite_core::Worker;
use onsite_engine::EngineError;
use tokio::net::UnixStream;
use tracing::{debug, error};

use crate::lifecycle::DaemonState;
use crate::protocol::{self, Request, Response, DEFAULT_TIMEOUT, PROTOCOL_VERSION};

/// Handle a single client connection
pub async fn handle_connection(
    daemon: &mut DaemonState,
    stream: UnixStream,
) -> Result<(), ServerError> {
    // Split stream for reading/writing
    let (mut reader, mut writer) = stream.into_split();

    // Read request with timeout
    let request = match protocol::read_request(&mut reader, DEFAULT_TIMEOUT).await {
        Ok(req) => req,
        Err(protocol::ProtocolError::Timeout) => {
            error!("Request read timeout");
            return Err(ServerError::Timeout);
        }
        Err(protocol::ProtocolError::ConnectionClosed) => {
            debug!("Client disconnected before sending request");
            return Ok(());
        }
        Err(e) => {
            error!("Failed to read request: {}", e);
            return Err(ServerError::Protocol(e));
        }
    };

    debug!("Received request: {:?}", request);

    // Handle request
    let response = handle_request(daemon, request).await;

    debug!("Sending response: {:?}", response);

    // Write response with timeout
    protocol::write_response(&mut writer, &response, DEFAULT_TIMEOUT)
        .await
        .map_err(ServerError::Protocol)?;

    Ok(())
}

/// Handle a single request and return a response
///
/// Worker requests resolve the bearer token first; the token value itself
/// never reaches the engine or the logs.
async fn handle_request(daemon: &mut DaemonState, request: Request) -> Response {
    match request {
        Request::Ping => Response::Pong,

        Request::Hello { version: _ } => Response::Hello {
            version: PROTOCOL_VERSION.to_string(),
        },

        Request::DaemonStatus => {
            let uptime_secs = daemon.start_time.elapsed().as_secs();
            let (sessions_tracked, open_shifts) = daemon.engine.session_counts();

            Response::DaemonStatus {
                uptime_secs,
                sessions_tracked,
                open_shifts,
            }
        }

        Request::Shutdown => {
            daemon.shutdown_requested = true;
            Response::ShuttingDown
        }

        Request::ClockIn {
            token,
            site,
            location,
            self_declared,
        } => {
            let worker = match resolve(daemon, &token).await {
                Ok(worker) => worker,
                Err(response) => return response,
            };
            match daemon
                .engine
                .clock_in(&worker, site, location, self_declared)
                .await
            {
                Ok(outcome) => Response::ClockedIn { outcome },
                Err(e) => engine_error(&e),
            }
        }

        Request::ClockOut { token, location } => {
            let worker = match resolve(daemon, &token).await {
                Ok(worker) => worker,
                Err(response) => return response,
            };
            match daemon.engine.clock_out(&worker, location).await {
                Ok(summary) => Response::ClockedOut { summary },
                Err(e) => engine_error(&e),
            }
        }

        Request::StartBreak { token, lat, lon } => {
            let worker = match resolve(daemon, &token).await {
                Ok(worker) => worker,
                Err(response) => return response,
            };
            match daemon.engine.start_break(&worker, lat, lon) {
                Ok(outcome) => Response::BreakStarted { outcome },
                Err(e) => engine_error(&e),
            }
        }

        Request::EndBreak { token } => {
            let worker = match resolve(daemon, &token).await {
                Ok(worker) => worker,
                Err(response) => return response,
            };
            match daemon.engine.end_break(&worker) {
                Ok(outcome) => Response::BreakEnded { outcome },
                Err(e) => engine_error(&e),
            }
        }

        Request::LocationPing { token, lat, lon } => {
            let worker = match resolve(daemon, &token).await {
                Ok(worker) => worker,
                Err(response) => return response,
            };
            match daemon.engine.record_ping(&worker, lat, lon).await {
                Ok(outcome) => Response::PingRecorded { outcome },
                Err(e) => engine_error(&e),
            }
        }

        Request::Status { token } => {
            let worker = match resolve(daemon, &token).await {
                Ok(worker) => worker,
                Err(response) => return response,
            };
            match daemon.engine.active_status(&worker).await {
                Ok(snapshot) => Response::Status { snapshot },
                Err(e) => engine_error(&e),
            }
        }

        Request::CompletedToday { token } => {
            let worker = match resolve(daemon, &token).await {
                Ok(worker) => worker,
                Err(response) => return response,
            };
            let report = daemon.engine.completed_today(&worker);
            Response::CompletedToday { report }
        }
    }
}

/// Resolve a bearer token, or produce the error response to send back
async fn resolve(daemon: &DaemonState, token: &str) -> Result<Worker, Response> {
    daemon
        .identity
        .resolve(token)
        .await
        .map_err(|e| Response::Error {
            kind: "not_found".to_string(),
            message: e.to_string(),
        })
}

/// Map an engine failure onto the wire
fn engine_error(e: &EngineError) -> Response {
    Response::Error {
        kind: e.kind().to_string(),
        message: e.to_string(),
    }
}

/// Server errors
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] protocol::ProtocolError),

    #[error("Request timeout")]
    Timeout,
}
