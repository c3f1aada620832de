// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon client for CLI commands

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};

use onsite_core::SiteId;
use onsite_daemon::protocol::{self, ProtocolError};
use onsite_daemon::{Request, Response};
use onsite_engine::{
    BreakEndedOutcome, BreakStartedOutcome, ClockInOutcome, ClockOutSummary, CompletedToday,
    PingOutcome, StatusSnapshot,
};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::net::UnixStream;

// Timeout configuration (env vars in milliseconds)
fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Timeout for IPC requests (hello, status, operations, shutdown)
pub fn timeout_ipc() -> Duration {
    parse_duration_ms("ONSITE_TIMEOUT_IPC_MS").unwrap_or(Duration::from_secs(5))
}

/// Timeout for waiting for daemon to start
pub fn timeout_start() -> Duration {
    parse_duration_ms("ONSITE_TIMEOUT_START_MS").unwrap_or(Duration::from_secs(5))
}

/// Timeout for waiting for process to exit
pub fn timeout_exit() -> Duration {
    parse_duration_ms("ONSITE_TIMEOUT_EXIT_MS").unwrap_or(Duration::from_secs(2))
}

/// Polling interval for retries
pub fn poll_interval() -> Duration {
    parse_duration_ms("ONSITE_POLL_INTERVAL_MS").unwrap_or(Duration::from_millis(50))
}

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Daemon not running")]
    DaemonNotRunning,

    #[error("Failed to start daemon: {0}")]
    DaemonStartFailed(String),

    #[error("Connection timeout waiting for daemon to start")]
    DaemonStartTimeout,

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The daemon rejected the request; `kind` picks the exit code
    #[error("{message}")]
    Rejected { kind: String, message: String },

    #[error("Unexpected response from daemon")]
    UnexpectedResponse,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Roster not found: {0}")]
    RosterNotFound(PathBuf),

    #[error("No roster given: pass --roster or set ONSITE_ROSTER")]
    NoRoster,

    #[error("No worker token given: pass --token or set ONSITE_TOKEN")]
    MissingToken,

    #[error("Could not determine state directory")]
    NoStateDir,
}

/// Daemon client
pub struct DaemonClient {
    socket_path: PathBuf,
}

impl DaemonClient {
    /// Connect to daemon, auto-starting if not running
    pub async fn connect_or_start(roster_path: PathBuf) -> Result<Self, ClientError> {
        // Check version file before connecting - restart daemon if version mismatch
        if let Ok(daemon_dir) = get_daemon_dir(&roster_path) {
            let version_path = daemon_dir.join("daemon.version");
            if let Ok(daemon_version) = std::fs::read_to_string(&version_path) {
                let cli_version = env!("CARGO_PKG_VERSION");
                if daemon_version.trim() != cli_version {
                    // Version mismatch - stop old daemon first
                    let _ = daemon_stop(&roster_path).await;
                }
            }
        }

        let client = match Self::connect(roster_path.clone()) {
            Ok(client) => client,
            Err(ClientError::DaemonNotRunning) => {
                // Start daemon in background
                let child = start_daemon_background(&roster_path)?;
                // Wait for socket with retry, watching for early exit
                Self::connect_with_retry(roster_path.clone(), timeout_start(), child).await?
            }
            Err(e) => return Err(wrap_with_startup_error(e, &roster_path)),
        };

        // Handshake so a stale socket surfaces here, not on the real request
        client
            .hello()
            .await
            .map_err(|e| wrap_with_startup_error(e, &roster_path))?;

        Ok(client)
    }

    /// Connect to existing daemon (no auto-start)
    pub fn connect(roster_path: PathBuf) -> Result<Self, ClientError> {
        let socket_path = get_socket_path(&roster_path)?;

        if !socket_path.exists() {
            return Err(ClientError::DaemonNotRunning);
        }

        Ok(Self { socket_path })
    }

    async fn connect_with_retry(
        roster_path: PathBuf,
        timeout: Duration,
        mut child: std::process::Child,
    ) -> Result<Self, ClientError> {
        let start = Instant::now();
        while start.elapsed() < timeout {
            // Check if daemon process exited early (startup failure)
            match child.try_wait() {
                Ok(Some(status)) => {
                    // Process exited - startup failed
                    // Poll for startup error in log (filesystem may need to sync)
                    let poll_start = Instant::now();
                    while poll_start.elapsed() < timeout_exit() {
                        if let Some(err) = read_startup_error(&roster_path) {
                            return Err(ClientError::DaemonStartFailed(err));
                        }
                        tokio::time::sleep(poll_interval()).await;
                    }
                    // No error found in log, return generic failure
                    return Err(ClientError::DaemonStartFailed(format!(
                        "exited with {}",
                        status
                    )));
                }
                Ok(None) => {
                    // Still running, try to connect
                }
                Err(_) => {
                    // Error checking status, assume still running
                }
            }

            match Self::connect(roster_path.clone()) {
                Ok(client) => return Ok(client),
                Err(ClientError::DaemonNotRunning) => {
                    tokio::time::sleep(poll_interval()).await;
                }
                Err(e) => return Err(wrap_with_startup_error(e, &roster_path)),
            }
        }

        // Timeout - check log for startup errors
        Err(wrap_with_startup_error(
            ClientError::DaemonStartTimeout,
            &roster_path,
        ))
    }

    /// Send a request and receive a response with specific timeouts
    async fn send_with_timeout(
        &self,
        request: Request,
        read_timeout: Duration,
        write_timeout: Duration,
    ) -> Result<Response, ClientError> {
        let stream = UnixStream::connect(&self.socket_path).await?;
        let (mut reader, mut writer) = stream.into_split();

        // Encode and send request with write timeout
        let data = protocol::encode(&request)?;
        tokio::time::timeout(write_timeout, protocol::write_message(&mut writer, &data))
            .await
            .map_err(|_| ProtocolError::Timeout)??;

        // Read response with read timeout
        let response_bytes =
            tokio::time::timeout(read_timeout, protocol::read_message(&mut reader))
                .await
                .map_err(|_| ProtocolError::Timeout)??;

        let response: Response = protocol::decode(&response_bytes)?;
        Ok(response)
    }

    /// Send a request and receive a response
    pub async fn send(&self, request: Request) -> Result<Response, ClientError> {
        self.send_with_timeout(request, timeout_ipc(), timeout_ipc())
            .await
    }

    /// Get daemon version via Hello handshake
    pub async fn hello(&self) -> Result<String, ClientError> {
        match self
            .send(Request::Hello {
                version: env!("CARGO_PKG_VERSION").to_string(),
            })
            .await?
        {
            Response::Hello { version } => Ok(version),
            Response::Error { kind, message } => Err(ClientError::Rejected { kind, message }),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    /// Get daemon counters: (uptime secs, sessions tracked, open shifts)
    pub async fn daemon_status(&self) -> Result<(u64, usize, usize), ClientError> {
        match self.send(Request::DaemonStatus).await? {
            Response::DaemonStatus {
                uptime_secs,
                sessions_tracked,
                open_shifts,
            } => Ok((uptime_secs, sessions_tracked, open_shifts)),
            Response::Error { kind, message } => Err(ClientError::Rejected { kind, message }),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    /// Request daemon shutdown
    pub async fn shutdown(&self) -> Result<(), ClientError> {
        match self.send(Request::Shutdown).await? {
            Response::ShuttingDown => Ok(()),
            Response::Error { kind, message } => Err(ClientError::Rejected { kind, message }),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    /// Open a work segment for the worker behind the token
    pub async fn clock_in(
        &self,
        token: &str,
        site: Option<SiteId>,
        location: Option<(f64, f64)>,
        self_declared: bool,
    ) -> Result<ClockInOutcome, ClientError> {
        match self
            .send(Request::ClockIn {
                token: token.to_string(),
                site,
                location,
                self_declared,
            })
            .await?
        {
            Response::ClockedIn { outcome } => Ok(outcome),
            Response::Error { kind, message } => Err(ClientError::Rejected { kind, message }),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    /// Close the open segment and get the day's accounting
    pub async fn clock_out(
        &self,
        token: &str,
        location: Option<(f64, f64)>,
    ) -> Result<ClockOutSummary, ClientError> {
        match self
            .send(Request::ClockOut {
                token: token.to_string(),
                location,
            })
            .await?
        {
            Response::ClockedOut { summary } => Ok(summary),
            Response::Error { kind, message } => Err(ClientError::Rejected { kind, message }),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    /// Start the day's single break
    pub async fn start_break(
        &self,
        token: &str,
        lat: f64,
        lon: f64,
    ) -> Result<BreakStartedOutcome, ClientError> {
        match self
            .send(Request::StartBreak {
                token: token.to_string(),
                lat,
                lon,
            })
            .await?
        {
            Response::BreakStarted { outcome } => Ok(outcome),
            Response::Error { kind, message } => Err(ClientError::Rejected { kind, message }),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    /// End the open break
    pub async fn end_break(&self, token: &str) -> Result<BreakEndedOutcome, ClientError> {
        match self
            .send(Request::EndBreak {
                token: token.to_string(),
            })
            .await?
        {
            Response::BreakEnded { outcome } => Ok(outcome),
            Response::Error { kind, message } => Err(ClientError::Rejected { kind, message }),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    /// Report a location ping for the open shift
    pub async fn ping(&self, token: &str, lat: f64, lon: f64) -> Result<PingOutcome, ClientError> {
        match self
            .send(Request::LocationPing {
                token: token.to_string(),
                lat,
                lon,
            })
            .await?
        {
            Response::PingRecorded { outcome } => Ok(outcome),
            Response::Error { kind, message } => Err(ClientError::Rejected { kind, message }),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    /// Point-in-time view of the worker's day
    pub async fn status(&self, token: &str) -> Result<StatusSnapshot, ClientError> {
        match self
            .send(Request::Status {
                token: token.to_string(),
            })
            .await?
        {
            Response::Status { snapshot } => Ok(snapshot),
            Response::Error { kind, message } => Err(ClientError::Rejected { kind, message }),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    /// Whether the worker already finished a shift today
    pub async fn completed_today(&self, token: &str) -> Result<CompletedToday, ClientError> {
        match self
            .send(Request::CompletedToday {
                token: token.to_string(),
            })
            .await?
        {
            Response::CompletedToday { report } => Ok(report),
            Response::Error { kind, message } => Err(ClientError::Rejected { kind, message }),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }
}

/// Start the daemon in the background, returning the child process handle
fn start_daemon_background(roster_path: &Path) -> Result<std::process::Child, ClientError> {
    // Find the onsited binary - look in cargo target dir or PATH
    let onsited_path = find_onsited_binary()?;

    Command::new(&onsited_path)
        .arg("--roster")
        .arg(roster_path)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .map_err(|e| ClientError::DaemonStartFailed(e.to_string()))
}

/// Stop the daemon (graceful first, then forceful)
/// Returns true if daemon was stopped, false if it wasn't running
pub async fn daemon_stop(roster_path: &Path) -> Result<bool, ClientError> {
    let client = match DaemonClient::connect(roster_path.to_path_buf()) {
        Ok(c) => c,
        Err(ClientError::DaemonNotRunning) => {
            // Clean up any stale files
            if let Ok(daemon_dir) = get_daemon_dir(roster_path) {
                cleanup_stale_pid(&daemon_dir);
            }
            return Ok(false);
        }
        Err(e) => return Err(e),
    };

    // Try graceful shutdown (timeout handled by send())
    let shutdown_result = client.shutdown().await;

    if let Some(pid) = read_daemon_pid(roster_path)? {
        if shutdown_result.is_ok() {
            // Graceful shutdown succeeded, wait for process to exit
            wait_for_exit(pid, timeout_exit()).await;
        }

        // Force kill if still running
        if process_exists(pid) {
            force_kill_daemon(pid);
            wait_for_exit(pid, timeout_exit()).await;
        }
    }

    // Clean up stale files
    let daemon_dir = get_daemon_dir(roster_path)?;
    cleanup_stale_pid(&daemon_dir);

    Ok(true)
}

/// Wait for a process to exit
async fn wait_for_exit(pid: u32, timeout: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if !process_exists(pid) {
            return true;
        }
        tokio::time::sleep(poll_interval()).await;
    }
    false
}

/// Find the onsited binary
fn find_onsited_binary() -> Result<PathBuf, ClientError> {
    // Explicit override (used by tests to ensure correct binary)
    if let Ok(path) = std::env::var("ONSITE_DAEMON_BINARY") {
        return Ok(PathBuf::from(path));
    }

    // First check if we're running from cargo (development)
    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let dev_path = PathBuf::from(manifest_dir)
            .parent()
            .and_then(|p| p.parent())
            .map(|p| p.join("target/debug/onsited"));
        if let Some(path) = dev_path {
            if path.exists() {
                return Ok(path);
            }
        }
    }

    // Check current executable's directory
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let sibling = dir.join("onsited");
            if sibling.exists() {
                return Ok(sibling);
            }
        }
    }

    // Fall back to PATH lookup
    Ok(PathBuf::from("onsited"))
}

/// Get the socket path for a roster
///
/// Uses a short path under /tmp to avoid SUN_LEN limit (104 bytes on macOS).
/// The socket is separate from state_dir which can be longer.
fn get_socket_path(roster_path: &Path) -> Result<PathBuf, ClientError> {
    let canonical = roster_path
        .canonicalize()
        .map_err(|_| ClientError::RosterNotFound(roster_path.to_path_buf()))?;

    let hash = roster_hash(&canonical);
    let socket_dir = socket_dir()?;

    Ok(socket_dir.join(format!("{}.sock", hash)))
}

/// Get the socket directory for onsite
///
/// Uses /tmp/onsite by default to keep paths short (macOS SUN_LEN = 104).
/// Can be overridden with ONSITE_SOCKET_DIR for testing.
fn socket_dir() -> Result<PathBuf, ClientError> {
    if let Ok(dir) = std::env::var("ONSITE_SOCKET_DIR") {
        return Ok(PathBuf::from(dir));
    }
    Ok(PathBuf::from("/tmp/onsite"))
}

/// Get the state directory for onsite
fn state_dir() -> Result<PathBuf, ClientError> {
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("onsite"));
    }

    let home = std::env::var("HOME").map_err(|_| ClientError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/onsite"))
}

/// Compute roster hash for unique daemon directory
fn roster_hash(path: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.to_string_lossy().as_bytes());
    let result = hasher.finalize();
    // Take first 16 chars of hex digest
    result[..8].iter().map(|b| format!("{:02x}", b)).collect()
}

/// Find the roster file by walking up from the current directory
///
/// Checks ONSITE_ROSTER env var first, then walks up looking for a
/// roster.toml.
pub fn find_roster_file() -> Result<PathBuf, ClientError> {
    // Check env var first (set for kiosks and wrapper scripts)
    if let Ok(path) = std::env::var("ONSITE_ROSTER") {
        return Ok(PathBuf::from(path));
    }

    let mut current = std::env::current_dir().map_err(|_| ClientError::NoRoster)?;

    loop {
        let candidate = current.join("roster.toml");
        if candidate.is_file() {
            return Ok(candidate);
        }
        if !current.pop() {
            return Err(ClientError::NoRoster);
        }
    }
}

/// Clean up orphaned PID file during shutdown.
///
/// Called by daemon_stop when the daemon is not running or after stopping it.
fn cleanup_stale_pid(daemon_dir: &Path) {
    let pid_path = daemon_dir.join("daemon.pid");
    if pid_path.exists() {
        let _ = std::fs::remove_file(&pid_path);
    }
}

/// Get the PID from the daemon PID file, if it exists
pub fn read_daemon_pid(roster_path: &Path) -> Result<Option<u32>, ClientError> {
    let daemon_dir = get_daemon_dir(roster_path)?;
    let pid_path = daemon_dir.join("daemon.pid");

    if !pid_path.exists() {
        return Ok(None);
    }

    match std::fs::read_to_string(&pid_path) {
        Ok(content) => {
            let pid = content.trim().parse::<u32>().ok();
            Ok(pid)
        }
        Err(_) => Ok(None),
    }
}

/// Check if a process with the given PID exists
pub fn process_exists(pid: u32) -> bool {
    // Use kill -0 to check if process exists without sending a signal
    Command::new("kill")
        .args(["-0", &pid.to_string()])
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Force kill a daemon process
pub fn force_kill_daemon(pid: u32) -> bool {
    Command::new("kill")
        .args(["-9", &pid.to_string()])
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Get the daemon state directory for a roster (where logs, pid, version files live)
pub fn get_daemon_dir(roster_path: &Path) -> Result<PathBuf, ClientError> {
    let canonical = roster_path
        .canonicalize()
        .map_err(|_| ClientError::RosterNotFound(roster_path.to_path_buf()))?;

    let hash = roster_hash(&canonical);
    let state_dir = state_dir()?;

    Ok(state_dir.join("rosters").join(&hash))
}

/// Startup marker prefix that daemon writes to log before anything else.
/// Full format: "--- onsited: starting (pid: 12345)"
const STARTUP_MARKER_PREFIX: &str = "--- onsited: starting (pid: ";

/// Read daemon log from startup marker, looking for errors.
/// Returns the error message if found, None otherwise.
pub fn read_startup_error(roster_path: &Path) -> Option<String> {
    let daemon_dir = get_daemon_dir(roster_path).ok()?;
    let log_path = daemon_dir.join("daemon.log");

    let content = std::fs::read_to_string(&log_path).ok()?;

    // Find the last startup marker
    let start_pos = content.rfind(STARTUP_MARKER_PREFIX)?;
    let startup_log = &content[start_pos..];

    // Look for ERROR lines
    let errors: Vec<&str> = startup_log
        .lines()
        .filter(|line| line.contains(" ERROR ") || line.contains("Failed to start"))
        .collect();

    if errors.is_empty() {
        return None;
    }

    // Extract just the error messages (strip timestamp/level prefix)
    let error_messages: Vec<String> = errors
        .iter()
        .filter_map(|line| {
            // Format: "timestamp LEVEL target: message"
            // Find the message part after the last colon-space
            line.split_once(": ").map(|(_, msg)| msg.to_string())
        })
        .collect();

    if error_messages.is_empty() {
        Some(errors.join("\n"))
    } else {
        Some(error_messages.join("\n"))
    }
}

/// Wrap an error with startup log info if available.
/// If the daemon log contains errors, return DaemonStartFailed with that info.
/// Otherwise, return the original error.
fn wrap_with_startup_error(err: ClientError, roster_path: &Path) -> ClientError {
    // Don't double-wrap
    if matches!(err, ClientError::DaemonStartFailed(_)) {
        return err;
    }

    if let Some(startup_error) = read_startup_error(roster_path) {
        ClientError::DaemonStartFailed(startup_error)
    } else {
        err
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
