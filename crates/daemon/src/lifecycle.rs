// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, shutdown, recovery.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use chrono::{FixedOffset, NaiveDate};
use fs2::FileExt;
use onsite_adapters::{RosterDirectory, RosterIdentity, TracedDirectory, TracedIdentity};
use onsite_core::{Clock, SystemClock, UuidIdGen};
use onsite_engine::{seed_synthetic_workers, DailyTrigger, Engine};
use onsite_roster::load_roster;
use onsite_storage::{AttendanceState, Wal};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::net::UnixListener;
use tracing::{info, warn};

/// Daemon engine with concrete adapter types (wrapped with tracing)
pub type DaemonEngine = Engine<TracedDirectory<RosterDirectory>, SystemClock, UuidIdGen>;

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the roster file
    pub roster_path: PathBuf,
    /// Path to Unix socket
    pub socket_path: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to version file
    pub version_path: PathBuf,
    /// Path to daemon log file
    pub log_path: PathBuf,
    /// Path to the WAL file
    pub wal_path: PathBuf,
}

impl Config {
    /// Create config for a roster
    pub fn for_roster(roster_path: &Path) -> Result<Self, LifecycleError> {
        let canonical = roster_path
            .canonicalize()
            .map_err(|e| LifecycleError::RosterNotFound(roster_path.to_path_buf(), e))?;

        let hash = roster_hash(&canonical);
        let state_dir = state_dir()?.join("rosters").join(&hash);
        let socket_dir = socket_dir()?;

        Ok(Self {
            roster_path: canonical,
            socket_path: socket_dir.join(format!("{}.sock", hash)),
            lock_path: state_dir.join("daemon.pid"),
            version_path: state_dir.join("daemon.version"),
            log_path: state_dir.join("daemon.log"),
            wal_path: state_dir.join("wal").join("attendance.wal"),
        })
    }
}

/// Daemon state during operation
pub struct DaemonState {
    /// Configuration
    pub config: Config,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    /// Unix socket listener
    pub listener: UnixListener,
    /// Attendance engine handling every request
    pub engine: DaemonEngine,
    /// Token resolution against the roster
    pub identity: TracedIdentity<RosterIdentity>,
    /// Once-a-day trigger for seeding synthetic crews
    pub trigger: DailyTrigger<SystemClock>,
    /// When daemon started
    pub start_time: Instant,
    /// Shutdown requested flag
    pub shutdown_requested: bool,
}

impl std::fmt::Debug for DaemonState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DaemonState")
            .field("config", &self.config)
            .field("start_time", &self.start_time)
            .field("shutdown_requested", &self.shutdown_requested)
            .finish_non_exhaustive()
    }
}

impl DaemonState {
    /// Clock in synthetic crews once the daily trigger fires
    ///
    /// Runs on the timer tick; the trigger remembers the date it last fired
    /// so a missed tick self-heals later the same day.
    pub async fn check_daily_seed(&mut self) {
        if self.trigger.fire_due().is_some() {
            seed_synthetic_workers(&self.engine, &self.identity).await;
        }
    }

    /// Shutdown the daemon gracefully
    pub async fn shutdown(&mut self) -> Result<(), LifecycleError> {
        info!("Shutting down daemon...");

        // 1. Stop accepting connections (listener dropped when DaemonState dropped)
        // Note: we don't drop the listener here to keep accepting until the very end

        // 2. Remove socket file
        if self.config.socket_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.socket_path) {
                warn!("Failed to remove socket file: {}", e);
            }
        }

        // 3. Remove PID file
        if self.config.lock_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.lock_path) {
                warn!("Failed to remove PID file: {}", e);
            }
        }

        // 4. Remove version file
        if self.config.version_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.version_path) {
                warn!("Failed to remove version file: {}", e);
            }
        }

        // 5. Lock file is released automatically when self.lock_file is dropped

        info!("Daemon shutdown complete");
        Ok(())
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Roster not found at {0}: {1}")]
    RosterNotFound(PathBuf, std::io::Error),

    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("Failed to bind socket at {0}: {1}")]
    BindFailed(PathBuf, std::io::Error),

    #[error("WAL error: {0}")]
    Wal(#[from] onsite_storage::WalError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Roster error: {0}")]
    Roster(#[from] onsite_roster::ParseError),
}

/// Start the daemon
pub async fn startup(config: &Config) -> Result<DaemonState, LifecycleError> {
    match startup_inner(config).await {
        Ok(state) => Ok(state),
        Err(e) => {
            // Clean up any resources created before failure
            cleanup_on_failure(config);
            Err(e)
        }
    }
}

/// Inner startup logic - cleanup_on_failure called if this fails
async fn startup_inner(config: &Config) -> Result<DaemonState, LifecycleError> {
    // 1. Create state directory (needed for lock, version, WAL)
    if let Some(parent) = config.lock_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // 2. Acquire lock file FIRST - prevents races
    let lock_file = File::create(&config.lock_path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(LifecycleError::LockFailed)?;

    // Write PID to lock file
    use std::io::Write;
    let mut lock_file = lock_file;
    writeln!(lock_file, "{}", std::process::id())?;
    let lock_file = lock_file; // Reborrow as immutable

    // 3. Create directories
    if let Some(parent) = config.socket_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if let Some(parent) = config.wal_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Write version file
    std::fs::write(&config.version_path, env!("CARGO_PKG_VERSION"))?;

    // 4. Load roster BEFORE binding socket (fail fast, don't accept
    //    connections with an invalid roster)
    let roster = Arc::new(load_roster(&config.roster_path)?);

    // 5. Load state from WAL
    let wal = Wal::open(&config.wal_path)?;
    let mut state = AttendanceState::default();
    for op in Wal::replay(&config.wal_path)? {
        state.apply(&op);
    }

    info!(
        "Loaded state: {} sessions, {} open shifts",
        state.session_count(),
        state.open_shift_count()
    );

    // 6. Clock pinned to the org's UTC offset when one is configured
    let clock = roster
        .org
        .utc_offset_minutes
        .and_then(|minutes| FixedOffset::east_opt(minutes * 60))
        .map_or_else(SystemClock::new, SystemClock::with_offset);

    // 7. Reconcile with reality (MVP: log warnings only)
    reconcile_state(&state, clock.now().date());

    // 8. Set up adapters (wrapped with tracing for observability)
    let directory = TracedDirectory::new(RosterDirectory::new(Arc::clone(&roster)));
    let identity = TracedIdentity::new(RosterIdentity::new(Arc::clone(&roster)));

    // 9. Remove stale socket and bind (LAST - only after all validation passes)
    if config.socket_path.exists() {
        std::fs::remove_file(&config.socket_path)?;
    }
    let listener = UnixListener::bind(&config.socket_path)
        .map_err(|e| LifecycleError::BindFailed(config.socket_path.clone(), e))?;

    // 10. Engine over shared state and WAL
    let state = Arc::new(Mutex::new(state));
    let wal = Arc::new(Mutex::new(wal));
    let engine = Engine::new(directory, clock.clone(), UuidIdGen, state, wal);

    // 11. Daily trigger for synthetic crews
    let trigger = DailyTrigger::new(clock, roster.org.seed_hour);

    info!(
        "Daemon started for roster: {}",
        config.roster_path.display()
    );

    Ok(DaemonState {
        config: config.clone(),
        lock_file,
        listener,
        engine,
        identity,
        trigger,
        start_time: Instant::now(),
        shutdown_requested: false,
    })
}

/// Clean up resources on startup failure
fn cleanup_on_failure(config: &Config) {
    // Remove socket if we created it
    if config.socket_path.exists() {
        let _ = std::fs::remove_file(&config.socket_path);
    }

    // Remove version file
    if config.version_path.exists() {
        let _ = std::fs::remove_file(&config.version_path);
    }

    // Remove PID/lock file
    if config.lock_path.exists() {
        let _ = std::fs::remove_file(&config.lock_path);
    }
}

/// Warn about shifts still open from a previous day
///
/// The deadline close only ever runs against today's session, so a shift
/// left open on an earlier date survives restarts until someone looks at it.
fn reconcile_state(state: &AttendanceState, today: NaiveDate) {
    let stale: Vec<_> = state
        .sessions
        .values()
        .filter(|s| s.date < today && s.open_segment().is_some())
        .collect();

    if !stale.is_empty() {
        warn!(
            "Found {} shifts left open on previous days (manual review may be needed)",
            stale.len()
        );
        for session in &stale {
            warn!("  - {} ({})", session.worker, session.date);
        }
    }
}

/// Get the state directory for onsite
fn state_dir() -> Result<PathBuf, LifecycleError> {
    // Use XDG_STATE_HOME or default to ~/.local/state
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("onsite"));
    }

    let home = std::env::var("HOME").map_err(|_| LifecycleError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/onsite"))
}

/// Get the socket directory for onsite
///
/// Uses /tmp/onsite by default to keep paths short (macOS SUN_LEN = 104).
/// Can be overridden with ONSITE_SOCKET_DIR for testing.
fn socket_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("ONSITE_SOCKET_DIR") {
        return Ok(PathBuf::from(dir));
    }
    Ok(PathBuf::from("/tmp/onsite"))
}

/// Compute roster hash for unique daemon directory
fn roster_hash(path: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.to_string_lossy().as_bytes());
    let result = hasher.finalize();
    // Take first 16 chars of hex digest
    hex_encode(&result[..8])
}

// Hex encoding helper
fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
