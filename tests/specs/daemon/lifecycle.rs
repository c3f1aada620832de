//! Daemon lifecycle specs
//!
//! Verify daemon start/stop/status and the state files it manages.

use crate::prelude::*;

#[test]
fn daemon_status_reports_not_running() {
    let crew = Crew::new();

    crew.onsite()
        .args(&["daemon", "status"])
        .passes()
        .stdout_has("Daemon not running");
}

#[test]
fn daemon_status_json_reports_not_running() {
    let crew = Crew::new();

    let value = crew
        .onsite()
        .args(&["daemon", "status", "--json"])
        .passes()
        .json();

    assert_eq!(value["running"], serde_json::json!(false));
}

#[test]
fn daemon_start_reports_running() {
    let crew = Crew::new();

    crew.onsite()
        .args(&["daemon", "start"])
        .passes()
        .stdout_has("Daemon running");
}

#[test]
fn daemon_start_is_idempotent() {
    let crew = Crew::new();
    crew.onsite().args(&["daemon", "start"]).passes();

    crew.onsite()
        .args(&["daemon", "start"])
        .passes()
        .stdout_has("Daemon running");
}

#[test]
fn daemon_status_shows_counters_after_start() {
    let crew = Crew::new();
    crew.onsite().args(&["daemon", "start"]).passes();

    crew.onsite()
        .args(&["daemon", "status"])
        .passes()
        .stdout_has("sessions tracked: 0")
        .stdout_has("open shifts:");
}

#[test]
fn daemon_status_json_carries_counters() {
    let crew = Crew::new();
    crew.onsite().args(&["daemon", "start"]).passes();

    let value = crew
        .onsite()
        .args(&["daemon", "status", "--json"])
        .passes()
        .json();

    assert_eq!(value["running"], serde_json::json!(true));
    assert_eq!(value["sessions_tracked"], serde_json::json!(0));
    assert_eq!(value["open_shifts"], serde_json::json!(0));
}

#[test]
fn daemon_stop_reports_stopped() {
    let crew = Crew::new();
    crew.onsite().args(&["daemon", "start"]).passes();

    crew.onsite()
        .args(&["daemon", "stop"])
        .passes()
        .stdout_has("Daemon stopped");
}

#[test]
fn daemon_stop_when_not_running_says_so() {
    let crew = Crew::new();

    crew.onsite()
        .args(&["daemon", "stop"])
        .passes()
        .stdout_has("Daemon was not running");
}

#[test]
fn daemon_status_reports_not_running_after_stop() {
    let crew = Crew::new();
    crew.onsite().args(&["daemon", "start"]).passes();
    crew.onsite().args(&["daemon", "stop"]).passes();

    crew.onsite()
        .args(&["daemon", "status"])
        .passes()
        .stdout_has("Daemon not running");
}

#[test]
fn daemon_writes_pid_and_version_files() {
    let crew = Crew::new();
    crew.onsite().args(&["daemon", "start"]).passes();

    let rosters_dir = crew.state_path().join("onsite/rosters");
    let has_state_files = wait_for(SPEC_WAIT_MAX_MS, || {
        std::fs::read_dir(&rosters_dir)
            .ok()
            .map(|entries| {
                entries.filter_map(|e| e.ok()).any(|entry| {
                    entry.path().join("daemon.pid").exists()
                        && entry.path().join("daemon.version").exists()
                })
            })
            .unwrap_or(false)
    });

    assert!(has_state_files, "daemon.pid and daemon.version should exist");
}

#[test]
fn daemon_binds_a_socket() {
    let crew = Crew::new();
    crew.onsite().args(&["daemon", "start"]).passes();

    let socket_dir = crew.socket_path();
    let has_socket = wait_for(SPEC_WAIT_MAX_MS, || {
        std::fs::read_dir(&socket_dir)
            .ok()
            .map(|entries| {
                entries.filter_map(|e| e.ok()).any(|entry| {
                    entry
                        .path()
                        .extension()
                        .map(|ext| ext == "sock")
                        .unwrap_or(false)
                })
            })
            .unwrap_or(false)
    });

    assert!(has_socket, "daemon socket file should exist");
}

#[test]
fn daemon_start_surfaces_roster_errors() {
    let crew = Crew::empty();
    // Worker with no token - the daemon refuses to start
    crew.file(
        "roster.toml",
        "[org]\nname = \"Bad Co\"\n\n[role.laborer]\n\n[worker.ana]\nrole = \"laborer\"\n",
    );

    crew.onsite()
        .args(&["daemon", "start"])
        .fails()
        .stderr_has("missing required field: worker.ana.token");
}
