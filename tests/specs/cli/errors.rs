//! Usage error specs
//!
//! Usage mistakes and daemon-rejected requests exit 2; transport and
//! internal failures exit 1.

use crate::prelude::*;

#[test]
fn unknown_command_is_a_usage_error() {
    let crew = Crew::new();

    crew.onsite().args(&["not-a-command"]).exits(2);
}

#[test]
fn clock_in_lat_requires_lon() {
    let crew = Crew::new();

    crew.onsite()
        .args(&["clock-in", "--lat", "40.7580"])
        .exits(2)
        .stderr_has("--lon");
}

#[test]
fn missing_token_is_reported_without_starting_a_daemon() {
    let crew = Crew::new();

    crew.onsite()
        .env_remove("ONSITE_TOKEN")
        .args(&["clock-in", "--self-declared"])
        .exits(2)
        .stderr_has("No worker token given");

    assert!(
        !crew.state_path().join("onsite").exists(),
        "a missing token must not boot a daemon"
    );
}

#[test]
fn unknown_token_is_rejected() {
    let crew = Crew::new();

    crew.onsite()
        .env("ONSITE_TOKEN", "tok-nobody")
        .args(&["clock-in", "--self-declared"])
        .exits(2)
        .stderr_has("token does not match any worker");
}

#[test]
fn missing_roster_file_is_a_usage_error() {
    let crew = Crew::new();

    crew.onsite()
        .args(&["--roster", "/nonexistent/roster.toml", "clock-in", "--self-declared"])
        .exits(2)
        .stderr_has("Roster not found");
}
