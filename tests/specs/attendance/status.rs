//! Status specs
//!
//! The status command reflects each phase of a shift, in text and JSON.

use crate::prelude::*;

#[test]
fn status_before_any_shift_reports_no_session() {
    let crew = Crew::new();

    crew.onsite()
        .args(&["status"])
        .passes()
        .stdout_has("No session for");
}

#[test]
fn status_during_a_shift_is_active() {
    let crew = Crew::new();
    crew.onsite().args(&["clock-in"]).args(&ON_SITE).passes();

    crew.onsite()
        .args(&["status"])
        .passes()
        .stdout_has("Status: active")
        .stdout_has("site: yard")
        .stdout_has("checked in:");
}

#[test]
fn status_during_a_break_is_on_break() {
    let crew = Crew::new();
    crew.onsite().args(&["clock-in"]).args(&ON_SITE).passes();
    crew.onsite().args(&["break", "start"]).args(&ON_SITE).passes();

    crew.onsite()
        .args(&["status"])
        .passes()
        .stdout_has("Status: on_break");
}

#[test]
fn status_after_clock_out_is_finished() {
    let crew = Crew::new();
    crew.onsite().args(&["clock-in"]).args(&ON_SITE).passes();
    crew.onsite().args(&["clock-out"]).passes();

    crew.onsite()
        .args(&["status"])
        .passes()
        .stdout_has("Status: finished")
        .stdout_has("today: 0.00 h worked");
}

#[test]
fn status_json_carries_the_snapshot() {
    let crew = Crew::new();
    crew.onsite().args(&["clock-in"]).args(&ON_SITE).passes();

    let snapshot = crew.onsite().args(&["status", "--json"]).passes().json();
    assert_eq!(snapshot["status"], "active");
    assert_eq!(snapshot["worker"], "maria");
    assert!(snapshot["hours"].is_object());
}
