//! Break specs
//!
//! One break per shift, bracketed by explicit start/end.

use crate::prelude::*;

#[test]
fn break_start_reports_the_time() {
    let crew = Crew::new();
    crew.onsite().args(&["clock-in"]).args(&ON_SITE).passes();

    crew.onsite()
        .args(&["break", "start"])
        .args(&ON_SITE)
        .passes()
        .stdout_has("Break started at");
}

#[test]
fn break_requires_an_open_shift() {
    let crew = Crew::new();

    crew.onsite()
        .args(&["break", "start"])
        .args(&ON_SITE)
        .exits(2)
        .stderr_has("no open shift for today");
}

#[test]
fn break_start_twice_is_a_conflict() {
    let crew = Crew::new();
    crew.onsite().args(&["clock-in"]).args(&ON_SITE).passes();
    crew.onsite().args(&["break", "start"]).args(&ON_SITE).passes();

    crew.onsite()
        .args(&["break", "start"])
        .args(&ON_SITE)
        .exits(2)
        .stderr_has("a break is already running");
}

#[test]
fn break_end_reports_the_length() {
    let crew = Crew::new();
    crew.onsite().args(&["clock-in"]).args(&ON_SITE).passes();
    crew.onsite().args(&["break", "start"]).args(&ON_SITE).passes();

    crew.onsite()
        .args(&["break", "end"])
        .passes()
        .stdout_has("Break ended at")
        .stdout_has("(0 min)");
}

#[test]
fn break_end_without_open_break_is_not_found() {
    let crew = Crew::new();
    crew.onsite().args(&["clock-in"]).args(&ON_SITE).passes();

    crew.onsite()
        .args(&["break", "end"])
        .exits(2)
        .stderr_has("no break is currently open");
}

#[test]
fn second_break_in_one_shift_is_rejected() {
    let crew = Crew::new();
    crew.onsite().args(&["clock-in"]).args(&ON_SITE).passes();
    crew.onsite().args(&["break", "start"]).args(&ON_SITE).passes();
    crew.onsite().args(&["break", "end"]).passes();

    crew.onsite()
        .args(&["break", "start"])
        .args(&ON_SITE)
        .exits(2)
        .stderr_has("already taken");
}
