//! Clock-in / clock-out specs
//!
//! The daemon is auto-started by the first worker command; each spec
//! exercises one rule of segment accounting.

use crate::prelude::*;

#[test]
fn clock_in_on_site_reports_site_and_distance() {
    let crew = Crew::new();

    crew.onsite()
        .args(&["clock-in"])
        .args(&ON_SITE)
        .passes()
        .stdout_has("Clocked in at yard")
        .stdout_has("on site, 0 m from center");
}

#[test]
fn clock_in_twice_is_a_conflict() {
    let crew = Crew::new();
    crew.onsite().args(&["clock-in"]).args(&ON_SITE).passes();

    crew.onsite()
        .args(&["clock-in"])
        .args(&ON_SITE)
        .exits(2)
        .stderr_has("a shift is already open");
}

#[test]
fn clock_in_without_location_or_declaration_is_rejected() {
    let crew = Crew::new();

    crew.onsite()
        .args(&["clock-in"])
        .exits(2)
        .stderr_has("location required");
}

#[test]
fn self_declared_clock_in_is_flagged() {
    let crew = Crew::new();

    crew.onsite()
        .args(&["clock-in", "--self-declared"])
        .passes()
        .stdout_has("self-declared, no GPS fix");
}

#[test]
fn clock_in_without_a_resolvable_site_is_rejected() {
    let crew = Crew::new();
    // Worker with no default site must name one explicitly
    crew.file(
        "roster.toml",
        r#"
[org]
name = "Harbor Yard Co"

[role.laborer]

[site.yard]
latitude = 40.7580
longitude = -73.9855

[worker.maria]
token = "tok-maria"
role = "laborer"
"#,
    );

    crew.onsite()
        .args(&["clock-in", "--self-declared"])
        .exits(2)
        .stderr_has("no site given");

    crew.onsite()
        .args(&["clock-in", "--site", "yard", "--self-declared"])
        .passes()
        .stdout_has("Clocked in at yard");
}

#[test]
fn clock_out_reports_segment_and_day_totals() {
    let crew = Crew::new();
    crew.onsite().args(&["clock-in"]).args(&ON_SITE).passes();

    crew.onsite()
        .args(&["clock-out"])
        .args(&ON_SITE)
        .passes()
        .stdout_has("Clocked out of yard")
        .stdout_has("segment: 0.00 h worked")
        .stdout_has("today:   0.00 h worked");
}

#[test]
fn clock_out_without_open_shift_is_not_found() {
    let crew = Crew::new();

    crew.onsite()
        .args(&["clock-out"])
        .exits(2)
        .stderr_has("no open shift for today");
}

#[test]
fn leave_and_return_is_reported_as_resumed() {
    let crew = Crew::new();
    crew.onsite().args(&["clock-in"]).args(&ON_SITE).passes();
    crew.onsite().args(&["clock-out"]).passes();

    crew.onsite()
        .args(&["clock-in"])
        .args(&ON_SITE)
        .passes()
        .stdout_has("Back on the clock");
}

#[test]
fn completed_today_is_no_before_any_shift() {
    let crew = Crew::new();

    crew.onsite()
        .args(&["completed-today"])
        .passes()
        .stdout_has("Completed today: no");
}

#[test]
fn completed_today_counts_closed_segments() {
    let crew = Crew::new();
    crew.onsite().args(&["clock-in"]).args(&ON_SITE).passes();
    crew.onsite().args(&["clock-out"]).passes();

    crew.onsite()
        .args(&["completed-today"])
        .passes()
        .stdout_has("Completed today: yes (1 segment)");
}

#[test]
fn completed_today_json_carries_the_report() {
    let crew = Crew::new();
    crew.onsite().args(&["clock-in"]).args(&ON_SITE).passes();
    crew.onsite().args(&["clock-out"]).passes();

    let value = crew
        .onsite()
        .args(&["completed-today", "--json"])
        .passes()
        .json();

    assert_eq!(value["worker"], serde_json::json!("maria"));
    assert_eq!(value["completed"], serde_json::json!(true));
    assert_eq!(value["segments"], serde_json::json!(1));
}
