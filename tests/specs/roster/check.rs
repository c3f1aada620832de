//! Roster validation specs
//!
//! `roster check` parses and cross-validates without touching the daemon.

use crate::prelude::*;

#[test]
fn valid_roster_prints_summary() {
    let crew = Crew::new();

    crew.onsite()
        .args(&["roster", "check"])
        .passes()
        .stdout_has("Roster OK: Harbor Yard Co")
        .stdout_has("workers: 1");
}

#[test]
fn explicit_path_overrides_discovery() {
    let crew = Crew::empty();
    let other = crew.path().join("crews/north.toml");
    crew.file("crews/north.toml", MINIMAL_ROSTER);

    crew.onsite()
        .args(&["roster", "check", other.to_str().unwrap()])
        .passes()
        .stdout_has("Roster OK");
}

#[test]
fn missing_file_is_reported() {
    let crew = Crew::empty();

    crew.onsite()
        .args(&["roster", "check", "missing.toml"])
        .exits(2)
        .stderr_has("IO error");
}

#[test]
fn broken_toml_is_reported() {
    let crew = Crew::empty();
    crew.file("roster.toml", "[worker.maria\ntoken =");

    crew.onsite()
        .args(&["roster", "check"])
        .exits(2)
        .stderr_has("TOML parse error");
}

#[test]
fn duplicate_tokens_are_rejected() {
    let crew = Crew::empty();
    crew.file(
        "roster.toml",
        r#"
[org]
name = "Dup Co"

[role.laborer]

[worker.ana]
token = "tok-shared"
role = "laborer"

[worker.bo]
token = "tok-shared"
role = "laborer"
"#,
    );

    crew.onsite()
        .args(&["roster", "check"])
        .exits(2)
        .stderr_has("duplicate token");
}

#[test]
fn unknown_site_reference_is_rejected() {
    let crew = Crew::empty();
    crew.file(
        "roster.toml",
        r#"
[org]
name = "Ref Co"

[role.laborer]

[worker.ana]
token = "tok-ana"
role = "laborer"
site = "nowhere"
"#,
    );

    crew.onsite()
        .args(&["roster", "check"])
        .exits(2)
        .stderr_has("unknown reference: worker.ana.site");
}

#[test]
fn half_open_schedule_is_rejected() {
    let crew = Crew::empty();
    crew.file(
        "roster.toml",
        r#"
[org]
name = "Sched Co"

[site.yard]
work_start = "08:00"
"#,
    );

    crew.onsite()
        .args(&["roster", "check"])
        .exits(2)
        .stderr_has("work_start and work_end must be set together");
}
