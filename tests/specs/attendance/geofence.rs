//! Geofence specs
//!
//! Out-of-radius clock-ins are accepted but flagged, and pings drive
//! pause/resume transitions for enforced roles.

use crate::prelude::*;

#[test]
fn out_of_radius_clock_in_is_self_declared() {
    let crew = Crew::new();

    crew.onsite()
        .args(&["clock-in"])
        .args(&OFF_SITE)
        .passes()
        .stdout_has("self-declared,")
        .stdout_has("m from site center");
}

#[test]
fn ping_outside_the_fence_pauses_tracking() {
    let crew = Crew::new();
    crew.onsite().args(&["clock-in"]).args(&ON_SITE).passes();

    crew.onsite()
        .args(&["ping"])
        .args(&OFF_SITE)
        .passes()
        .stdout_has("tracking paused");
}

#[test]
fn ping_back_inside_resumes_tracking() {
    let crew = Crew::new();
    crew.onsite().args(&["clock-in"]).args(&ON_SITE).passes();
    crew.onsite().args(&["ping"]).args(&OFF_SITE).passes();

    crew.onsite()
        .args(&["ping"])
        .args(&ON_SITE)
        .passes()
        .stdout_has("Back on site");
}

#[test]
fn ping_inside_the_fence_stays_active() {
    let crew = Crew::new();
    crew.onsite().args(&["clock-in"]).args(&ON_SITE).passes();

    crew.onsite()
        .args(&["ping"])
        .args(&ON_SITE)
        .passes()
        .stdout_has("Ping recorded, on site");
}

#[test]
fn ping_without_an_open_shift_is_recorded_quietly() {
    let crew = Crew::new();

    crew.onsite()
        .args(&["ping"])
        .args(&OFF_SITE)
        .passes()
        .stdout_has("Ping recorded")
        .stdout_lacks("paused");
}

#[test]
fn pause_shows_up_in_status() {
    let crew = Crew::new();
    crew.onsite().args(&["clock-in"]).args(&ON_SITE).passes();
    crew.onsite().args(&["ping"]).args(&OFF_SITE).passes();

    crew.onsite()
        .args(&["status"])
        .passes()
        .stdout_has("Status: outside_geofence");
}

#[test]
fn unenforced_role_never_pauses() {
    let crew = Crew::empty();
    crew.file("roster.toml", UNENFORCED_ROSTER);
    crew.onsite().args(&["clock-in"]).args(&ON_SITE).passes();

    crew.onsite()
        .args(&["ping"])
        .args(&OFF_SITE)
        .passes()
        .stdout_has("Ping recorded")
        .stdout_lacks("paused");
}
