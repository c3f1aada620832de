//! CLI help and version specs

use crate::prelude::*;

#[test]
fn help_lists_every_command() {
    let crew = Crew::new();

    crew.onsite()
        .args(&["--help"])
        .passes()
        .stdout_has("clock-in")
        .stdout_has("clock-out")
        .stdout_has("break")
        .stdout_has("ping")
        .stdout_has("status")
        .stdout_has("completed-today")
        .stdout_has("roster")
        .stdout_has("daemon")
        .stdout_has("completions");
}

#[test]
fn version_names_the_binary() {
    let crew = Crew::new();

    crew.onsite()
        .args(&["--version"])
        .passes()
        .stdout_has("onsite");
}

#[test]
fn clock_in_help_names_location_flags() {
    let crew = Crew::new();

    crew.onsite()
        .args(&["clock-in", "--help"])
        .passes()
        .stdout_has("--lat")
        .stdout_has("--lon")
        .stdout_has("--self-declared")
        .stdout_has("--site");
}

#[test]
fn completions_emit_shell_script() {
    let crew = Crew::new();

    crew.onsite()
        .args(&["completions", "bash"])
        .passes()
        .stdout_has("onsite");
}
