//! Shared helpers for CLI specs.
//!
//! `Crew` owns one spec's world: a temp directory holding the roster,
//! an isolated XDG_STATE_HOME, an isolated socket directory, and the
//! path of the freshly built daemon binary. Any daemon a spec starts is
//! stopped when the fixture drops.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};

use tempfile::TempDir;

/// Upper bound for polling filesystem side effects
pub const SPEC_WAIT_MAX_MS: u64 = 5_000;

/// One geofenced site, one enforced worker. No schedule, so clock-ins
/// are accepted at any wall-clock time.
pub const MINIMAL_ROSTER: &str = r#"
[org]
name = "Harbor Yard Co"

[role.laborer]
geofence_enforced = true

[site.yard]
name = "North Yard"
latitude = 40.7580
longitude = -73.9855
geofence_radius_m = 100.0

[worker.maria]
name = "Maria"
token = "tok-maria"
role = "laborer"
site = "yard"
"#;

/// Same site, but pings never drive pauses for the worker's role
pub const UNENFORCED_ROSTER: &str = r#"
[org]
name = "Harbor Yard Co"

[role.clerk]
geofence_enforced = false

[site.yard]
name = "North Yard"
latitude = 40.7580
longitude = -73.9855
geofence_radius_m = 100.0

[worker.maria]
name = "Maria"
token = "tok-maria"
role = "clerk"
site = "yard"
"#;

/// Inside the yard geofence (site center)
pub const ON_SITE: [&str; 4] = ["--lat", "40.7580", "--lon", "-73.9855"];
/// Roughly 1.1 km north of the yard, well outside the 100 m radius
pub const OFF_SITE: [&str; 4] = ["--lat", "40.7680", "--lon", "-73.9855"];

/// Per-spec world: roster, state dir, socket dir, daemon binary
pub struct Crew {
    root: TempDir,
}

impl Crew {
    /// Fixture with the minimal roster in place
    pub fn new() -> Self {
        let crew = Self::empty();
        crew.file("roster.toml", MINIMAL_ROSTER);
        crew
    }

    /// Fixture with no roster; specs add their own files
    pub fn empty() -> Self {
        let root = TempDir::new().unwrap();
        std::fs::create_dir_all(root.path().join("state")).unwrap();
        std::fs::create_dir_all(root.path().join("sock")).unwrap();
        Self { root }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn roster_path(&self) -> PathBuf {
        self.path().join("roster.toml")
    }

    pub fn state_path(&self) -> PathBuf {
        self.path().join("state")
    }

    pub fn socket_path(&self) -> PathBuf {
        self.path().join("sock")
    }

    /// Write a file under the fixture root, creating parent directories
    pub fn file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Command builder for the onsite binary, isolated to this fixture
    pub fn onsite(&self) -> SpecCmd {
        SpecCmd {
            cmd: self.command(),
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin("onsite"));
        cmd.current_dir(self.path());
        cmd.env("XDG_STATE_HOME", self.state_path());
        cmd.env("ONSITE_SOCKET_DIR", self.socket_path());
        cmd.env("ONSITE_DAEMON_BINARY", assert_cmd::cargo::cargo_bin("onsited"));
        cmd.env("ONSITE_TOKEN", "tok-maria");
        if self.roster_path().is_file() {
            cmd.env("ONSITE_ROSTER", self.roster_path());
        }
        cmd
    }

    fn has_socket(&self) -> bool {
        std::fs::read_dir(self.socket_path())
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
    }
}

impl Drop for Crew {
    fn drop(&mut self) {
        // Stop any daemon the spec started so the temp dir can go away
        if self.has_socket() {
            let _ = self.command().args(["daemon", "stop"]).output();
        }
    }
}

/// Builder around one CLI invocation
pub struct SpecCmd {
    cmd: Command,
}

impl SpecCmd {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn env_remove(mut self, key: &str) -> Self {
        self.cmd.env_remove(key);
        self
    }

    /// Run and require exit code 0
    pub fn passes(self) -> SpecOutput {
        let output = self.run();
        assert!(
            output.status.success(),
            "expected success, got {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            output.stdout,
            output.stderr
        );
        output
    }

    /// Run and require a non-zero exit
    pub fn fails(self) -> SpecOutput {
        let output = self.run();
        assert!(
            !output.status.success(),
            "expected failure, got success\nstdout: {}\nstderr: {}",
            output.stdout,
            output.stderr
        );
        output
    }

    /// Run and require a specific exit code
    pub fn exits(self, code: i32) -> SpecOutput {
        let output = self.run();
        assert_eq!(
            output.status.code(),
            Some(code),
            "expected exit {code}\nstdout: {}\nstderr: {}",
            output.stdout,
            output.stderr
        );
        output
    }

    fn run(mut self) -> SpecOutput {
        let output = self.cmd.output().unwrap();
        SpecOutput {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Captured output with chainable assertions
pub struct SpecOutput {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl SpecOutput {
    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(
            self.stdout.contains(needle),
            "stdout missing {needle:?}\nstdout: {}\nstderr: {}",
            self.stdout,
            self.stderr
        );
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        assert!(
            !self.stdout.contains(needle),
            "stdout unexpectedly contains {needle:?}\nstdout: {}",
            self.stdout
        );
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(
            self.stderr.contains(needle),
            "stderr missing {needle:?}\nstdout: {}\nstderr: {}",
            self.stdout,
            self.stderr
        );
        self
    }

    /// Parse stdout as one JSON document
    pub fn json(self) -> serde_json::Value {
        serde_json::from_str(self.stdout.trim()).unwrap_or_else(|e| {
            panic!("stdout is not JSON: {e}\nstdout: {}", self.stdout);
        })
    }
}

/// Poll `check` until it returns true or `max_ms` elapses
pub fn wait_for(max_ms: u64, mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_millis(max_ms);
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(25));
    }
    false
}
