//! Helpers that drive the compiled binary.

use std::process::{Command, Output};

/// Exit code, stdout and stderr of one `tour-dash` run.
pub struct Run {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl From<Output> for Run {
    fn from(output: Output) -> Self {
        Self {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

pub fn run_headless(args: &[&str]) -> (i32, String, String) {
    let run: Run = Command::new(env!("CARGO_BIN_EXE_tour-dash"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .unwrap_or_else(|e| panic!("could not start tour-dash: {e}"))
        .into();
    (run.code, run.stdout, run.stderr)
}

/// Runs `events` against the demo database and parses the JSON report.
pub fn run_demo_json(events: &str) -> (i32, serde_json::Value) {
    let args = ["--headless", "--mock-db", "--output", "json", "--events", events];
    let (code, stdout, stderr) = run_headless(&args);
    match serde_json::from_str(&stdout) {
        Ok(json) => (code, json),
        Err(e) => panic!("invalid JSON ({e}): {stdout}\nstderr: {stderr}"),
    }
}

/// Runs `events` against the demo database with the text report.
pub fn run_demo(events: &str, extra: &[&str]) -> (i32, String, String) {
    let mut args = vec!["--headless", "--mock-db", "--events", events];
    args.extend_from_slice(extra);
    run_headless(&args)
}

/// Runs `events` against a database seeded from `tests/fixtures/<fixture>`.
pub fn run_fixture(fixture: &str, events: &str) -> (i32, String, String) {
    let seed = format!("{}/tests/fixtures/{fixture}", env!("CARGO_MANIFEST_DIR"));
    run_headless(&["--headless", "--seed", &seed, "--events", events])
}
