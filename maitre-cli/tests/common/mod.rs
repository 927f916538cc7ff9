//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with temporary directories
//! - Command builders with the data directory pre-configured
//! - A standard floor plan fixture

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// Date every test books on.
pub const SERVICE_DATE: &str = "2026-10-15";

/// Two joinable two-tops, a four-top and a six-top.
pub const FLOOR_PLAN: &str = "\
tables:
  - { number: 1, capacity: 2, joinable: true }
  - { number: 2, capacity: 2, joinable: true }
  - { number: 4, capacity: 4 }
  - { number: 8, capacity: 6 }
joins:
  - [1, 2]
";

/// Test environment with isolated data directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
    /// Path to the maitre data directory
    pub data_dir: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    ///
    /// The data directory is not created; maitre creates it on first use.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        let data_dir = temp_path.join("maitre-data");

        Self {
            temp_dir,
            temp_path,
            data_dir,
        }
    }

    /// A command with no flags, run from the temp directory and with the
    /// maitre environment variables cleared.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("maitre").expect("Failed to find maitre binary");
        cmd.current_dir(&self.temp_path);
        for var in [
            "MAITRE_DATA_DIR",
            "MAITRE_RESTAURANT",
            "MAITRE_ACTOR",
            "MAITRE_BUSY_TIMEOUT",
            "MAITRE_DISABLE_AUTOINIT",
            "MAITRE_OUTPUT_FORMAT",
            "MAITRE_LOG_MODE",
            "MAITRE_MAX_GROUP_SIZE",
            "MAITRE_PERMISSIVE_FALLBACK",
            "MAITRE_DEFAULT_DURATION_MINUTES",
            "MAITRE_DISABLE_NOTIFICATIONS",
            "MAITRE_MAXIMUM_LOCK_WAIT_SECONDS",
        ] {
            cmd.env_remove(var);
        }
        cmd
    }

    /// A command with `--data-dir` set to this environment's data directory.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--data-dir").arg(&self.data_dir);
        cmd
    }

    /// Writes `contents` to a file in the temp directory.
    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_path.join(name);
        std::fs::write(&path, contents).expect("Failed to write test file");
        path
    }

    /// Imports [`FLOOR_PLAN`].
    pub fn import_standard_layout(&self) {
        let plan = self.write_file("floor.yaml", FLOOR_PLAN);
        self.command()
            .args(["layout", "import"])
            .arg(plan)
            .assert()
            .success();
    }

    /// Books a guest and returns the reservation id.
    ///
    /// # Panics
    /// Panics if the command fails or doesn't print an id.
    pub fn reserve(&self, time: &str, party: u32, extra: &[&str]) -> i64 {
        let output = self
            .command()
            .args(["reserve", "--date", SERVICE_DATE, "--time", time])
            .args(["--party", &party.to_string(), "--guest", "Test Guest"])
            .args(extra)
            .output()
            .expect("Failed to run reserve command");

        assert!(
            output.status.success(),
            "Reserve failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        parse_id(&String::from_utf8(output.stdout).expect("Invalid UTF-8 in output"))
    }

    /// Lists the service date's reservations as JSON.
    pub fn list_json(&self) -> Vec<serde_json::Value> {
        let output = self
            .command()
            .args(["list", "--date", SERVICE_DATE, "--format", "json"])
            .output()
            .expect("Failed to run list command");

        assert!(
            output.status.success(),
            "List failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("List output is not JSON")
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses a reservation id printed by `reserve`.
#[allow(dead_code)]
pub fn parse_id(output: &str) -> i64 {
    output
        .trim()
        .parse()
        .expect("Output is not a valid reservation id")
}
