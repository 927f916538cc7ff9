//! Integration tests for the maitre CLI surface.
//!
//! These tests verify argument parsing, help text, version output, exit
//! codes and the global options.

mod common;

use common::{TestEnv, SERVICE_DATE};
use predicates::prelude::*;

#[test]
fn test_cli_no_arguments() {
    let env = TestEnv::new();
    env.command_bare()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_cli_version_flag() {
    let env = TestEnv::new();
    env.command_bare()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("maitre"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_help_lists_commands() {
    let env = TestEnv::new();
    env.command_bare()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Allocate restaurant tables to reservations"))
        .stdout(predicate::str::contains("allocate-pending"))
        .stdout(predicate::str::contains("override"));
}

#[test]
fn test_unknown_subcommand_exit_code() {
    let env = TestEnv::new();
    env.command_bare().arg("seat-everyone").assert().code(2);
}

#[test]
fn test_invalid_time_is_rejected() {
    let env = TestEnv::new();
    env.command()
        .args(["find", "--date", SERVICE_DATE, "--time", "7pm", "--party", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("HH:MM"));
}

#[test]
fn test_reserve_needs_a_party() {
    let env = TestEnv::new();
    env.command()
        .args(["reserve", "--date", SERVICE_DATE, "--time", "19:00", "--party", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--guest"));
}

#[test]
fn test_zero_duration_exit_code() {
    let env = TestEnv::new();
    env.import_standard_layout();
    env.command()
        .args(["reserve", "--date", SERVICE_DATE, "--time", "19:00", "--party", "2"])
        .args(["--duration", "0", "--guest", "Zed"])
        .assert()
        .code(4);
}

#[test]
fn test_no_data_directory_exit_code() {
    let env = TestEnv::new();
    env.command()
        .args(["--disable-autoinit", "layout", "tables"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("maitre init"));
    assert!(!env.data_dir.exists());
}

#[test]
fn test_autoinit_creates_database() {
    let env = TestEnv::new();
    env.command().args(["layout", "tables"]).assert().success();
    assert!(env.data_dir.join("maitre.db").exists());
}

#[test]
fn test_unknown_reservation_exit_code() {
    let env = TestEnv::new();
    env.command()
        .args(["status", "999", "seated"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("999"));
}

#[test]
fn test_unknown_status_is_rejected() {
    let env = TestEnv::new();
    env.command()
        .args(["status", "1", "eaten"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown status"));
}

#[test]
fn test_invalid_config_exit_code() {
    let env = TestEnv::new();
    std::fs::create_dir_all(&env.data_dir).unwrap();
    std::fs::write(
        env.data_dir.join("config.yaml"),
        "allocation:\n  max_group_size: 9\n",
    )
    .unwrap();

    env.command().args(["layout", "tables"]).assert().code(7);
}

#[test]
fn test_configured_output_format() {
    let env = TestEnv::new();
    env.import_standard_layout();
    std::fs::write(env.data_dir.join("config.yaml"), "output_format: csv\n").unwrap();

    env.command()
        .args(["layout", "tables"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("id,number,capacity,joinable,available"));
}

#[test]
fn test_configured_duration_applies() {
    let env = TestEnv::new();
    env.import_standard_layout();
    std::fs::write(
        env.data_dir.join("config.yaml"),
        "default_duration_minutes: 45\n",
    )
    .unwrap();

    env.reserve("19:00", 6, &[]);
    let reservations = env.list_json();
    assert_eq!(reservations[0]["window"]["duration_minutes"], 45);
}

#[test]
fn test_quiet_flag_keeps_id_only() {
    let env = TestEnv::new();
    env.import_standard_layout();

    env.command()
        .args(["--quiet", "reserve", "--date", SERVICE_DATE, "--time", "19:00"])
        .args(["--party", "2", "--guest", "Quiet"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\d+\n$").unwrap())
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_completions_generate() {
    let env = TestEnv::new();
    env.command_bare()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("maitre"));
}
