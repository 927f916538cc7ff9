//! Integration tests for configuration layering.
//!
//! Files are discovered from a working directory (`maitre.yaml`,
//! `maitre.local.yaml`) and a data directory (`config.yaml`); MAITRE_*
//! variables override files, and programmatic overrides win over both.
//!
//! Tests that modify environment variables are marked with `#[serial]`.

use serial_test::serial;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

use maitre::config::{Config, ConfigBuilder, OutputFormat};
use maitre::error::Error;
use maitre::AllocationConfig;

/// RAII guard for setting and restoring environment variables.
struct EnvGuard {
    key: &'static str,
    old_value: Option<String>,
}

impl EnvGuard {
    fn set(key: &'static str, value: &str) -> Self {
        let old_value = env::var(key).ok();
        env::set_var(key, value);
        Self { key, old_value }
    }

    fn remove(key: &'static str) -> Self {
        let old_value = env::var(key).ok();
        env::remove_var(key);
        Self { key, old_value }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.old_value {
            Some(val) => env::set_var(self.key, val),
            None => env::remove_var(self.key),
        }
    }
}

fn clear_maitre_env() -> Vec<EnvGuard> {
    [
        "MAITRE_MAX_GROUP_SIZE",
        "MAITRE_PERMISSIVE_FALLBACK",
        "MAITRE_DEFAULT_DURATION_MINUTES",
        "MAITRE_DISABLE_NOTIFICATIONS",
        "MAITRE_DISABLE_AUTOINIT",
        "MAITRE_MAXIMUM_LOCK_WAIT_SECONDS",
        "MAITRE_OUTPUT_FORMAT",
    ]
    .into_iter()
    .map(EnvGuard::remove)
    .collect()
}

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

struct Dirs {
    _root: TempDir,
    work: std::path::PathBuf,
    data: std::path::PathBuf,
}

fn dirs() -> Dirs {
    let root = TempDir::new().unwrap();
    let work = root.path().join("site/dining-room");
    let data = root.path().join("data");
    fs::create_dir_all(&work).unwrap();
    fs::create_dir_all(&data).unwrap();
    Dirs {
        _root: root,
        work,
        data,
    }
}

fn build(dirs: &Dirs) -> maitre::Result<Config> {
    ConfigBuilder::new()
        .with_working_dir(&dirs.work)
        .with_data_dir(&dirs.data)
        .build()
}

#[test]
#[serial]
fn test_defaults_without_files() {
    let _env = clear_maitre_env();
    let dirs = dirs();

    let config = build(&dirs).unwrap();
    assert_eq!(config.allocation_config(), AllocationConfig::default());
    assert_eq!(config.default_duration_minutes(), 90);
    assert!(config.notifications_enabled());
}

#[test]
#[serial]
fn test_file_precedence() {
    let _env = clear_maitre_env();
    let dirs = dirs();

    write(
        &dirs.data,
        "config.yaml",
        "default_duration_minutes: 60\noutput_format: csv\nallocation:\n  max_group_size: 2\n",
    );
    write(
        &dirs.work,
        "maitre.yaml",
        "default_duration_minutes: 75\nallocation:\n  permissive_fallback: false\n",
    );
    write(&dirs.work, "maitre.local.yaml", "default_duration_minutes: 120\n");

    let config = build(&dirs).unwrap();
    assert_eq!(config.default_duration_minutes(), 120);
    assert_eq!(config.output_format, Some(OutputFormat::Csv));
    assert_eq!(
        config.allocation_config(),
        AllocationConfig {
            max_group_size: 2,
            permissive_fallback: false,
        }
    );
}

#[test]
#[serial]
fn test_site_file_found_in_parent() {
    let _env = clear_maitre_env();
    let dirs = dirs();
    let parent = dirs.work.parent().unwrap();
    write(parent, "maitre.yaml", "disable_notifications: true\n");

    let config = build(&dirs).unwrap();
    assert!(!config.notifications_enabled());
}

#[test]
#[serial]
fn test_environment_beats_files() {
    let _env = clear_maitre_env();
    let dirs = dirs();
    write(&dirs.work, "maitre.yaml", "maximum_lock_wait_seconds: 2\n");

    let _wait = EnvGuard::set("MAITRE_MAXIMUM_LOCK_WAIT_SECONDS", "9");
    let _fallback = EnvGuard::set("MAITRE_PERMISSIVE_FALLBACK", "off");

    let config = build(&dirs).unwrap();
    assert_eq!(config.lock_wait(), Duration::from_secs(9));
    assert!(!config.allocation_config().permissive_fallback);
}

#[test]
#[serial]
fn test_programmatic_override_wins() {
    let _env = clear_maitre_env();
    let dirs = dirs();
    let _duration = EnvGuard::set("MAITRE_DEFAULT_DURATION_MINUTES", "45");

    let config = ConfigBuilder::new()
        .with_working_dir(&dirs.work)
        .with_data_dir(&dirs.data)
        .with_config(Config {
            default_duration_minutes: Some(150),
            ..Config::default()
        })
        .build()
        .unwrap();
    assert_eq!(config.default_duration_minutes(), 150);
}

#[test]
#[serial]
fn test_invalid_values_are_rejected() {
    let _env = clear_maitre_env();
    let dirs = dirs();

    write(&dirs.work, "maitre.yaml", "allocation:\n  max_group_size: 7\n");
    assert!(matches!(build(&dirs), Err(Error::Validation { .. })));

    write(&dirs.work, "maitre.yaml", "tables_per_party: 3\n");
    assert!(build(&dirs).is_err());

    write(&dirs.work, "maitre.yaml", "default_duration_minutes: 90\n");
    let _bad = EnvGuard::set("MAITRE_DISABLE_NOTIFICATIONS", "sometimes");
    assert!(matches!(build(&dirs), Err(Error::Validation { .. })));
}

#[test]
#[serial]
fn test_skip_sources() {
    let _env = clear_maitre_env();
    let dirs = dirs();
    write(&dirs.work, "maitre.yaml", "default_duration_minutes: 30\n");
    let _duration = EnvGuard::set("MAITRE_DEFAULT_DURATION_MINUTES", "45");

    let no_files = ConfigBuilder::new()
        .with_working_dir(&dirs.work)
        .skip_files()
        .build()
        .unwrap();
    assert_eq!(no_files.default_duration_minutes(), 45);

    let no_env = ConfigBuilder::new()
        .with_working_dir(&dirs.work)
        .skip_env()
        .build()
        .unwrap();
    assert_eq!(no_env.default_duration_minutes(), 30);
}
