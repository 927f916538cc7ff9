//! Shared test utilities for unit tests.
//!
//! This module provides helper functions used across multiple test modules.

use chrono::{NaiveDate, NaiveTime};
use tempfile::tempdir;

use crate::database::{Database, DatabaseConfig};
use crate::reservation::TimeWindow;

/// Creates a temporary test database that will be cleaned up automatically.
///
/// # Panics
///
/// Panics if the temporary directory or database cannot be created.
/// This is acceptable in test code where we want to fail fast.
#[must_use]
pub fn create_test_database() -> Database {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let config = DatabaseConfig::new(path);
    let db = Database::open(config).unwrap();

    // Prevent the TempDir from being dropped immediately
    std::mem::forget(dir);

    db
}

/// The service date used throughout the unit tests.
#[must_use]
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
}

/// A window on [`test_date`] starting at `hour:minute`.
///
/// # Panics
///
/// Panics on an invalid time or a zero duration.
#[must_use]
pub fn test_window(hour: u32, minute: u32, duration: u32) -> TimeWindow {
    TimeWindow::new(
        test_date(),
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap(),
        duration,
    )
    .unwrap()
}
