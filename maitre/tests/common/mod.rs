//! Common test utilities for integration tests.
//!
//! Fixtures for building a floor plan in a throwaway database and for
//! driving the reservation service against it.

#![allow(dead_code)]

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use tempfile::TempDir;

use maitre::clock::FixedClock;
use maitre::{Database, DatabaseConfig, NewTable, Party, Table, TableJoin, TimeWindow};

/// Restaurant used by every fixture.
pub const RESTAURANT: i64 = 1;

/// A database in a temporary directory that lives as long as the fixture.
pub struct TestDb {
    /// Keeps the directory alive.
    pub dir: TempDir,
    /// The open database.
    pub db: Database,
}

/// Opens a fresh database.
pub fn open_database() -> TestDb {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(DatabaseConfig::new(dir.path().join("maitre.db"))).unwrap();
    TestDb { dir, db }
}

/// The service date used by the scenarios.
pub fn service_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
}

/// A window on [`service_date`].
pub fn window(hour: u32, minute: u32, duration: u32) -> TimeWindow {
    TimeWindow::new(
        service_date(),
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap(),
        duration,
    )
    .unwrap()
}

/// Inserts `(number, capacity, joinable)` tables into [`RESTAURANT`].
pub fn seed_tables(db: &Database, tables: &[(u32, u32, bool)]) -> Vec<Table> {
    tables
        .iter()
        .map(|&(number, capacity, joinable)| {
            let table = NewTable::new(number, capacity).joinable(joinable);
            Database::insert_table(db.connection(), RESTAURANT, &table).unwrap()
        })
        .collect()
}

/// Configures a join between two tables.
pub fn join(db: &Database, a: &Table, b: &Table) -> TableJoin {
    Database::insert_join(db.connection(), a.id(), b.id()).unwrap()
}

/// Inserts a guest with an email address.
pub fn guest(db: &Database, name: &str) -> Party {
    let email = format!("{}@example.com", name.to_lowercase());
    Database::insert_guest(db.connection(), name, Some(&email)).unwrap()
}

/// A clock that advances one second per reading.
pub fn ticking_clock() -> FixedClock {
    FixedClock::new(start_of_day()).with_step(Duration::seconds(1))
}

/// Midnight UTC on the first of the month before [`service_date`].
pub fn start_of_day() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap()
}
