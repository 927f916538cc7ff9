//! Database layer for persistent storage of tables and reservations.
//!
//! This module provides a SQLite-based store: connection management, schema
//! versioning, query helpers and the retrying transaction helper every write
//! goes through.
//!
//! # Examples
//!
//! ```no_run
//! use maitre::database::{Database, DatabaseConfig};
//! use maitre::NewTable;
//!
//! let mut db = Database::open(DatabaseConfig::new("/tmp/maitre.db")).unwrap();
//!
//! db.with_transaction(|tx| {
//!     let a = Database::insert_table(tx, 1, &NewTable::new(1, 2).joinable(true))?;
//!     let b = Database::insert_table(tx, 1, &NewTable::new(2, 2).joinable(true))?;
//!     Database::insert_join(tx, a.id(), b.id())
//! })
//! .unwrap();
//!
//! for table in Database::list_tables(db.connection(), 1).unwrap() {
//!     println!("{table}");
//! }
//! ```

mod config;
mod connection;
pub mod migrations;
mod operations;
mod schema;
mod transaction;

#[cfg(test)]
pub(crate) mod test_util;

pub use config::{
    default_data_dir, resolve_data_dir, resolve_database_path, DatabaseConfig, DATABASE_FILE_NAME,
    DATA_DIR_ENV,
};
pub use connection::Database;
pub use operations::TableOccupancy;

pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};
