//! Database schema management and migrations.
//!
//! This module handles database schema initialization and version checking.

use rusqlite::Connection;

use crate::error::{Error, Result};

use super::schema::{
    CREATE_ASSIGNMENT_TABLE_INDEX, CREATE_CUSTOMERS_TABLE, CREATE_GUESTS_TABLE,
    CREATE_LOG_RESERVATION_INDEX, CREATE_METADATA_TABLE, CREATE_RESERVATIONS_TABLE,
    CREATE_RESERVATION_DATE_INDEX, CREATE_RESERVATION_LOGS_TABLE,
    CREATE_RESERVATION_STATUS_INDEX, CREATE_RESERVATION_TABLES_TABLE, CREATE_TABLES_TABLE,
    CREATE_TABLE_JOINS_TABLE, CURRENT_SCHEMA_VERSION, INSERT_SCHEMA_VERSION,
    SELECT_SCHEMA_VERSION,
};

/// Initializes the database schema.
///
/// This function creates all tables, indices, and metadata for a fresh
/// database. It should only be called on a database that has not been
/// initialized yet.
///
/// # Errors
///
/// Returns an error if any SQL statement fails to execute.
///
/// # Examples
///
/// ```
/// use rusqlite::Connection;
/// use maitre::database::migrations::initialize_schema;
///
/// let conn = Connection::open_in_memory().unwrap();
/// initialize_schema(&conn).unwrap();
/// ```
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_METADATA_TABLE, [])?;

    for statement in [
        CREATE_TABLES_TABLE,
        CREATE_TABLE_JOINS_TABLE,
        CREATE_CUSTOMERS_TABLE,
        CREATE_GUESTS_TABLE,
        CREATE_RESERVATIONS_TABLE,
        CREATE_RESERVATION_TABLES_TABLE,
        CREATE_RESERVATION_LOGS_TABLE,
    ] {
        conn.execute(statement, [])?;
    }

    for index in [
        CREATE_RESERVATION_DATE_INDEX,
        CREATE_RESERVATION_STATUS_INDEX,
        CREATE_ASSIGNMENT_TABLE_INDEX,
        CREATE_LOG_RESERVATION_INDEX,
    ] {
        conn.execute(index, [])?;
    }

    conn.execute(INSERT_SCHEMA_VERSION, [CURRENT_SCHEMA_VERSION])?;

    log::debug!("initialized schema version {CURRENT_SCHEMA_VERSION}");
    Ok(())
}

/// Gets the current schema version from the database.
///
/// # Errors
///
/// Returns an error if the query fails for reasons other than
/// "no rows returned" (which indicates version 0).
///
/// # Returns
///
/// - `Ok(0)` if the metadata table doesn't exist or has no version
/// - `Ok(version)` if a version is found
/// - `Err(_)` if a database error occurs
pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    match conn.query_row(SELECT_SCHEMA_VERSION, [], |row| {
        let value: String = row.get(0)?;
        value
            .parse::<i32>()
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
    }) {
        Ok(version) => Ok(version),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => {
            // "no such table" surfaces as a generic SQLite error
            if let rusqlite::Error::SqliteFailure(ref sqlite_err, _) = e {
                if sqlite_err.code == rusqlite::ErrorCode::Unknown {
                    return Ok(0);
                }
            }
            Err(e.into())
        }
    }
}

/// Checks schema compatibility and initializes if needed.
///
/// This function:
/// 1. Checks the current schema version
/// 2. If version is 0, initializes the schema
/// 3. If version differs from the current one, returns an error
/// 4. If version matches, returns success
///
/// # Errors
///
/// Returns [`Error::UnsupportedSchemaVersion`] if the stored version is not
/// the one this build understands, or a database error if a query fails.
///
/// # Examples
///
/// ```
/// use rusqlite::Connection;
/// use maitre::database::migrations::check_schema_compatibility;
///
/// let conn = Connection::open_in_memory().unwrap();
/// check_schema_compatibility(&conn).unwrap();
/// ```
pub fn check_schema_compatibility(conn: &Connection) -> Result<()> {
    let version = get_schema_version(conn)?;

    if version == 0 {
        initialize_schema(conn)?;
    } else if version != CURRENT_SCHEMA_VERSION {
        return Err(Error::UnsupportedSchemaVersion {
            expected: CURRENT_SCHEMA_VERSION,
            found: version,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_connection() -> Connection {
        Connection::open_in_memory().unwrap()
    }

    #[test]
    fn test_initialize_schema() {
        let conn = create_test_connection();
        initialize_schema(&conn).unwrap();

        let version = get_schema_version(&conn).unwrap();
        assert_eq!(version, CURRENT_SCHEMA_VERSION);

        for table in [
            "restaurant_tables",
            "table_joins",
            "customers",
            "guests",
            "reservations",
            "reservation_tables",
            "reservation_logs",
        ] {
            let count: i32 = conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                    row.get(0)
                })
                .unwrap();
            assert_eq!(count, 0, "{table} should start empty");
        }
    }

    #[test]
    fn test_get_schema_version_uninitialized() {
        let conn = create_test_connection();
        assert_eq!(get_schema_version(&conn).unwrap(), 0);
    }

    #[test]
    fn test_check_schema_compatibility_fresh_database() {
        let conn = create_test_connection();
        check_schema_compatibility(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_check_schema_compatibility_current_version() {
        let conn = create_test_connection();
        initialize_schema(&conn).unwrap();
        check_schema_compatibility(&conn).unwrap();
    }

    #[test]
    fn test_check_schema_compatibility_newer_version() {
        let conn = create_test_connection();
        initialize_schema(&conn).unwrap();

        conn.execute(
            "UPDATE metadata SET value = '999' WHERE key = 'schema_version'",
            [],
        )
        .unwrap();

        let err = check_schema_compatibility(&conn).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedSchemaVersion {
                expected: CURRENT_SCHEMA_VERSION,
                found: 999
            }
        ));
    }

    #[test]
    fn test_schema_creates_all_indices() {
        let conn = create_test_connection();
        initialize_schema(&conn).unwrap();

        let index_count: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name LIKE 'idx_reservations_%'",
                [],
                |row| row.get(0),
            )
            .unwrap();

        assert_eq!(index_count, 4);
    }

    #[test]
    fn test_join_pairs_must_be_normalised() {
        let conn = create_test_connection();
        initialize_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO restaurant_tables (restaurant_id, number, capacity, joinable) VALUES (1, 1, 2, 1), (1, 2, 2, 1)",
            [],
        )
        .unwrap();

        let reversed = conn.execute(
            "INSERT INTO table_joins (table_a, table_b, total_capacity) VALUES (2, 1, 4)",
            [],
        );
        assert!(reversed.is_err());
    }
}
