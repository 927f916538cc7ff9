//! Database schema definitions and SQL constants.
//!
//! This module contains all SQL table definitions, indices, and constants
//! related to the database schema for the maitre store.

/// Current schema version for the database.
///
/// This version is stored in the metadata table and is used to ensure
/// compatibility between the database and the application.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// SQL statement to create the metadata table.
///
/// The metadata table stores key-value pairs for database configuration
/// and versioning information.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// SQL statement to create the physical tables table.
///
/// Table numbers are unique per restaurant.
pub const CREATE_TABLES_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS restaurant_tables (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        restaurant_id INTEGER NOT NULL,
        number INTEGER NOT NULL CHECK (number > 0),
        capacity INTEGER NOT NULL CHECK (capacity > 0),
        joinable INTEGER NOT NULL DEFAULT 0,
        available INTEGER NOT NULL DEFAULT 1,
        UNIQUE (restaurant_id, number)
    )";

/// SQL statement to create the configured joins table.
///
/// Pairs are stored normalised (`table_a < table_b`), so the UNIQUE
/// constraint rejects a duplicate pair in either order.
pub const CREATE_TABLE_JOINS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS table_joins (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        table_a INTEGER NOT NULL REFERENCES restaurant_tables(id) ON DELETE CASCADE,
        table_b INTEGER NOT NULL REFERENCES restaurant_tables(id) ON DELETE CASCADE,
        total_capacity INTEGER NOT NULL CHECK (total_capacity > 0),
        CHECK (table_a < table_b),
        UNIQUE (table_a, table_b)
    )";

/// SQL statement to create the customers table.
pub const CREATE_CUSTOMERS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS customers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT
    )";

/// SQL statement to create the guests table.
pub const CREATE_GUESTS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS guests (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT
    )";

/// SQL statement to create the reservations table.
///
/// Exactly one of `customer_id` and `guest_id` is set. Dates are stored as
/// `YYYY-MM-DD` and times as `HH:MM:SS`, so text comparison orders them.
pub const CREATE_RESERVATIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS reservations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        restaurant_id INTEGER NOT NULL,
        reservation_date TEXT NOT NULL,
        start_time TEXT NOT NULL,
        duration_minutes INTEGER NOT NULL CHECK (duration_minutes > 0),
        party_size INTEGER NOT NULL CHECK (party_size > 0),
        status TEXT NOT NULL,
        customer_id INTEGER REFERENCES customers(id),
        guest_id INTEGER REFERENCES guests(id),
        notes TEXT,
        walk_in INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        created_by INTEGER NOT NULL,
        CHECK ((customer_id IS NULL) <> (guest_id IS NULL))
    )";

/// SQL statement to create the table assignment table.
pub const CREATE_RESERVATION_TABLES_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS reservation_tables (
        reservation_id INTEGER NOT NULL REFERENCES reservations(id) ON DELETE CASCADE,
        table_id INTEGER NOT NULL REFERENCES restaurant_tables(id),
        PRIMARY KEY (reservation_id, table_id)
    )";

/// SQL statement to create the audit log table.
pub const CREATE_RESERVATION_LOGS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS reservation_logs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        reservation_id INTEGER NOT NULL REFERENCES reservations(id) ON DELETE CASCADE,
        action TEXT NOT NULL,
        detail TEXT NOT NULL,
        actor INTEGER NOT NULL,
        created_at TEXT NOT NULL
    )";

/// Index used by the availability filter and the per-day listing.
pub const CREATE_RESERVATION_DATE_INDEX: &str = r"
    CREATE INDEX IF NOT EXISTS idx_reservations_restaurant_date
    ON reservations(restaurant_id, reservation_date)";

/// Index used by the FIFO sweep.
pub const CREATE_RESERVATION_STATUS_INDEX: &str = r"
    CREATE INDEX IF NOT EXISTS idx_reservations_status_created
    ON reservations(status, created_at, id)";

/// Index for looking up the reservations holding a table.
pub const CREATE_ASSIGNMENT_TABLE_INDEX: &str = r"
    CREATE INDEX IF NOT EXISTS idx_reservations_assignment_table
    ON reservation_tables(table_id)";

/// Index for reading a reservation's audit trail.
pub const CREATE_LOG_RESERVATION_INDEX: &str = r"
    CREATE INDEX IF NOT EXISTS idx_reservations_log_reservation
    ON reservation_logs(reservation_id)";

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version in the metadata table.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";

/// SQL statement to insert a reservation.
pub const INSERT_RESERVATION: &str = r"
    INSERT INTO reservations
    (restaurant_id, reservation_date, start_time, duration_minutes, party_size, status,
     customer_id, guest_id, notes, walk_in, created_at, created_by)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";

/// SQL statement to insert one table assignment.
pub const INSERT_ASSIGNMENT: &str =
    "INSERT INTO reservation_tables (reservation_id, table_id) VALUES (?, ?)";

/// SQL statement to append an audit log entry.
pub const INSERT_LOG: &str = r"
    INSERT INTO reservation_logs (reservation_id, action, detail, actor, created_at)
    VALUES (?, ?, ?, ?, ?)
";
