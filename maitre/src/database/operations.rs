//! Database CRUD and query operations.
//!
//! Every helper here takes a `&Connection` so it can run either directly on
//! [`Database::connection`] or inside [`Database::with_transaction`]. None of
//! them open a transaction of their own.

use std::collections::HashMap;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use crate::error::{Error, Result};
use crate::reservation::{
    ActorId, CustomerId, GuestId, LogEntry, Party, Reservation, ReservationAction,
    ReservationId, ReservationStatus, TimeWindow, MAX_DURATION_MINUTES,
};
use crate::table::{NewTable, RestaurantId, Table, TableId, TableJoin};

use super::connection::Database;
use super::schema::{INSERT_ASSIGNMENT, INSERT_LOG, INSERT_RESERVATION};

/// One table held by one non-cancelled reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableOccupancy {
    /// The reservation holding the table.
    pub reservation_id: ReservationId,
    /// The held table.
    pub table_id: TableId,
    /// When the table is held.
    pub window: TimeWindow,
}

const TABLE_COLUMNS: &str = "id, restaurant_id, number, capacity, joinable, available";

const RESERVATION_COLUMNS: &str = r"
    id, restaurant_id, reservation_date, start_time, duration_minutes, party_size, status,
    customer_id, guest_id, notes, walk_in, created_at, created_by
";

const INSERT_TABLE: &str = r"
    INSERT INTO restaurant_tables (restaurant_id, number, capacity, joinable, available)
    VALUES (?, ?, ?, ?, ?)
";

const SELECT_JOINS: &str = r"
    SELECT j.table_a, j.table_b, j.total_capacity
    FROM table_joins j
    JOIN restaurant_tables t ON t.id = j.table_a
    WHERE t.restaurant_id = ?
    ORDER BY j.total_capacity, j.table_a, j.table_b
";

const SELECT_OCCUPANCY: &str = r"
    SELECT r.id, rt.table_id, r.reservation_date, r.start_time, r.duration_minutes
    FROM reservations r
    JOIN reservation_tables rt ON rt.reservation_id = r.id
    WHERE r.restaurant_id = ?
      AND r.status <> 'cancelled'
      AND r.reservation_date BETWEEN ? AND ?
    ORDER BY r.reservation_date, r.start_time, r.id, rt.table_id
";

const SELECT_PENDING: &str = r"
    FROM reservations
    WHERE status = 'pending'
    ORDER BY created_at, id
";

const SELECT_LOGS: &str = r"
    SELECT id, reservation_id, action, detail, actor, created_at
    FROM reservation_logs
    WHERE reservation_id = ?
    ORDER BY id
";

fn conversion_error<E>(err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::ToSqlConversionFailure(Box::new(err))
}

/// Deserializes a table from a row selected with [`TABLE_COLUMNS`].
fn row_to_table(row: &rusqlite::Row<'_>) -> rusqlite::Result<Table> {
    let id: TableId = row.get(0)?;
    let restaurant_id: RestaurantId = row.get(1)?;
    let number: u32 = row.get(2)?;
    let capacity: u32 = row.get(3)?;
    let joinable: bool = row.get(4)?;
    let available: bool = row.get(5)?;

    Table::new(id, restaurant_id, number, capacity)
        .map(|table| table.joinable(joinable).available(available))
        .map_err(conversion_error)
}

fn row_to_join(row: &rusqlite::Row<'_>) -> rusqlite::Result<TableJoin> {
    let a: TableId = row.get(0)?;
    let b: TableId = row.get(1)?;
    let total: u32 = row.get(2)?;
    TableJoin::new(a, b, total).map_err(conversion_error)
}

/// Deserializes a reservation (without its tables) from a row selected with
/// [`RESERVATION_COLUMNS`].
fn row_to_reservation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reservation> {
    let id: ReservationId = row.get(0)?;
    let restaurant_id: RestaurantId = row.get(1)?;
    let date: NaiveDate = row.get(2)?;
    let time: NaiveTime = row.get(3)?;
    let duration: u32 = row.get(4)?;
    let party_size: u32 = row.get(5)?;
    let status: String = row.get(6)?;
    let customer_id: Option<CustomerId> = row.get(7)?;
    let guest_id: Option<GuestId> = row.get(8)?;
    let notes: Option<String> = row.get(9)?;
    let walk_in: bool = row.get(10)?;
    let created_at: DateTime<Utc> = row.get(11)?;
    let created_by: ActorId = row.get(12)?;

    let status: ReservationStatus = status.parse().map_err(conversion_error)?;
    let party = Party::from_columns(customer_id, guest_id).map_err(conversion_error)?;
    let window = TimeWindow::new(date, time, duration).map_err(conversion_error)?;

    Reservation::builder(restaurant_id, party, window, party_size)
        .id(id)
        .status(status)
        .notes(notes)
        .walk_in(walk_in)
        .created_at(created_at)
        .created_by(created_by)
        .build()
        .map_err(conversion_error)
}

fn row_to_log_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<LogEntry> {
    let action: String = row.get(2)?;
    Ok(LogEntry {
        id: row.get(0)?,
        reservation_id: row.get(1)?,
        action: action.parse().map_err(conversion_error)?,
        detail: row.get(3)?,
        actor: row.get(4)?,
        created_at: row.get(5)?,
    })
}

impl Database {
    // Tables ---------------------------------------------------------------

    /// Inserts a table for a restaurant.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the definition is invalid or the table
    /// number is already used in the restaurant.
    pub fn insert_table(
        conn: &Connection,
        restaurant_id: RestaurantId,
        table: &NewTable,
    ) -> Result<Table> {
        table.validate()?;

        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM restaurant_tables WHERE restaurant_id = ? AND number = ?)",
            params![restaurant_id, table.number],
            |row| row.get(0),
        )?;
        if exists {
            return Err(Error::validation(
                "number",
                format!(
                    "table #{} already exists in restaurant {restaurant_id}",
                    table.number
                ),
            ));
        }

        conn.execute(
            INSERT_TABLE,
            params![
                restaurant_id,
                table.number,
                table.capacity,
                table.joinable,
                table.available
            ],
        )?;

        let id = conn.last_insert_rowid();
        Ok(Table::new(id, restaurant_id, table.number, table.capacity)?
            .joinable(table.joinable)
            .available(table.available))
    }

    /// Fetches a table by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_table(conn: &Connection, id: TableId) -> Result<Option<Table>> {
        let sql = format!("SELECT {TABLE_COLUMNS} FROM restaurant_tables WHERE id = ?");
        Ok(conn.query_row(&sql, [id], row_to_table).optional()?)
    }

    /// Lists every table of a restaurant ordered by number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_tables(conn: &Connection, restaurant_id: RestaurantId) -> Result<Vec<Table>> {
        let sql = format!(
            "SELECT {TABLE_COLUMNS} FROM restaurant_tables WHERE restaurant_id = ? ORDER BY number"
        );
        let mut stmt = conn.prepare(&sql)?;
        let tables = stmt
            .query_map([restaurant_id], row_to_table)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tables)
    }

    /// Lists the tables of a restaurant flagged available, ordered by
    /// capacity then id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_available_tables(
        conn: &Connection,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<Table>> {
        let sql = format!(
            "SELECT {TABLE_COLUMNS} FROM restaurant_tables
             WHERE restaurant_id = ? AND available = 1
             ORDER BY capacity, id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let tables = stmt
            .query_map([restaurant_id], row_to_table)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tables)
    }

    /// Fetches several tables by id, in the order given.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for the first id that does not exist.
    pub fn get_tables(conn: &Connection, ids: &[TableId]) -> Result<Vec<Table>> {
        ids.iter()
            .map(|&id| {
                Self::get_table(conn, id)?.ok_or_else(|| Error::not_found(format!("table {id}")))
            })
            .collect()
    }

    /// Marks a table available or unavailable.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the table exists
    /// - `Ok(false)` if it does not
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn set_table_available(conn: &Connection, id: TableId, available: bool) -> Result<bool> {
        let rows = conn.execute(
            "UPDATE restaurant_tables SET available = ? WHERE id = ?",
            params![available, id],
        )?;
        Ok(rows > 0)
    }

    /// Deletes a table that no reservation references.
    ///
    /// Joins the table belongs to are removed with it.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the table was deleted
    /// - `Ok(false)` if it did not exist
    ///
    /// # Errors
    ///
    /// Returns a validation error if any reservation is assigned to the table.
    pub fn delete_table(conn: &Connection, id: TableId) -> Result<bool> {
        let references: i64 = conn.query_row(
            "SELECT COUNT(*) FROM reservation_tables WHERE table_id = ?",
            [id],
            |row| row.get(0),
        )?;
        if references > 0 {
            return Err(Error::validation(
                "table",
                format!("table {id} is referenced by {references} reservation(s)"),
            ));
        }

        conn.execute(
            "DELETE FROM table_joins WHERE table_a = ?1 OR table_b = ?1",
            [id],
        )?;
        let rows = conn.execute("DELETE FROM restaurant_tables WHERE id = ?", [id])?;
        Ok(rows > 0)
    }

    // Joins ----------------------------------------------------------------

    /// Configures a join between two tables.
    ///
    /// The total capacity is computed from the two members.
    ///
    /// # Errors
    ///
    /// Returns an error if either table does not exist, the tables are the
    /// same, belong to different restaurants, either is not joinable, or the
    /// pair is already configured.
    pub fn insert_join(conn: &Connection, a: TableId, b: TableId) -> Result<TableJoin> {
        let first = Self::get_table(conn, a)?.ok_or_else(|| Error::not_found(format!("table {a}")))?;
        let second =
            Self::get_table(conn, b)?.ok_or_else(|| Error::not_found(format!("table {b}")))?;

        if first.restaurant_id() != second.restaurant_id() {
            return Err(Error::validation(
                "table_join",
                format!("tables {a} and {b} belong to different restaurants"),
            ));
        }
        for table in [&first, &second] {
            if !table.is_joinable() {
                return Err(Error::validation(
                    "table_join",
                    format!("table {} is not joinable", table.id()),
                ));
            }
        }

        let join = TableJoin::new(a, b, first.capacity() + second.capacity())?;
        let (low, high) = join.tables();

        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM table_joins WHERE table_a = ? AND table_b = ?)",
            params![low, high],
            |row| row.get(0),
        )?;
        if exists {
            return Err(Error::validation(
                "table_join",
                format!("tables {low} and {high} are already joined"),
            ));
        }

        conn.execute(
            "INSERT INTO table_joins (table_a, table_b, total_capacity) VALUES (?, ?, ?)",
            params![low, high, join.total_capacity()],
        )?;
        Ok(join)
    }

    /// Lists the configured joins of a restaurant ordered by total capacity.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_joins(conn: &Connection, restaurant_id: RestaurantId) -> Result<Vec<TableJoin>> {
        let mut stmt = conn.prepare(SELECT_JOINS)?;
        let joins = stmt
            .query_map([restaurant_id], row_to_join)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(joins)
    }

    // Parties --------------------------------------------------------------

    /// Inserts a registered customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or the insert fails.
    pub fn insert_customer(conn: &Connection, name: &str, email: Option<&str>) -> Result<Party> {
        let name = non_empty_name(name)?;
        conn.execute(
            "INSERT INTO customers (name, email) VALUES (?, ?)",
            params![name, email],
        )?;
        Ok(Party::Customer(conn.last_insert_rowid()))
    }

    /// Inserts a guest.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or the insert fails.
    pub fn insert_guest(conn: &Connection, name: &str, email: Option<&str>) -> Result<Party> {
        let name = non_empty_name(name)?;
        conn.execute(
            "INSERT INTO guests (name, email) VALUES (?, ?)",
            params![name, email],
        )?;
        Ok(Party::Guest(conn.last_insert_rowid()))
    }

    /// Looks up the name and email address of a party.
    ///
    /// # Returns
    ///
    /// - `Ok(Some((name, email)))` if the party exists
    /// - `Ok(None)` if it does not
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_party_contact(
        conn: &Connection,
        party: Party,
    ) -> Result<Option<(String, Option<String>)>> {
        let (sql, id) = match party {
            Party::Customer(id) => ("SELECT name, email FROM customers WHERE id = ?", id),
            Party::Guest(id) => ("SELECT name, email FROM guests WHERE id = ?", id),
        };
        Ok(conn
            .query_row(sql, [id], |row| Ok((row.get(0)?, row.get(1)?)))
            .optional()?)
    }

    // Reservations ---------------------------------------------------------

    /// Inserts a reservation row and its table assignments.
    ///
    /// The id and table ids stored on `reservation` are ignored; the stored
    /// reservation is returned with the new id and `table_ids`.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails.
    pub fn insert_reservation(
        conn: &Connection,
        reservation: &Reservation,
        table_ids: &[TableId],
    ) -> Result<Reservation> {
        let window = reservation.window();
        conn.execute(
            INSERT_RESERVATION,
            params![
                reservation.restaurant_id(),
                window.date(),
                window.time(),
                window.duration_minutes(),
                reservation.party_size(),
                reservation.status().as_str(),
                reservation.party().customer_id(),
                reservation.party().guest_id(),
                reservation.notes(),
                reservation.walk_in(),
                reservation.created_at(),
                reservation.created_by(),
            ],
        )?;
        let id = conn.last_insert_rowid();

        Self::insert_assignments(conn, id, table_ids)?;

        Self::get_reservation(conn, id)?
            .ok_or_else(|| Error::not_found(format!("reservation {id}")))
    }

    /// Inserts one assignment row per table.
    ///
    /// # Errors
    ///
    /// Returns an error if an insert fails, including when a table is
    /// already assigned to the reservation.
    pub fn insert_assignments(
        conn: &Connection,
        reservation_id: ReservationId,
        table_ids: &[TableId],
    ) -> Result<()> {
        let mut stmt = conn.prepare(INSERT_ASSIGNMENT)?;
        for table_id in table_ids {
            stmt.execute(params![reservation_id, table_id])?;
        }
        Ok(())
    }

    /// Removes every assignment of a reservation.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_assignments(conn: &Connection, reservation_id: ReservationId) -> Result<usize> {
        Ok(conn.execute(
            "DELETE FROM reservation_tables WHERE reservation_id = ?",
            [reservation_id],
        )?)
    }

    /// Returns the tables assigned to a reservation, ascending.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_assigned_tables(
        conn: &Connection,
        reservation_id: ReservationId,
    ) -> Result<Vec<TableId>> {
        let mut stmt = conn.prepare(
            "SELECT table_id FROM reservation_tables WHERE reservation_id = ? ORDER BY table_id",
        )?;
        let ids = stmt
            .query_map([reservation_id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<TableId>>>()?;
        Ok(ids)
    }

    /// Fetches a reservation with its assigned tables.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_reservation(conn: &Connection, id: ReservationId) -> Result<Option<Reservation>> {
        let sql = format!("SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = ?");
        let Some(reservation) = conn.query_row(&sql, [id], row_to_reservation).optional()? else {
            return Ok(None);
        };
        let tables = Self::get_assigned_tables(conn, id)?;
        Ok(Some(with_tables(reservation, tables)?))
    }

    /// Lists a restaurant's reservations on a date, ordered by start time.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_reservations(
        conn: &Connection,
        restaurant_id: RestaurantId,
        date: NaiveDate,
    ) -> Result<Vec<Reservation>> {
        let sql = format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations
             WHERE restaurant_id = ? AND reservation_date = ?
             ORDER BY start_time, id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![restaurant_id, date], row_to_reservation)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Self::attach_tables(conn, rows)
    }

    /// Lists every pending reservation in creation order (then id).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_pending_reservations(conn: &Connection) -> Result<Vec<Reservation>> {
        let sql = format!("SELECT {RESERVATION_COLUMNS} {SELECT_PENDING}");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], row_to_reservation)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Self::attach_tables(conn, rows)
    }

    fn attach_tables(conn: &Connection, rows: Vec<Reservation>) -> Result<Vec<Reservation>> {
        if rows.is_empty() {
            return Ok(rows);
        }

        let placeholders = vec!["?"; rows.len()].join(", ");
        let sql = format!(
            "SELECT reservation_id, table_id FROM reservation_tables
             WHERE reservation_id IN ({placeholders})
             ORDER BY table_id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut by_reservation: HashMap<ReservationId, Vec<TableId>> = HashMap::new();
        let pairs = stmt.query_map(params_from_iter(rows.iter().map(Reservation::id)), |row| {
            Ok((row.get::<_, ReservationId>(0)?, row.get::<_, TableId>(1)?))
        })?;
        for pair in pairs {
            let (reservation_id, table_id) = pair?;
            by_reservation.entry(reservation_id).or_default().push(table_id);
        }

        rows.into_iter()
            .map(|reservation| {
                let tables = by_reservation.remove(&reservation.id()).unwrap_or_default();
                with_tables(reservation, tables)
            })
            .collect()
    }

    /// Sets a reservation's status.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the reservation exists
    /// - `Ok(false)` if it does not
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn set_reservation_status(
        conn: &Connection,
        id: ReservationId,
        status: ReservationStatus,
    ) -> Result<bool> {
        let rows = conn.execute(
            "UPDATE reservations SET status = ? WHERE id = ?",
            params![status.as_str(), id],
        )?;
        Ok(rows > 0)
    }

    /// Returns every table hold of a restaurant's non-cancelled reservations
    /// dated between `from` and `to` inclusive.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_table_occupancy(
        conn: &Connection,
        restaurant_id: RestaurantId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<TableOccupancy>> {
        let mut stmt = conn.prepare(SELECT_OCCUPANCY)?;
        let rows = stmt
            .query_map(params![restaurant_id, from, to], |row| {
                let date: NaiveDate = row.get(2)?;
                let time: NaiveTime = row.get(3)?;
                let duration: u32 = row.get(4)?;
                Ok(TableOccupancy {
                    reservation_id: row.get(0)?,
                    table_id: row.get(1)?,
                    window: TimeWindow::new(date, time, duration).map_err(conversion_error)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Returns the holds that overlap `window`.
    ///
    /// Windows are at most [`MAX_DURATION_MINUTES`] long, so any hold that
    /// overlaps starts between the day before `window` starts and the day
    /// `window` ends.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_overlapping_occupancy(
        conn: &Connection,
        restaurant_id: RestaurantId,
        window: &TimeWindow,
    ) -> Result<Vec<TableOccupancy>> {
        let lookback = u64::from(MAX_DURATION_MINUTES.div_ceil(24 * 60));
        let date = window.date();
        let from = date.checked_sub_days(Days::new(lookback)).unwrap_or(date);
        let to = window.end().date();

        Ok(Self::list_table_occupancy(conn, restaurant_id, from, to)?
            .into_iter()
            .filter(|hold| hold.window.overlaps(window))
            .collect())
    }

    // Audit log ------------------------------------------------------------

    /// Appends an audit entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn append_log(
        conn: &Connection,
        reservation_id: ReservationId,
        action: ReservationAction,
        detail: &str,
        actor: ActorId,
        at: DateTime<Utc>,
    ) -> Result<i64> {
        conn.execute(
            INSERT_LOG,
            params![reservation_id, action.as_str(), detail, actor, at],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Lists a reservation's audit entries, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_logs(conn: &Connection, reservation_id: ReservationId) -> Result<Vec<LogEntry>> {
        let mut stmt = conn.prepare(SELECT_LOGS)?;
        let entries = stmt
            .query_map([reservation_id], row_to_log_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }
}

fn non_empty_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("name", "name must be non-empty"));
    }
    Ok(trimmed)
}

fn with_tables(reservation: Reservation, tables: Vec<TableId>) -> Result<Reservation> {
    let window = *reservation.window();
    Ok(Reservation::builder(
        reservation.restaurant_id(),
        reservation.party(),
        window,
        reservation.party_size(),
    )
    .id(reservation.id())
    .status(reservation.status())
    .notes(reservation.notes().map(str::to_string))
    .walk_in(reservation.walk_in())
    .created_at(reservation.created_at())
    .created_by(reservation.created_by())
    .table_ids(tables)
    .build()?)
}
