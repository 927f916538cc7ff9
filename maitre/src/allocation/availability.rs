//! Which tables are free for a time window.

use rusqlite::Connection;

use crate::database::{Database, TableOccupancy};
use crate::error::Result;
use crate::reservation::TimeWindow;
use crate::table::{RestaurantId, Table};

/// Tables of a restaurant that can take a booking for one window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreeTables {
    /// How many tables are flagged available, booked or not.
    pub configured: usize,
    /// Available tables with no overlapping hold, in (capacity, id) order.
    pub free: Vec<Table>,
}

impl FreeTables {
    /// Largest capacity among the free tables, or 0.
    #[must_use]
    pub fn max_capacity(&self) -> u32 {
        self.free.iter().map(Table::capacity).max().unwrap_or(0)
    }
}

/// Loads the free tables of `restaurant_id` for `window`.
///
/// Tables flagged unavailable are never returned. A table is busy if any
/// non-cancelled reservation holding it overlaps `window`; reservations on
/// the neighbouring days are considered too.
///
/// # Errors
///
/// Returns an error if a query fails.
pub fn find_free_tables(
    conn: &Connection,
    restaurant_id: RestaurantId,
    window: &TimeWindow,
) -> Result<FreeTables> {
    let tables = Database::list_available_tables(conn, restaurant_id)?;
    let holds = Database::find_overlapping_occupancy(conn, restaurant_id, window)?;
    Ok(filter_free(tables, &holds, window))
}

/// Removes the tables held during `window` from `tables`.
#[must_use]
pub fn filter_free(
    mut tables: Vec<Table>,
    holds: &[TableOccupancy],
    window: &TimeWindow,
) -> FreeTables {
    let configured = tables.len();
    tables.retain(|table| {
        !holds
            .iter()
            .any(|hold| hold.table_id == table.id() && hold.window.overlaps(window))
    });
    tables.sort_by_key(|table| (table.capacity(), table.id()));

    FreeTables {
        configured,
        free: tables,
    }
}
