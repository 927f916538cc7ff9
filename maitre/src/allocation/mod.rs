//! The table allocation engine.
//!
//! [`TableAllocator`] answers one question: which free tables should seat a
//! party for a given window? It loads the free tables
//! ([`availability`]), then walks the [`Strategy::CASCADE`] until one
//! strategy proposes an [`Allocation`]. Nothing is written to the store.
//!
//! "No table fits" is an expected outcome, reported as
//! [`AllocationResult::Failed`] rather than as an error.
//!
//! # Examples
//!
//! ```
//! use maitre::allocation::{AllocationConfig, TableAllocator};
//! use maitre::Table;
//!
//! let free = vec![
//!     Table::new(1, 1, 1, 2).unwrap(),
//!     Table::new(4, 1, 4, 4).unwrap(),
//!     Table::new(8, 1, 8, 6).unwrap(),
//! ];
//! let allocator = TableAllocator::new(AllocationConfig::default());
//!
//! let allocation = allocator.select(&free, &[], 4).allocation().cloned().unwrap();
//! assert_eq!(allocation.table_ids, vec![4]);
//! assert_eq!(allocation.wasted_seats, 0);
//! ```

pub mod availability;
pub mod graph;
pub mod search;
pub mod strategy;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::Result;
use crate::reservation::TimeWindow;
use crate::table::{RestaurantId, Table, TableId, TableJoin};

pub use availability::{find_free_tables, FreeTables};
pub use strategy::{SelectionContext, Strategy};

/// Tunables of the allocation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AllocationConfig {
    /// Largest number of tables combined for one party (2..=4).
    pub max_group_size: usize,
    /// Whether to fall back to combining joinable tables with no configured
    /// join between them.
    pub permissive_fallback: bool,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            max_group_size: search::MAX_GROUP_SIZE,
            permissive_fallback: true,
        }
    }
}

/// A successful seating proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// The allocated tables, ascending.
    pub table_ids: Vec<TableId>,
    /// Sum of the allocated capacities.
    pub total_capacity: u32,
    /// `total_capacity` minus the party size.
    pub wasted_seats: u32,
    /// The strategy that produced this allocation.
    pub strategy: Strategy,
    /// Names the tables and the wasted seats.
    pub description: String,
}

/// Why no allocation was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureKind {
    /// Party size or duration was zero.
    InvalidRequest,
    /// The restaurant has no table flagged available.
    NoTablesConfigured,
    /// Every available table is held during the window.
    NoTablesFree,
    /// Free tables exist but no strategy seats the party.
    InsufficientCapacity {
        /// The largest free single-table capacity.
        max_capacity: u32,
    },
}

/// A failed allocation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationFailure {
    /// Machine-readable reason.
    pub kind: FailureKind,
    /// Human-readable reason.
    pub message: String,
}

impl AllocationFailure {
    fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    fn invalid(message: impl Into<String>) -> Self {
        Self::new(FailureKind::InvalidRequest, message)
    }
}

impl fmt::Display for AllocationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Outcome of an allocation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AllocationResult {
    /// A strategy seated the party.
    Allocated(Allocation),
    /// Nothing seats the party.
    Failed(AllocationFailure),
}

impl AllocationResult {
    /// Returns whether tables were allocated.
    #[must_use]
    pub const fn is_allocated(&self) -> bool {
        matches!(self, Self::Allocated(_))
    }

    /// Returns the allocation, if any.
    #[must_use]
    pub const fn allocation(&self) -> Option<&Allocation> {
        match self {
            Self::Allocated(allocation) => Some(allocation),
            Self::Failed(_) => None,
        }
    }

    /// Returns the failure, if any.
    #[must_use]
    pub const fn failure(&self) -> Option<&AllocationFailure> {
        match self {
            Self::Allocated(_) => None,
            Self::Failed(failure) => Some(failure),
        }
    }

    /// Consumes the result, keeping the allocation.
    ///
    /// # Errors
    ///
    /// Returns the failure when nothing was allocated.
    pub fn into_allocation(self) -> std::result::Result<Allocation, AllocationFailure> {
        match self {
            Self::Allocated(allocation) => Ok(allocation),
            Self::Failed(failure) => Err(failure),
        }
    }
}

/// Picks tables for a party.
#[derive(Debug, Clone, Default)]
pub struct TableAllocator {
    config: AllocationConfig,
}

impl TableAllocator {
    /// Creates an allocator.
    #[must_use]
    pub const fn new(config: AllocationConfig) -> Self {
        Self { config }
    }

    /// Returns the allocator configuration.
    #[must_use]
    pub const fn config(&self) -> &AllocationConfig {
        &self.config
    }

    /// Finds the best allocation for a party arriving at `time` on `date`.
    ///
    /// A zero party size or duration is rejected before the store is read.
    ///
    /// # Errors
    ///
    /// Returns an error only if a query fails.
    pub fn find_best_allocation(
        &self,
        conn: &Connection,
        restaurant_id: RestaurantId,
        date: NaiveDate,
        time: NaiveTime,
        duration_minutes: u32,
        party_size: u32,
    ) -> Result<AllocationResult> {
        if party_size == 0 {
            return Ok(AllocationResult::Failed(AllocationFailure::invalid(
                "party size must be at least 1",
            )));
        }
        let window = match TimeWindow::new(date, time, duration_minutes) {
            Ok(window) => window,
            Err(err) => {
                return Ok(AllocationResult::Failed(AllocationFailure::invalid(
                    err.message,
                )))
            }
        };
        self.allocate(conn, restaurant_id, &window, party_size)
    }

    /// Finds the best allocation for an already validated window.
    ///
    /// # Errors
    ///
    /// Returns an error only if a query fails.
    pub fn allocate(
        &self,
        conn: &Connection,
        restaurant_id: RestaurantId,
        window: &TimeWindow,
        party_size: u32,
    ) -> Result<AllocationResult> {
        if party_size == 0 {
            return Ok(AllocationResult::Failed(AllocationFailure::invalid(
                "party size must be at least 1",
            )));
        }

        let tables = find_free_tables(conn, restaurant_id, window)?;
        if tables.configured == 0 {
            return Ok(AllocationResult::Failed(AllocationFailure::new(
                FailureKind::NoTablesConfigured,
                format!("restaurant {restaurant_id} has no available tables configured"),
            )));
        }
        if tables.free.is_empty() {
            return Ok(AllocationResult::Failed(AllocationFailure::new(
                FailureKind::NoTablesFree,
                format!("no table is free at {window}"),
            )));
        }

        let joins = Database::list_joins(conn, restaurant_id)?;
        log::debug!(
            "allocating party of {party_size} at {window}: {} of {} tables free, {} joins",
            tables.free.len(),
            tables.configured,
            joins.len()
        );
        Ok(self.select(&tables.free, &joins, party_size))
    }

    /// Runs the strategy cascade over an in-memory set of free tables.
    ///
    /// `free` should be the tables free for the window; `joins` all configured
    /// joins of the restaurant.
    #[must_use]
    pub fn select(&self, free: &[Table], joins: &[TableJoin], party_size: u32) -> AllocationResult {
        let mut ordered = free.to_vec();
        ordered.sort_by_key(|table| (table.capacity(), table.id()));
        let ctx = SelectionContext::new(&ordered, joins, party_size, &self.config);

        for strategy in Strategy::CASCADE {
            if let Some(allocation) = strategy.apply(&ctx) {
                log::debug!("{}", allocation.description);
                return AllocationResult::Allocated(allocation);
            }
        }

        let max_capacity = ordered.iter().map(Table::capacity).max().unwrap_or(0);
        AllocationResult::Failed(AllocationFailure::new(
            FailureKind::InsufficientCapacity { max_capacity },
            format!(
                "no table or combination seats {party_size}; the largest free table seats {max_capacity}"
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{create_test_database, test_date, test_window};
    use crate::reservation::{Reservation, ReservationStatus};
    use crate::table::NewTable;

    fn restaurant(conn: &Connection, plan: &[(u32, u32, bool)]) -> Vec<Table> {
        plan.iter()
            .map(|&(number, capacity, joinable)| {
                Database::insert_table(conn, 1, &NewTable::new(number, capacity).joinable(joinable))
                    .unwrap()
            })
            .collect()
    }

    fn seven_pm() -> NaiveTime {
        NaiveTime::from_hms_opt(19, 0, 0).unwrap()
    }

    fn find(conn: &Connection, allocator: &TableAllocator, party: u32) -> AllocationResult {
        allocator
            .find_best_allocation(conn, 1, test_date(), seven_pm(), 90, party)
            .unwrap()
    }

    #[test]
    fn test_exact_fit_scenario() {
        let db = create_test_database();
        let conn = db.connection();
        let tables = restaurant(conn, &[(1, 2, false), (4, 4, false), (8, 6, false)]);

        let result = find(conn, &TableAllocator::default(), 4);
        let allocation = result.allocation().unwrap();
        assert_eq!(allocation.table_ids, vec![tables[1].id()]);
        assert_eq!(allocation.wasted_seats, 0);
        assert_eq!(allocation.strategy, Strategy::ExactFit);
    }

    #[test]
    fn test_best_standalone_fit_scenario() {
        let db = create_test_database();
        let conn = db.connection();
        let tables = restaurant(conn, &[(1, 2, false), (4, 4, false), (8, 6, false)]);

        let allocation = find(conn, &TableAllocator::default(), 5)
            .into_allocation()
            .unwrap();
        assert_eq!(allocation.table_ids, vec![tables[2].id()]);
        assert_eq!(allocation.wasted_seats, 1);
        assert_eq!(allocation.strategy, Strategy::BestStandaloneFit);
    }

    #[test]
    fn test_capacity_failure_reports_largest_table() {
        let db = create_test_database();
        let conn = db.connection();
        restaurant(conn, &[(1, 2, false), (4, 4, false), (8, 6, false)]);

        let failure = find(conn, &TableAllocator::default(), 7)
            .into_allocation()
            .unwrap_err();
        assert_eq!(
            failure.kind,
            FailureKind::InsufficientCapacity { max_capacity: 6 }
        );
        assert!(failure.message.contains("seats 6"));
    }

    #[test]
    fn test_configured_join_scenario() {
        let db = create_test_database();
        let conn = db.connection();
        let tables = restaurant(conn, &[(1, 2, true), (2, 2, true)]);
        let join = Database::insert_join(conn, tables[0].id(), tables[1].id()).unwrap();
        assert_eq!(join.total_capacity(), 4);

        let allocation = find(conn, &TableAllocator::default(), 4)
            .into_allocation()
            .unwrap();
        assert_eq!(allocation.table_ids, vec![tables[0].id(), tables[1].id()]);
        assert_eq!(allocation.wasted_seats, 0);
        assert_eq!(allocation.strategy, Strategy::ConfiguredJoin);
    }

    #[test]
    fn test_exact_standalone_beats_join() {
        let db = create_test_database();
        let conn = db.connection();
        let tables = restaurant(conn, &[(1, 2, true), (2, 2, true), (3, 4, false)]);
        Database::insert_join(conn, tables[0].id(), tables[1].id()).unwrap();

        let allocation = find(conn, &TableAllocator::default(), 4)
            .into_allocation()
            .unwrap();
        assert_eq!(allocation.table_ids, vec![tables[2].id()]);
        assert_eq!(allocation.strategy, Strategy::ExactFit);
    }

    #[test]
    fn test_permissive_fallback_only() {
        let db = create_test_database();
        let conn = db.connection();
        let tables = restaurant(conn, &[(1, 3, true), (2, 3, true)]);

        let allocation = find(conn, &TableAllocator::default(), 6)
            .into_allocation()
            .unwrap();
        assert_eq!(allocation.table_ids, vec![tables[0].id(), tables[1].id()]);
        assert_eq!(allocation.strategy, Strategy::PermissiveCombination);

        let strict = TableAllocator::new(AllocationConfig {
            permissive_fallback: false,
            ..AllocationConfig::default()
        });
        let failure = find(conn, &strict, 6).into_allocation().unwrap_err();
        assert_eq!(
            failure.kind,
            FailureKind::InsufficientCapacity { max_capacity: 3 }
        );
    }

    #[test]
    fn test_invalid_requests() {
        let db = create_test_database();
        let conn = db.connection();
        restaurant(conn, &[(1, 4, false)]);
        let allocator = TableAllocator::default();

        let result = find(conn, &allocator, 0);
        assert_eq!(result.failure().unwrap().kind, FailureKind::InvalidRequest);

        let result = allocator
            .find_best_allocation(conn, 1, test_date(), seven_pm(), 0, 2)
            .unwrap();
        assert_eq!(result.failure().unwrap().kind, FailureKind::InvalidRequest);
    }

    #[test]
    fn test_availability_failures_are_distinct() {
        let db = create_test_database();
        let conn = db.connection();
        let allocator = TableAllocator::default();

        let none = find(conn, &allocator, 2).into_allocation().unwrap_err();
        assert_eq!(none.kind, FailureKind::NoTablesConfigured);

        let tables = restaurant(conn, &[(1, 4, false)]);
        let guest = Database::insert_guest(conn, "G", None).unwrap();
        let existing = Reservation::builder(1, guest, test_window(18, 30, 120), 4)
            .status(ReservationStatus::Confirmed)
            .build()
            .unwrap();
        Database::insert_reservation(conn, &existing, &[tables[0].id()]).unwrap();

        let busy = find(conn, &allocator, 2).into_allocation().unwrap_err();
        assert_eq!(busy.kind, FailureKind::NoTablesFree);
        assert_ne!(none.message, busy.message);
    }

    #[test]
    fn test_unavailable_tables_are_not_configured() {
        let db = create_test_database();
        let conn = db.connection();
        let tables = restaurant(conn, &[(1, 4, false)]);
        Database::set_table_available(conn, tables[0].id(), false).unwrap();

        let failure = find(conn, &TableAllocator::default(), 2)
            .into_allocation()
            .unwrap_err();
        assert_eq!(failure.kind, FailureKind::NoTablesConfigured);
    }

    #[test]
    fn test_find_is_idempotent() {
        let db = create_test_database();
        let conn = db.connection();
        let tables = restaurant(conn, &[(1, 2, true), (2, 3, true), (3, 4, true)]);
        Database::insert_join(conn, tables[1].id(), tables[2].id()).unwrap();
        let allocator = TableAllocator::default();

        assert_eq!(find(conn, &allocator, 7), find(conn, &allocator, 7));
    }
}
