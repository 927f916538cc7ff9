//! Reservation operations on top of the allocation engine.
//!
//! [`ReservationService`] bundles a [`Database`] handle with the injectable
//! collaborators ([`Notifier`], [`Clock`]) and exposes the write paths:
//!
//! - [`ReservationService::create_reservation`] persists an allocation
//! - [`ReservationService::auto_allocate_pending`] sweeps the pending backlog
//! - [`ReservationService::override_table_assignment`] applies an operator's
//!   choice of tables
//! - [`ReservationService::update_status`] moves a reservation through its
//!   lifecycle
//!
//! Every write runs inside [`Database::with_transaction`]; the allocation
//! itself is computed outside it and re-checked inside.
//!
//! # Examples
//!
//! ```no_run
//! use maitre::clock::SystemClock;
//! use maitre::database::{Database, DatabaseConfig};
//! use maitre::notify::LogNotifier;
//! use maitre::operations::{ReservationRequest, ReservationService};
//! use maitre::{Party, TimeWindow};
//! use chrono::{NaiveDate, NaiveTime};
//!
//! let mut db = Database::open(DatabaseConfig::new("/tmp/maitre.db")).unwrap();
//! let mut service = ReservationService::new(&mut db, LogNotifier, SystemClock);
//!
//! let date = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
//! let time = NaiveTime::from_hms_opt(19, 0, 0).unwrap();
//! let result = service.find_best_allocation(1, date, time, 90, 4).unwrap();
//!
//! if let Some(allocation) = result.allocation() {
//!     let window = TimeWindow::new(date, time, 90).unwrap();
//!     let request = ReservationRequest::new(1, Party::Guest(7), window, 4);
//!     let reservation = service.create_reservation(allocation, &request).unwrap();
//!     println!("booked reservation {}", reservation.id());
//! }
//! ```

pub mod batch;
pub mod init;
pub mod layout;
pub mod reassign;
pub mod status;
pub mod writer;

use chrono::{NaiveDate, NaiveTime};

use crate::allocation::{AllocationConfig, AllocationResult, TableAllocator};
use crate::clock::Clock;
use crate::config::Config;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::notify::Notifier;
use crate::reservation::{LogEntry, Reservation, ReservationId};
use crate::table::{RestaurantId, Table, TableId};

pub use batch::{AutoAllocationSummary, BatchItem, BatchOutcome};
pub use init::{init_database, InitOptions, InitResult};
pub use layout::{import_floor_plan, FloorPlan, JoinSpec, LayoutImport};
pub use writer::ReservationRequest;

/// Entry point for every reservation write.
///
/// The notifier and clock are generic so tests can pass recording or fixed
/// doubles; both traits are also implemented for references.
pub struct ReservationService<'a, N: Notifier, C: Clock> {
    db: &'a mut Database,
    notifier: N,
    clock: C,
    allocator: TableAllocator,
    notifications: bool,
}

impl<'a, N: Notifier, C: Clock> ReservationService<'a, N, C> {
    /// Creates a service with the default allocation settings and
    /// notifications enabled.
    pub fn new(db: &'a mut Database, notifier: N, clock: C) -> Self {
        Self {
            db,
            notifier,
            clock,
            allocator: TableAllocator::default(),
            notifications: true,
        }
    }

    /// Applies the allocation and notification settings of `config`.
    #[must_use]
    pub fn with_config(self, config: &Config) -> Self {
        self.with_allocation_config(config.allocation_config())
            .with_notifications(config.notifications_enabled())
    }

    /// Replaces the allocation settings.
    #[must_use]
    pub fn with_allocation_config(mut self, config: AllocationConfig) -> Self {
        self.allocator = TableAllocator::new(config);
        self
    }

    /// Enables or disables confirmation emails.
    #[must_use]
    pub fn with_notifications(mut self, enabled: bool) -> Self {
        self.notifications = enabled;
        self
    }

    /// Returns the underlying database.
    pub fn database(&self) -> &Database {
        self.db
    }

    /// Finds the best tables for a party without writing anything.
    ///
    /// # Errors
    ///
    /// Returns an error only if a query fails; "nothing fits" is a failed
    /// [`AllocationResult`].
    pub fn find_best_allocation(
        &self,
        restaurant_id: RestaurantId,
        date: NaiveDate,
        time: NaiveTime,
        duration_minutes: u32,
        party_size: u32,
    ) -> Result<AllocationResult> {
        self.allocator.find_best_allocation(
            self.db.connection(),
            restaurant_id,
            date,
            time,
            duration_minutes,
            party_size,
        )
    }

    /// Fetches a reservation.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if it does not exist, or an error if the query fails.
    pub fn get_reservation(&self, id: ReservationId) -> Result<Reservation> {
        Database::get_reservation(self.db.connection(), id)?
            .ok_or_else(|| Error::not_found(format!("reservation {id}")))
    }

    /// Lists a restaurant's reservations for one day, by start time.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_reservations(
        &self,
        restaurant_id: RestaurantId,
        date: NaiveDate,
    ) -> Result<Vec<Reservation>> {
        Database::list_reservations(self.db.connection(), restaurant_id, date)
    }

    /// Returns a reservation's audit trail, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_logs(&self, id: ReservationId) -> Result<Vec<LogEntry>> {
        Database::list_logs(self.db.connection(), id)
    }
}

/// Loads `ids` and fails with `TableUnavailable` unless every table belongs
/// to `restaurant_id` and is marked available.
fn ensure_tables_usable(
    conn: &rusqlite::Connection,
    restaurant_id: RestaurantId,
    ids: &[TableId],
) -> Result<Vec<Table>> {
    let tables = Database::get_tables(conn, ids)?;
    for table in &tables {
        if table.restaurant_id() != restaurant_id {
            return Err(Error::TableUnavailable {
                table_id: table.id(),
                reason: format!("belongs to restaurant {}", table.restaurant_id()),
            });
        }
        if !table.is_available() {
            return Err(Error::TableUnavailable {
                table_id: table.id(),
                reason: "marked unavailable".to_string(),
            });
        }
    }
    Ok(tables)
}

/// Fails with `TableConflict` if any of `tables` is held by a reservation
/// other than `exclude` during `reservation`'s window.
fn ensure_tables_free(
    conn: &rusqlite::Connection,
    reservation: &Reservation,
    tables: &[TableId],
    exclude: Option<ReservationId>,
) -> Result<()> {
    let holds =
        Database::find_overlapping_occupancy(conn, reservation.restaurant_id(), reservation.window())?;
    let conflict = holds
        .iter()
        .filter(|hold| Some(hold.reservation_id) != exclude)
        .find(|hold| tables.contains(&hold.table_id));

    match conflict {
        Some(hold) => Err(Error::TableConflict {
            table_id: hold.table_id,
        }),
        None => Ok(()),
    }
}

fn format_ids(ids: &[TableId]) -> String {
    let joined = ids
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{joined}]")
}
