#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # maitre
//!
//! A library for allocating restaurant tables to reservations.
//!
//! Given a party size, a time window and a restaurant's floor plan, the
//! allocation engine picks a single table, a configured join, or an ad-hoc
//! combination of joinable tables, wasting as few seats as possible. The
//! reservation operations persist the result to SQLite atomically, sweep a
//! backlog of pending reservations in arrival order, and let an operator
//! override any assignment.
//!
//! ## Core Types
//!
//! - [`Table`] and [`TableJoin`]: the floor plan
//! - [`Reservation`], [`TimeWindow`] and [`Party`]: bookings
//! - [`TableAllocator`] and [`AllocationResult`]: the allocation engine
//! - [`ReservationService`]: persisted reservation operations
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use maitre::{Table, TableAllocator, TableJoin};
//!
//! let tables = vec![
//!     Table::new(1, 1, 1, 2).unwrap().joinable(true),
//!     Table::new(2, 1, 2, 2).unwrap().joinable(true),
//!     Table::new(3, 1, 8, 6).unwrap(),
//! ];
//! let allocator = TableAllocator::default();
//!
//! // A standalone table is preferred while one is big enough
//! let result = allocator.select(&tables, &[TableJoin::new(1, 2, 4).unwrap()], 5);
//! assert_eq!(result.allocation().unwrap().table_ids, vec![3]);
//!
//! // Otherwise the configured join seats the party
//! let joins = vec![TableJoin::new(1, 2, 4).unwrap()];
//! let result = allocator.select(&tables[..2], &joins, 4);
//! let allocation = result.allocation().unwrap();
//! assert_eq!(allocation.table_ids, vec![1, 2]);
//! assert_eq!(allocation.wasted_seats, 0);
//! ```

pub mod allocation;
pub mod clock;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod notify;
pub mod operations;
pub mod output;
pub mod reservation;
pub mod table;

// Re-export key types at crate root for convenience
pub use allocation::{
    Allocation, AllocationConfig, AllocationFailure, AllocationResult, FailureKind, Strategy,
    TableAllocator,
};
pub use clock::{Clock, SystemClock};
pub use config::{Config, ConfigBuilder};
pub use database::{Database, DatabaseConfig};
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use notify::{LogNotifier, Notifier};
pub use operations::{
    AutoAllocationSummary, BatchItem, BatchOutcome, FloorPlan, ReservationRequest,
    ReservationService,
};
pub use reservation::{
    ActorId, LogEntry, Party, Reservation, ReservationAction, ReservationId, ReservationStatus,
    TimeWindow, MAX_DURATION_MINUTES,
};
pub use table::{NewTable, RestaurantId, Table, TableId, TableJoin};
