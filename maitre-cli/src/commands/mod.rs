//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `init`: Create the data directory and database
//! - `layout`: Import a floor plan, list tables and joins
//! - `table`: Take a table in or out of service
//! - `find`: Show the best tables for a party without booking
//! - `reserve`: Book tables, or queue a pending reservation
//! - `allocate_pending`: Seat the pending backlog in arrival order
//! - `override_tables`: Reassign a reservation to chosen tables
//! - `status`: Change a reservation's status
//! - `list`: List a day's reservations
//! - `log`: Show a reservation's audit trail
//! - `completions`: Generate shell completion scripts

pub mod allocate_pending;
pub mod completions;
pub mod find;
pub mod init;
pub mod layout;
pub mod list;
pub mod log;
pub mod override_tables;
pub mod reserve;
pub mod status;
pub mod table;

pub use allocate_pending::AllocatePendingCommand;
pub use completions::CompletionsCommand;
pub use find::FindCommand;
pub use init::InitCommand;
pub use layout::LayoutCommand;
pub use list::ListCommand;
pub use log::LogCommand;
pub use override_tables::OverrideCommand;
pub use reserve::ReserveCommand;
pub use status::StatusCommand;
pub use table::TableCommand;
