//! Output formatting for listings and allocation results.
//!
//! Listable records implement [`Tabular`], which gives them a fixed column
//! layout. The formatters here render rows as a human-readable table or as
//! JSON; delimited output (CSV/TSV) reuses the same rows in the CLI.

mod formatters;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::operations::{BatchItem, BatchOutcome};
use crate::reservation::{LogEntry, Reservation};
use crate::table::{Table, TableId, TableJoin};
use crate::Result;

pub use formatters::{format_allocation, format_summary, JsonFormatter, TableFormatter};

/// A record with a fixed column layout.
pub trait Tabular: Serialize {
    /// Lowercase column names.
    const HEADERS: &'static [&'static str];

    /// Cell values in header order. Missing values are empty strings.
    fn row(&self) -> Vec<String>;
}

/// Renders a list of records.
pub trait OutputFormatter {
    /// Formats `rows` into a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the rows cannot be serialized.
    fn format<T: Tabular>(&self, rows: &[T]) -> Result<String>;
}

/// Joins table ids as `1,2,3`.
#[must_use]
pub fn join_ids(ids: &[TableId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl Tabular for Reservation {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "date",
        "time",
        "duration",
        "party_size",
        "status",
        "tables",
        "party",
        "walk_in",
        "notes",
        "created_at",
    ];

    fn row(&self) -> Vec<String> {
        let window = self.window();
        vec![
            self.id().to_string(),
            window.date().to_string(),
            window.time().format("%H:%M").to_string(),
            window.duration_minutes().to_string(),
            self.party_size().to_string(),
            self.status().to_string(),
            join_ids(self.table_ids()),
            self.party().to_string(),
            self.walk_in().to_string(),
            self.notes().unwrap_or_default().to_string(),
            timestamp(self.created_at()),
        ]
    }
}

impl Tabular for Table {
    const HEADERS: &'static [&'static str] =
        &["id", "number", "capacity", "joinable", "available"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id().to_string(),
            self.number().to_string(),
            self.capacity().to_string(),
            self.is_joinable().to_string(),
            self.is_available().to_string(),
        ]
    }
}

impl Tabular for TableJoin {
    const HEADERS: &'static [&'static str] = &["table_a", "table_b", "total_capacity"];

    fn row(&self) -> Vec<String> {
        let (a, b) = self.tables();
        vec![a.to_string(), b.to_string(), self.total_capacity().to_string()]
    }
}

impl Tabular for LogEntry {
    const HEADERS: &'static [&'static str] = &["created_at", "action", "actor", "detail"];

    fn row(&self) -> Vec<String> {
        vec![
            timestamp(self.created_at),
            self.action.to_string(),
            self.actor.to_string(),
            self.detail.clone(),
        ]
    }
}

impl Tabular for BatchItem {
    const HEADERS: &'static [&'static str] = &["reservation", "outcome", "tables", "detail"];

    fn row(&self) -> Vec<String> {
        let (outcome, tables, detail) = match &self.outcome {
            BatchOutcome::Allocated {
                table_ids,
                description,
            } => ("allocated", join_ids(table_ids), description.clone()),
            BatchOutcome::Failed { message } => ("failed", String::new(), message.clone()),
            BatchOutcome::Skipped => ("skipped", String::new(), String::new()),
        };
        vec![
            self.reservation_id.to_string(),
            outcome.to_string(),
            tables,
            detail,
        ]
    }
}
