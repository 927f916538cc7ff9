//! List command implementation.
//!
//! This module implements the `list` command, which displays a day's
//! reservations (or the pending backlog) in various formats (table, JSON,
//! CSV, TSV).

use crate::error::CliError;
use crate::utils::{
    load_configuration, open_database, parse_date, parse_status, print_rows, GlobalOptions,
    OutputFormat, DEFAULT_RESTAURANT,
};
use chrono::NaiveDate;
use clap::Args;
use maitre::{Database, ReservationStatus, RestaurantId};

/// List reservations.
#[derive(Args)]
pub struct ListCommand {
    /// Restaurant to list
    #[arg(long, value_name = "ID", default_value_t = DEFAULT_RESTAURANT, env = "MAITRE_RESTAURANT")]
    pub restaurant: RestaurantId,

    /// Day to list (YYYY-MM-DD or "today")
    #[arg(
        long,
        value_name = "DATE",
        value_parser = parse_date,
        required_unless_present = "pending"
    )]
    pub date: Option<NaiveDate>,

    /// List every pending reservation in arrival order instead
    #[arg(long, conflicts_with = "date")]
    pub pending: bool,

    /// Only show reservations with this status
    #[arg(long, value_name = "STATUS", value_parser = parse_status)]
    pub status: Option<ReservationStatus>,

    /// Output format (default: configured format, or table)
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<OutputFormat>,
}

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;

        let mut reservations = match self.date {
            Some(date) if !self.pending => {
                Database::list_reservations(db.connection(), self.restaurant, date)?
            }
            _ => Database::list_pending_reservations(db.connection())?
                .into_iter()
                .filter(|r| r.restaurant_id() == self.restaurant)
                .collect(),
        };

        if let Some(status) = self.status {
            reservations.retain(|r| r.status() == status);
        }

        print_rows(&reservations, OutputFormat::resolve(self.format, &config))
    }
}
