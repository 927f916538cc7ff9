//! Find command implementation.
//!
//! This module implements the `find` command, which reports the tables the
//! allocator would pick for a party without booking them.

use crate::error::CliError;
use crate::utils::{
    load_configuration, open_database, parse_date, parse_time, GlobalOptions, DEFAULT_RESTAURANT,
};
use chrono::{NaiveDate, NaiveTime};
use clap::Args;
use maitre::output::format_allocation;
use maitre::{
    AllocationResult, Config, LogNotifier, RestaurantId, ReservationService, SystemClock,
    TimeWindow,
};

/// The restaurant, time slot and party size of a request.
#[derive(Args, Debug, Clone)]
pub struct SlotArgs {
    /// Restaurant to seat the party in
    #[arg(long, value_name = "ID", default_value_t = DEFAULT_RESTAURANT, env = "MAITRE_RESTAURANT")]
    pub restaurant: RestaurantId,

    /// Date of the visit (YYYY-MM-DD or "today")
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub date: NaiveDate,

    /// Arrival time (HH:MM)
    #[arg(long, value_name = "TIME", value_parser = parse_time)]
    pub time: NaiveTime,

    /// Length of the visit in minutes (default: configured duration)
    #[arg(long, value_name = "MINUTES")]
    pub duration: Option<u32>,

    /// Number of guests
    #[arg(long, value_name = "N")]
    pub party: u32,
}

impl SlotArgs {
    /// Duration from the flag, falling back to the configured default.
    pub fn duration(&self, config: &Config) -> u32 {
        self.duration
            .unwrap_or_else(|| config.default_duration_minutes())
    }

    /// Builds the booking window.
    pub fn window(&self, config: &Config) -> Result<TimeWindow, CliError> {
        TimeWindow::new(self.date, self.time, self.duration(config))
            .map_err(|e| CliError::Library(e.into()))
    }
}

/// Show the best tables for a party without booking.
#[derive(Args)]
pub struct FindCommand {
    #[command(flatten)]
    pub slot: SlotArgs,
}

impl FindCommand {
    /// Execute the find command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;
        let service = ReservationService::new(&mut db, LogNotifier, SystemClock).with_config(&config);

        let result = service.find_best_allocation(
            self.slot.restaurant,
            self.slot.date,
            self.slot.time,
            self.slot.duration(&config),
            self.slot.party,
        )?;
        report(&result)
    }
}

/// Prints an allocation, or turns a failed one into exit code 1.
pub fn report(result: &AllocationResult) -> Result<(), CliError> {
    match result {
        AllocationResult::Allocated(_) => {
            println!("{}", format_allocation(result));
            Ok(())
        }
        AllocationResult::Failed(failure) => Err(CliError::SemanticFailure(failure.message.clone())),
    }
}
