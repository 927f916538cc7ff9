//! Allocate-pending command implementation.
//!
//! Sweeps every pending reservation in arrival order and seats what fits.

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, print_rows, GlobalOptions, OutputFormat};
use clap::Args;
use maitre::output::format_summary;
use maitre::reservation::SYSTEM_ACTOR;
use maitre::{ActorId, LogNotifier, ReservationService, SystemClock};

/// Assign tables to all pending reservations.
#[derive(Args)]
pub struct AllocatePendingCommand {
    /// Staff member running the sweep
    #[arg(long, value_name = "ID", default_value_t = SYSTEM_ACTOR, env = "MAITRE_ACTOR")]
    pub actor: ActorId,

    /// Print one row per reservation instead of a summary
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<OutputFormat>,
}

impl AllocatePendingCommand {
    /// Execute the allocate-pending command.
    ///
    /// Reservations that still do not fit are reported but do not make the
    /// command fail.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;
        let mut service =
            ReservationService::new(&mut db, LogNotifier, SystemClock).with_config(&config);

        let summary = service.auto_allocate_pending(self.actor)?;

        match self.format {
            Some(format) => print_rows(&summary.items, format),
            None => {
                println!("{}", format_summary(&summary));
                Ok(())
            }
        }
    }
}
