//! Log command implementation.

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, print_rows, GlobalOptions, OutputFormat};
use clap::Args;
use maitre::{LogNotifier, ReservationId, ReservationService, SystemClock};

/// Show a reservation's audit trail.
#[derive(Args)]
pub struct LogCommand {
    /// Reservation to show
    #[arg(value_name = "RESERVATION")]
    pub reservation: ReservationId,

    /// Output format (default: configured format, or table)
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<OutputFormat>,
}

impl LogCommand {
    /// Execute the log command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;
        let service = ReservationService::new(&mut db, LogNotifier, SystemClock);

        // Fails with NotFound for an unknown id rather than printing nothing
        service.get_reservation(self.reservation)?;
        let entries = service.list_logs(self.reservation)?;

        print_rows(&entries, OutputFormat::resolve(self.format, &config))
    }
}
