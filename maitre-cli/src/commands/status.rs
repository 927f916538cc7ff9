//! Status command implementation.

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, parse_status, GlobalOptions};
use clap::Args;
use maitre::reservation::SYSTEM_ACTOR;
use maitre::{
    ActorId, LogNotifier, ReservationId, ReservationService, ReservationStatus, SystemClock,
};

/// Move a reservation to a new status.
#[derive(Args)]
pub struct StatusCommand {
    /// Reservation to update
    #[arg(value_name = "RESERVATION")]
    pub reservation: ReservationId,

    /// New status (pending, confirmed, seated, completed, cancelled)
    #[arg(value_name = "STATUS", value_parser = parse_status)]
    pub status: ReservationStatus,

    /// Staff member making the change
    #[arg(long, value_name = "ID", default_value_t = SYSTEM_ACTOR, env = "MAITRE_ACTOR")]
    pub actor: ActorId,
}

impl StatusCommand {
    /// Execute the status command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;
        let mut service =
            ReservationService::new(&mut db, LogNotifier, SystemClock).with_config(&config);

        let changed = service.update_status(self.reservation, self.status, self.actor)?;

        if !global.quiet {
            if changed {
                println!("Reservation {} is now {}", self.reservation, self.status);
            } else {
                println!("Reservation {} was already {}", self.reservation, self.status);
            }
        }
        Ok(())
    }
}
