//! Override command implementation.
//!
//! Replaces a reservation's tables with an operator's choice. The tables are
//! checked to exist and be in service, but not for double booking.

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, GlobalOptions};
use clap::Args;
use maitre::output::join_ids;
use maitre::reservation::SYSTEM_ACTOR;
use maitre::{ActorId, LogNotifier, ReservationId, ReservationService, SystemClock, TableId};

/// Reassign a reservation to specific tables.
#[derive(Args)]
pub struct OverrideCommand {
    /// Reservation to change
    #[arg(value_name = "RESERVATION")]
    pub reservation: ReservationId,

    /// Table ids to assign, comma separated
    #[arg(long, value_name = "IDS", value_delimiter = ',', required = true, num_args = 1..)]
    pub tables: Vec<TableId>,

    /// Staff member making the change
    #[arg(long, value_name = "ID", default_value_t = SYSTEM_ACTOR, env = "MAITRE_ACTOR")]
    pub actor: ActorId,
}

impl OverrideCommand {
    /// Execute the override command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;
        let mut service =
            ReservationService::new(&mut db, LogNotifier, SystemClock).with_config(&config);

        let changed =
            service.override_table_assignment(self.reservation, &self.tables, self.actor)?;

        if !global.quiet {
            let reservation = service.get_reservation(self.reservation)?;
            let verb = if changed { "now at" } else { "already at" };
            println!(
                "Reservation {} {verb} tables {}",
                self.reservation,
                join_ids(reservation.table_ids())
            );
        }
        Ok(())
    }
}
