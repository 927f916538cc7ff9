//! Reserve command implementation.
//!
//! This module implements the `reserve` command, which books the best
//! tables for a party, or queues the party as pending for a later
//! `allocate-pending` sweep.

use crate::commands::find::{report, SlotArgs};
use crate::error::CliError;
use crate::utils::{load_configuration, open_database, GlobalOptions};
use clap::{ArgGroup, Args};
use maitre::output::join_ids;
use maitre::reservation::SYSTEM_ACTOR;
use maitre::{
    ActorId, Database, LogNotifier, Party, ReservationRequest, ReservationService, SystemClock,
};

/// Book tables for a party.
#[derive(Args)]
#[command(group(ArgGroup::new("who").required(true).args(["guest", "customer"])))]
#[command(group(ArgGroup::new("mode").args(["dry_run", "pending"])))]
pub struct ReserveCommand {
    #[command(flatten)]
    pub slot: SlotArgs,

    /// Name of a walk-up guest to record
    #[arg(long, value_name = "NAME")]
    pub guest: Option<String>,

    /// Email address for the guest's confirmation
    #[arg(long, value_name = "ADDRESS", requires = "guest")]
    pub email: Option<String>,

    /// Existing customer id
    #[arg(long, value_name = "ID")]
    pub customer: Option<i64>,

    /// Free-form notes
    #[arg(long, value_name = "TEXT")]
    pub notes: Option<String>,

    /// Record as a walk-in
    #[arg(long)]
    pub walk_in: bool,

    /// Staff member making the booking
    #[arg(long, value_name = "ID", default_value_t = SYSTEM_ACTOR, env = "MAITRE_ACTOR")]
    pub actor: ActorId,

    /// Show the allocation without booking
    #[arg(long)]
    pub dry_run: bool,

    /// Queue the booking without assigning tables
    #[arg(long)]
    pub pending: bool,
}

impl ReserveCommand {
    /// Execute the reserve command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let window = self.slot.window(&config)?;
        let mut db = open_database(global, &config)?;
        let mut service =
            ReservationService::new(&mut db, LogNotifier, SystemClock).with_config(&config);

        let lookup = || {
            service.find_best_allocation(
                self.slot.restaurant,
                window.date(),
                window.time(),
                window.duration_minutes(),
                self.slot.party,
            )
        };

        if self.dry_run {
            return report(&lookup()?);
        }

        // Allocate before recording the guest so a full house leaves no trace
        let allocation = if self.pending {
            None
        } else {
            let found = lookup()?
                .into_allocation()
                .map_err(|failure| CliError::SemanticFailure(failure.message))?;
            Some(found)
        };

        let party = self.resolve_party(service.database())?;
        let request = ReservationRequest::new(self.slot.restaurant, party, window, self.slot.party)
            .with_notes(self.notes.clone())
            .with_walk_in(self.walk_in)
            .with_actor(self.actor);

        let Some(allocation) = allocation else {
            let reservation = service.enqueue(&request)?;
            println!("{}", reservation.id());
            if !global.quiet {
                eprintln!("Queued {party} for {window} as pending");
            }
            return Ok(());
        };

        let reservation = service.create_reservation(&allocation, &request)?;

        // Only the id goes to stdout so scripts can capture it
        println!("{}", reservation.id());
        if !global.quiet {
            eprintln!(
                "Booked {party} for {window} at tables {} ({})",
                join_ids(reservation.table_ids()),
                allocation.description
            );
        }
        Ok(())
    }

    fn resolve_party(&self, db: &Database) -> Result<Party, CliError> {
        if let Some(id) = self.customer {
            let party = Party::Customer(id);
            return match Database::get_party_contact(db.connection(), party)? {
                Some(_) => Ok(party),
                None => Err(CliError::InvalidArguments(format!("customer {id} does not exist"))),
            };
        }

        let name = self.guest.as_deref().unwrap_or_default();
        Ok(Database::insert_guest(db.connection(), name, self.email.as_deref())?)
    }
}
