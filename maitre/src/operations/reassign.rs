//! Operator overrides of a reservation's tables.

use crate::clock::Clock;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::notify::Notifier;
use crate::reservation::{ActorId, ReservationAction, ReservationId};
use crate::table::TableId;

use super::{ensure_tables_usable, format_ids, ReservationService};

impl<N: Notifier, C: Clock> ReservationService<'_, N, C> {
    /// Replaces the tables of a reservation with `new_tables`.
    ///
    /// The operator is trusted: overlapping reservations on the chosen tables
    /// are not checked. Duplicate ids are ignored.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the assignment changed
    /// - `Ok(false)` if `new_tables` is already the assignment
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The reservation or any table does not exist
    /// - `new_tables` is empty
    /// - A table belongs to another restaurant or is marked unavailable
    /// - The tables seat fewer people than the party
    /// - A write fails
    pub fn override_table_assignment(
        &mut self,
        reservation_id: ReservationId,
        new_tables: &[TableId],
        actor: ActorId,
    ) -> Result<bool> {
        let mut wanted = new_tables.to_vec();
        wanted.sort_unstable();
        wanted.dedup();
        if wanted.is_empty() {
            return Err(Error::validation("tables", "at least one table is required"));
        }

        let now = self.clock.now();
        let changed = self.db.with_transaction(|tx| {
            let reservation = Database::get_reservation(tx, reservation_id)?
                .ok_or_else(|| Error::not_found(format!("reservation {reservation_id}")))?;

            let tables = ensure_tables_usable(tx, reservation.restaurant_id(), &wanted)?;

            let capacity: u32 = tables.iter().map(|table| table.capacity()).sum();
            if capacity < reservation.party_size() {
                return Err(Error::validation(
                    "tables",
                    format!(
                        "tables seat {capacity} but the party has {}",
                        reservation.party_size()
                    ),
                ));
            }

            if reservation.table_ids() == wanted.as_slice() {
                return Ok(false);
            }

            Database::delete_assignments(tx, reservation_id)?;
            Database::insert_assignments(tx, reservation_id, &wanted)?;
            Database::append_log(
                tx,
                reservation_id,
                ReservationAction::TablesReassigned,
                &format!(
                    "{} -> {}",
                    format_ids(reservation.table_ids()),
                    format_ids(&wanted)
                ),
                actor,
                now,
            )?;
            Ok(true)
        })?;

        if changed {
            log::info!(
                "reservation {reservation_id} reassigned to {}",
                format_ids(&wanted)
            );
        }
        Ok(changed)
    }
}
