//! Reservation lifecycle changes.

use crate::clock::Clock;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::notify::Notifier;
use crate::reservation::{ActorId, ReservationAction, ReservationId, ReservationStatus};

use super::ReservationService;

impl<N: Notifier, C: Clock> ReservationService<'_, N, C> {
    /// Moves a reservation to `status` and records a `StatusChanged` entry.
    ///
    /// Cancelling a reservation releases its tables for availability
    /// purposes; the assignment rows are kept for the record.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the status changed
    /// - `Ok(false)` if the reservation already had `status`
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the reservation does not exist, or an error if a
    /// write fails.
    pub fn update_status(
        &mut self,
        reservation_id: ReservationId,
        status: ReservationStatus,
        actor: ActorId,
    ) -> Result<bool> {
        let now = self.clock.now();
        self.db.with_transaction(|tx| {
            let current = Database::get_reservation(tx, reservation_id)?
                .ok_or_else(|| Error::not_found(format!("reservation {reservation_id}")))?
                .status();
            if current == status {
                return Ok(false);
            }

            Database::set_reservation_status(tx, reservation_id, status)?;
            Database::append_log(
                tx,
                reservation_id,
                ReservationAction::StatusChanged,
                &format!("{current} -> {status}"),
                actor,
                now,
            )?;
            Ok(true)
        })
    }
}
