//! FIFO sweep over pending reservations.
//!
//! Pending reservations are processed oldest first. Each one is allocated
//! and written in its own transaction, so a failure only affects that item
//! and the sweep carries on. Confirmation emails are not sent from here.

use serde::Serialize;

use crate::allocation::AllocationResult;
use crate::clock::Clock;
use crate::database::Database;
use crate::error::Result;
use crate::notify::Notifier;
use crate::reservation::{ActorId, Reservation, ReservationAction, ReservationId, ReservationStatus};
use crate::table::TableId;

use super::{ensure_tables_free, ReservationService};

/// What happened to one pending reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BatchOutcome {
    /// Tables were assigned and the reservation confirmed.
    Allocated {
        /// The assigned tables.
        table_ids: Vec<TableId>,
        /// The strategy description.
        description: String,
    },
    /// Nothing could be assigned.
    Failed {
        /// Why.
        message: String,
    },
    /// The reservation already had tables.
    Skipped,
}

/// One processed reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchItem {
    /// The reservation.
    pub reservation_id: ReservationId,
    /// Its outcome.
    #[serde(flatten)]
    pub outcome: BatchOutcome,
}

/// Counts and per-item details of a sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AutoAllocationSummary {
    /// Reservations that received tables.
    pub allocated: usize,
    /// Reservations that could not be seated.
    pub failed: usize,
    /// Reservations that already had tables.
    pub skipped: usize,
    /// Every processed reservation, in processing order.
    pub items: Vec<BatchItem>,
}

impl AutoAllocationSummary {
    fn record(&mut self, reservation_id: ReservationId, outcome: BatchOutcome) {
        match outcome {
            BatchOutcome::Allocated { .. } => self.allocated += 1,
            BatchOutcome::Failed { .. } => self.failed += 1,
            BatchOutcome::Skipped => self.skipped += 1,
        }
        self.items.push(BatchItem {
            reservation_id,
            outcome,
        });
    }

    /// Number of processed reservations.
    #[must_use]
    pub fn total(&self) -> usize {
        self.items.len()
    }
}

impl<N: Notifier, C: Clock> ReservationService<'_, N, C> {
    /// Allocates tables to every pending reservation, oldest first.
    ///
    /// Order is creation time, then id. Each success assigns the tables,
    /// confirms the reservation and appends an `AutoAllocated` entry in one
    /// transaction. Allocation failures and per-item errors are counted as
    /// failed and never stop the sweep.
    ///
    /// # Errors
    ///
    /// Returns an error only if the pending reservations cannot be listed.
    pub fn auto_allocate_pending(&mut self, actor: ActorId) -> Result<AutoAllocationSummary> {
        let pending = Database::list_pending_reservations(self.db.connection())?;
        log::debug!("sweeping {} pending reservation(s)", pending.len());

        let mut summary = AutoAllocationSummary::default();
        for reservation in &pending {
            let outcome = if reservation.is_assigned() {
                BatchOutcome::Skipped
            } else {
                match self.allocate_pending(reservation, actor) {
                    Ok(outcome) => outcome,
                    Err(err) => BatchOutcome::Failed {
                        message: err.to_string(),
                    },
                }
            };

            if let BatchOutcome::Failed { message } = &outcome {
                log::warn!("reservation {} not allocated: {message}", reservation.id());
            }
            summary.record(reservation.id(), outcome);
        }

        log::info!(
            "auto-allocation: {} allocated, {} failed, {} skipped",
            summary.allocated,
            summary.failed,
            summary.skipped
        );
        Ok(summary)
    }

    fn allocate_pending(&mut self, reservation: &Reservation, actor: ActorId) -> Result<BatchOutcome> {
        let result = self.allocator.allocate(
            self.db.connection(),
            reservation.restaurant_id(),
            reservation.window(),
            reservation.party_size(),
        )?;
        let allocation = match result {
            AllocationResult::Allocated(allocation) => allocation,
            AllocationResult::Failed(failure) => {
                return Ok(BatchOutcome::Failed {
                    message: failure.message,
                })
            }
        };

        let now = self.clock.now();
        let id = reservation.id();
        self.db.with_transaction(|tx| {
            ensure_tables_free(tx, reservation, &allocation.table_ids, Some(id))?;
            Database::insert_assignments(tx, id, &allocation.table_ids)?;
            Database::set_reservation_status(tx, id, ReservationStatus::Confirmed)?;
            Database::append_log(
                tx,
                id,
                ReservationAction::AutoAllocated,
                &allocation.description,
                actor,
                now,
            )?;
            Ok(())
        })?;

        Ok(BatchOutcome::Allocated {
            table_ids: allocation.table_ids,
            description: allocation.description,
        })
    }
}
