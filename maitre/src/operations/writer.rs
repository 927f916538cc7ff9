//! Persisting reservations.
//!
//! A booking is written in one IMMEDIATE transaction: the allocated tables
//! are checked to belong to the restaurant, to be available and free of
//! overlapping holds, then the reservation, its table
//! assignments and a `Created` audit entry are inserted. The confirmation
//! email goes out after commit and its failure never undoes the booking.

use chrono::{DateTime, Utc};

use crate::allocation::Allocation;
use crate::clock::Clock;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::notify::Notifier;
use crate::reservation::{
    ActorId, Party, Reservation, ReservationAction, ReservationStatus, TimeWindow, SYSTEM_ACTOR,
};
use crate::table::{RestaurantId, Table};

use super::{ensure_tables_free, ensure_tables_usable, ReservationService};

/// Details of a reservation to record.
///
/// # Examples
///
/// ```
/// use chrono::{NaiveDate, NaiveTime};
/// use maitre::operations::ReservationRequest;
/// use maitre::{Party, ReservationStatus, TimeWindow};
///
/// let window = TimeWindow::new(
///     NaiveDate::from_ymd_opt(2026, 10, 15).unwrap(),
///     NaiveTime::from_hms_opt(19, 30, 0).unwrap(),
///     90,
/// )
/// .unwrap();
///
/// let request = ReservationRequest::new(1, Party::Customer(12), window, 4)
///     .with_notes(Some("window seat".to_string()))
///     .with_actor(3);
/// assert_eq!(request.status, ReservationStatus::Confirmed);
/// assert!(!request.walk_in);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationRequest {
    /// The restaurant to book.
    pub restaurant_id: RestaurantId,
    /// Who the booking is for.
    pub party: Party,
    /// When.
    pub window: TimeWindow,
    /// Number of people.
    pub party_size: u32,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Whether the party walked in.
    pub walk_in: bool,
    /// Status the reservation is stored with.
    pub status: ReservationStatus,
    /// Staff member recording it.
    pub actor: ActorId,
}

impl ReservationRequest {
    /// Creates a confirmed, non-walk-in request recorded by the system actor.
    #[must_use]
    pub const fn new(
        restaurant_id: RestaurantId,
        party: Party,
        window: TimeWindow,
        party_size: u32,
    ) -> Self {
        Self {
            restaurant_id,
            party,
            window,
            party_size,
            notes: None,
            walk_in: false,
            status: ReservationStatus::Confirmed,
            actor: SYSTEM_ACTOR,
        }
    }

    /// Sets the notes.
    #[must_use]
    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }

    /// Sets the walk-in flag.
    #[must_use]
    pub const fn with_walk_in(mut self, walk_in: bool) -> Self {
        self.walk_in = walk_in;
        self
    }

    /// Sets the stored status.
    #[must_use]
    pub const fn with_status(mut self, status: ReservationStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the acting staff member.
    #[must_use]
    pub const fn with_actor(mut self, actor: ActorId) -> Self {
        self.actor = actor;
        self
    }

    fn to_reservation(&self, status: ReservationStatus, now: DateTime<Utc>) -> Result<Reservation> {
        Ok(Reservation::builder(
            self.restaurant_id,
            self.party,
            self.window,
            self.party_size,
        )
        .status(status)
        .notes(self.notes.clone())
        .walk_in(self.walk_in)
        .created_at(now)
        .created_by(self.actor)
        .build()?)
    }
}

impl<N: Notifier, C: Clock> ReservationService<'_, N, C> {
    /// Records a reservation on the tables of `allocation`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The allocation names no tables or seats fewer than the party
    /// - The request is invalid (zero party size, blank notes)
    /// - A table belongs to another restaurant or is marked unavailable
    ///   ([`Error::TableUnavailable`])
    /// - Another reservation took one of the tables since the allocation was
    ///   computed ([`Error::TableConflict`])
    /// - A table does not exist or any write fails
    ///
    /// Nothing is written when an error is returned. A failed confirmation
    /// email is logged, not returned.
    pub fn create_reservation(
        &mut self,
        allocation: &Allocation,
        request: &ReservationRequest,
    ) -> Result<Reservation> {
        if allocation.table_ids.is_empty() {
            return Err(Error::validation("tables", "allocation names no tables"));
        }
        if allocation.total_capacity < request.party_size {
            return Err(Error::validation(
                "party_size",
                format!(
                    "allocation seats {} but the party has {}",
                    allocation.total_capacity, request.party_size
                ),
            ));
        }

        let now = self.clock.now();
        let reservation = request.to_reservation(request.status, now)?;
        let tables = &allocation.table_ids;

        let stored = self.db.with_transaction(|tx| {
            let seats: u32 = ensure_tables_usable(tx, reservation.restaurant_id(), tables)?
                .iter()
                .map(Table::capacity)
                .sum();
            if seats < reservation.party_size() {
                return Err(Error::validation(
                    "tables",
                    format!(
                        "tables seat {seats} but the party has {}",
                        reservation.party_size()
                    ),
                ));
            }
            ensure_tables_free(tx, &reservation, tables, None)?;
            let stored = Database::insert_reservation(tx, &reservation, tables)?;
            Database::append_log(
                tx,
                stored.id(),
                ReservationAction::Created,
                &allocation.description,
                request.actor,
                now,
            )?;
            Ok(stored)
        })?;

        log::info!(
            "reservation {} for {} at {}: {}",
            stored.id(),
            stored.party_size(),
            stored.window(),
            allocation.description
        );
        self.send_confirmation(&stored);
        Ok(stored)
    }

    /// Records a pending reservation with no tables, to be seated later by
    /// [`auto_allocate_pending`](Self::auto_allocate_pending).
    ///
    /// The request's status is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is invalid or the write fails.
    pub fn enqueue(&mut self, request: &ReservationRequest) -> Result<Reservation> {
        let now = self.clock.now();
        let reservation = request.to_reservation(ReservationStatus::Pending, now)?;

        let stored = self.db.with_transaction(|tx| {
            let stored = Database::insert_reservation(tx, &reservation, &[])?;
            Database::append_log(
                tx,
                stored.id(),
                ReservationAction::Created,
                "queued for allocation",
                request.actor,
                now,
            )?;
            Ok(stored)
        })?;

        log::debug!("reservation {} queued", stored.id());
        Ok(stored)
    }

    /// Emails the party, if enabled and an address is known. Failures are
    /// logged.
    fn send_confirmation(&self, reservation: &Reservation) {
        if !self.notifications {
            return;
        }
        if let Err(err) = self.try_send_confirmation(reservation) {
            log::warn!(
                "confirmation for reservation {} not sent: {err}",
                reservation.id()
            );
        }
    }

    fn try_send_confirmation(&self, reservation: &Reservation) -> Result<()> {
        let conn = self.db.connection();
        let Some((name, Some(address))) = Database::get_party_contact(conn, reservation.party())?
        else {
            log::debug!(
                "no email address for {}; skipping confirmation",
                reservation.party()
            );
            return Ok(());
        };

        let numbers = Database::get_tables(conn, reservation.table_ids())?
            .iter()
            .map(|table| format!("#{}", table.number()))
            .collect::<Vec<_>>()
            .join(", ");
        let body = format!(
            "Dear {name},\n\nyour reservation for {} on {} is confirmed.\nTable(s): {numbers}\n",
            reservation.party_size(),
            reservation.window()
        );
        self.notifier
            .send_email(&address, "Your reservation is confirmed", &body)
    }
}
