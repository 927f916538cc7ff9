//! Reservation types.
//!
//! This module provides the persisted reservation record, its time window and
//! status, the party it belongs to, and the audit-log entry types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::table::{RestaurantId, TableId};

/// Identifier of a reservation.
pub type ReservationId = i64;

/// Identifier of a registered customer.
pub type CustomerId = i64;

/// Identifier of a walk-in or unregistered guest.
pub type GuestId = i64;

/// Identifier of the staff member (or process) performing an operation.
pub type ActorId = i64;

/// Actor id recorded for operations performed by the system itself.
pub const SYSTEM_ACTOR: ActorId = 0;

/// Longest window a reservation may hold, in minutes.
///
/// Occupancy lookups only read reservations dated the day before through the
/// day a window ends on, which is exact as long as no window is longer than
/// a day.
pub const MAX_DURATION_MINUTES: u32 = 24 * 60;

/// Lifecycle state of a reservation.
///
/// Stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    /// Recorded but not yet assigned tables.
    Pending,
    /// Tables assigned.
    Confirmed,
    /// The party has arrived.
    Seated,
    /// The party has left.
    Completed,
    /// Cancelled; no longer holds its tables.
    Cancelled,
}

impl ReservationStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Confirmed,
        Self::Seated,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Returns the storage representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Seated => "seated",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns whether a reservation in this status occupies its tables.
    ///
    /// Only cancelled reservations release their tables; completed ones keep
    /// their slot so that history stays consistent.
    #[must_use]
    pub const fn holds_tables(self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Seated => "Seated",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        };
        f.write_str(name)
    }
}

impl FromStr for ReservationStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError {
                field: "status".into(),
                message: format!("unknown reservation status '{s}'"),
            })
    }
}

/// Who a reservation is for.
///
/// A reservation links to exactly one of a registered customer or a guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Party {
    /// A registered customer.
    Customer(CustomerId),
    /// An unregistered guest.
    Guest(GuestId),
}

impl Party {
    /// Returns the customer id, if this party is a customer.
    #[must_use]
    pub const fn customer_id(self) -> Option<CustomerId> {
        match self {
            Self::Customer(id) => Some(id),
            Self::Guest(_) => None,
        }
    }

    /// Returns the guest id, if this party is a guest.
    #[must_use]
    pub const fn guest_id(self) -> Option<GuestId> {
        match self {
            Self::Guest(id) => Some(id),
            Self::Customer(_) => None,
        }
    }

    /// Rebuilds a party from the two nullable storage columns.
    ///
    /// # Errors
    ///
    /// Returns an error unless exactly one of the ids is present.
    pub fn from_columns(
        customer_id: Option<CustomerId>,
        guest_id: Option<GuestId>,
    ) -> Result<Self, ValidationError> {
        match (customer_id, guest_id) {
            (Some(id), None) => Ok(Self::Customer(id)),
            (None, Some(id)) => Ok(Self::Guest(id)),
            _ => Err(ValidationError {
                field: "party".into(),
                message: "reservation must reference exactly one of customer or guest".into(),
            }),
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Customer(id) => write!(f, "customer {id}"),
            Self::Guest(id) => write!(f, "guest {id}"),
        }
    }
}

/// The time slot a reservation occupies.
///
/// Windows are half-open: `[start, start + duration)`. Two windows that merely
/// touch do not overlap.
///
/// # Examples
///
/// ```
/// use chrono::{NaiveDate, NaiveTime};
/// use maitre::TimeWindow;
///
/// let date = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
/// let seven = TimeWindow::new(date, NaiveTime::from_hms_opt(19, 0, 0).unwrap(), 90).unwrap();
/// let eight = TimeWindow::new(date, NaiveTime::from_hms_opt(20, 0, 0).unwrap(), 60).unwrap();
/// let nine = TimeWindow::new(date, NaiveTime::from_hms_opt(20, 30, 0).unwrap(), 60).unwrap();
///
/// assert!(seven.overlaps(&eight));
/// assert!(!seven.overlaps(&nine));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    date: NaiveDate,
    time: NaiveTime,
    duration_minutes: u32,
}

impl TimeWindow {
    /// Creates a window starting at `time` on `date`.
    ///
    /// # Errors
    ///
    /// Returns an error if the duration is zero or longer than
    /// [`MAX_DURATION_MINUTES`].
    pub fn new(
        date: NaiveDate,
        time: NaiveTime,
        duration_minutes: u32,
    ) -> Result<Self, ValidationError> {
        if duration_minutes == 0 {
            return Err(ValidationError {
                field: "duration".into(),
                message: "duration must be at least one minute".into(),
            });
        }
        if duration_minutes > MAX_DURATION_MINUTES {
            return Err(ValidationError {
                field: "duration".into(),
                message: format!("duration must be at most {MAX_DURATION_MINUTES} minutes"),
            });
        }
        Ok(Self {
            date,
            time,
            duration_minutes,
        })
    }

    /// Returns the calendar date the window starts on.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the time of day the window starts at.
    #[must_use]
    pub const fn time(&self) -> NaiveTime {
        self.time
    }

    /// Returns the length of the window in minutes.
    #[must_use]
    pub const fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// Returns the start instant.
    #[must_use]
    pub fn start(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// Returns the exclusive end instant.
    #[must_use]
    pub fn end(&self) -> NaiveDateTime {
        self.start() + Duration::minutes(i64::from(self.duration_minutes))
    }

    /// Returns whether the two half-open windows share any instant.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start() < other.end() && other.start() < self.end()
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({} min)",
            self.date,
            self.time.format("%H:%M"),
            self.duration_minutes
        )
    }
}

/// A reservation with its table assignments.
///
/// # Examples
///
/// ```
/// use chrono::{NaiveDate, NaiveTime};
/// use maitre::{Party, Reservation, ReservationStatus, TimeWindow};
///
/// let window = TimeWindow::new(
///     NaiveDate::from_ymd_opt(2026, 10, 15).unwrap(),
///     NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
///     90,
/// )
/// .unwrap();
///
/// let reservation = Reservation::builder(1, Party::Guest(3), window, 4)
///     .status(ReservationStatus::Confirmed)
///     .table_ids(vec![2])
///     .build()
///     .unwrap();
///
/// assert_eq!(reservation.party_size(), 4);
/// assert_eq!(reservation.table_ids(), &[2]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    id: ReservationId,
    restaurant_id: RestaurantId,
    party: Party,
    window: TimeWindow,
    party_size: u32,
    status: ReservationStatus,
    notes: Option<String>,
    walk_in: bool,
    created_at: DateTime<Utc>,
    created_by: ActorId,
    table_ids: Vec<TableId>,
}

impl Reservation {
    /// Creates a new reservation builder.
    #[must_use]
    pub fn builder(
        restaurant_id: RestaurantId,
        party: Party,
        window: TimeWindow,
        party_size: u32,
    ) -> ReservationBuilder {
        ReservationBuilder {
            id: 0,
            restaurant_id,
            party,
            window,
            party_size,
            status: ReservationStatus::Pending,
            notes: None,
            walk_in: false,
            created_at: None,
            created_by: SYSTEM_ACTOR,
            table_ids: Vec::new(),
        }
    }

    /// Returns the reservation id (0 until stored).
    #[must_use]
    pub const fn id(&self) -> ReservationId {
        self.id
    }

    /// Returns the restaurant the reservation belongs to.
    #[must_use]
    pub const fn restaurant_id(&self) -> RestaurantId {
        self.restaurant_id
    }

    /// Returns who the reservation is for.
    #[must_use]
    pub const fn party(&self) -> Party {
        self.party
    }

    /// Returns the reserved time window.
    #[must_use]
    pub const fn window(&self) -> &TimeWindow {
        &self.window
    }

    /// Returns the number of people.
    #[must_use]
    pub const fn party_size(&self) -> u32 {
        self.party_size
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> ReservationStatus {
        self.status
    }

    /// Returns the optional free-text notes.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Returns whether this is a walk-in.
    #[must_use]
    pub const fn walk_in(&self) -> bool {
        self.walk_in
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the actor that created the reservation.
    #[must_use]
    pub const fn created_by(&self) -> ActorId {
        self.created_by
    }

    /// Returns the assigned table ids, sorted ascending.
    #[must_use]
    pub fn table_ids(&self) -> &[TableId] {
        &self.table_ids
    }

    /// Returns whether any tables are assigned.
    #[must_use]
    pub fn is_assigned(&self) -> bool {
        !self.table_ids.is_empty()
    }
}

/// Builder for creating `Reservation` instances.
#[derive(Debug)]
pub struct ReservationBuilder {
    id: ReservationId,
    restaurant_id: RestaurantId,
    party: Party,
    window: TimeWindow,
    party_size: u32,
    status: ReservationStatus,
    notes: Option<String>,
    walk_in: bool,
    created_at: Option<DateTime<Utc>>,
    created_by: ActorId,
    table_ids: Vec<TableId>,
}

impl ReservationBuilder {
    /// Sets the stored id.
    #[must_use]
    pub const fn id(mut self, id: ReservationId) -> Self {
        self.id = id;
        self
    }

    /// Sets the status.
    #[must_use]
    pub const fn status(mut self, status: ReservationStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the notes.
    ///
    /// The notes will be trimmed of leading/trailing whitespace.
    #[must_use]
    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes.map(|n| n.trim().to_string());
        self
    }

    /// Marks the reservation as a walk-in.
    #[must_use]
    pub const fn walk_in(mut self, walk_in: bool) -> Self {
        self.walk_in = walk_in;
        self
    }

    /// Sets the creation timestamp.
    #[must_use]
    pub const fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Sets the creating actor.
    #[must_use]
    pub const fn created_by(mut self, actor: ActorId) -> Self {
        self.created_by = actor;
        self
    }

    /// Sets the assigned tables.
    #[must_use]
    pub fn table_ids(mut self, mut table_ids: Vec<TableId>) -> Self {
        table_ids.sort_unstable();
        table_ids.dedup();
        self.table_ids = table_ids;
        self
    }

    /// Builds the reservation.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The party size is zero
    /// - The notes are provided but are empty after trimming
    pub fn build(self) -> Result<Reservation, ValidationError> {
        if self.party_size == 0 {
            return Err(ValidationError {
                field: "party_size".into(),
                message: "party size must be at least 1".into(),
            });
        }

        if let Some(ref notes) = self.notes {
            if notes.is_empty() {
                return Err(ValidationError {
                    field: "notes".into(),
                    message: "notes must be non-empty after trimming whitespace".into(),
                });
            }
        }

        Ok(Reservation {
            id: self.id,
            restaurant_id: self.restaurant_id,
            party: self.party,
            window: self.window,
            party_size: self.party_size,
            status: self.status,
            notes: self.notes,
            walk_in: self.walk_in,
            created_at: self.created_at.unwrap_or_else(Utc::now),
            created_by: self.created_by,
            table_ids: self.table_ids,
        })
    }
}

/// Kind of event recorded in the reservation audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReservationAction {
    /// The reservation was recorded.
    Created,
    /// The batch allocator assigned tables.
    AutoAllocated,
    /// An operator replaced the assigned tables.
    TablesReassigned,
    /// The status changed.
    StatusChanged,
}

impl ReservationAction {
    /// Returns the storage representation of the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::AutoAllocated => "AutoAllocated",
            Self::TablesReassigned => "TablesReassigned",
            Self::StatusChanged => "StatusChanged",
        }
    }
}

impl fmt::Display for ReservationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationAction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Created" => Ok(Self::Created),
            "AutoAllocated" => Ok(Self::AutoAllocated),
            "TablesReassigned" => Ok(Self::TablesReassigned),
            "StatusChanged" => Ok(Self::StatusChanged),
            other => Err(ValidationError {
                field: "action".into(),
                message: format!("unknown reservation action '{other}'"),
            }),
        }
    }
}

/// One row of the reservation audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Row id.
    pub id: i64,
    /// The reservation the entry belongs to.
    pub reservation_id: ReservationId,
    /// What happened.
    pub action: ReservationAction,
    /// Free-text detail.
    pub detail: String,
    /// Who did it.
    pub actor: ActorId,
    /// When it happened.
    pub created_at: DateTime<Utc>,
}

/// Error type for validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// A description of the validation failure.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation error for '{}': {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}
