//! Physical tables and configured joins.
//!
//! A [`Table`] is a seat pool with a fixed capacity. Joinable tables may be
//! pushed together for larger parties; a [`TableJoin`] records an
//! operator-preferred pairing of two joinable tables.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::reservation::ValidationError;

/// Identifier of a restaurant.
pub type RestaurantId = i64;

/// Identifier of a table.
pub type TableId = i64;

/// A physical table in a restaurant.
///
/// # Examples
///
/// ```
/// use maitre::Table;
///
/// let table = Table::new(1, 10, 4, 4).unwrap();
/// assert_eq!(table.capacity(), 4);
/// assert!(table.is_available());
/// assert!(!table.is_joinable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    id: TableId,
    restaurant_id: RestaurantId,
    number: u32,
    capacity: u32,
    joinable: bool,
    available: bool,
}

impl Table {
    /// Creates an available, non-joinable table.
    ///
    /// # Errors
    ///
    /// Returns an error if `number` or `capacity` is zero.
    pub fn new(
        id: TableId,
        restaurant_id: RestaurantId,
        number: u32,
        capacity: u32,
    ) -> Result<Self, ValidationError> {
        if number == 0 {
            return Err(ValidationError {
                field: "number".into(),
                message: "table number must be positive".into(),
            });
        }
        if capacity == 0 {
            return Err(ValidationError {
                field: "capacity".into(),
                message: "table capacity must be positive".into(),
            });
        }

        Ok(Self {
            id,
            restaurant_id,
            number,
            capacity,
            joinable: false,
            available: true,
        })
    }

    /// Sets the joinable flag.
    #[must_use]
    pub const fn joinable(mut self, joinable: bool) -> Self {
        self.joinable = joinable;
        self
    }

    /// Sets the available flag.
    #[must_use]
    pub const fn available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    /// Returns the table id.
    #[must_use]
    pub const fn id(&self) -> TableId {
        self.id
    }

    /// Returns the owning restaurant.
    #[must_use]
    pub const fn restaurant_id(&self) -> RestaurantId {
        self.restaurant_id
    }

    /// Returns the table's ordinal number within its restaurant.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Returns the number of seats.
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Returns whether the table may be combined with others.
    #[must_use]
    pub const fn is_joinable(&self) -> bool {
        self.joinable
    }

    /// Returns whether staff have marked the table usable.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.available
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} ({} seats)", self.number, self.capacity)
    }
}

/// Definition of a table to be inserted.
///
/// Ids are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewTable {
    /// Ordinal number, unique per restaurant.
    pub number: u32,
    /// Number of seats.
    pub capacity: u32,
    /// Whether the table may be combined with others.
    #[serde(default)]
    pub joinable: bool,
    /// Whether the table is usable.
    #[serde(default = "default_available")]
    pub available: bool,
}

const fn default_available() -> bool {
    true
}

impl NewTable {
    /// Creates an available, non-joinable table definition.
    #[must_use]
    pub const fn new(number: u32, capacity: u32) -> Self {
        Self {
            number,
            capacity,
            joinable: false,
            available: true,
        }
    }

    /// Sets the joinable flag.
    #[must_use]
    pub const fn joinable(mut self, joinable: bool) -> Self {
        self.joinable = joinable;
        self
    }

    /// Sets the available flag.
    #[must_use]
    pub const fn available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    /// Validates the definition.
    ///
    /// # Errors
    ///
    /// Returns an error if `number` or `capacity` is zero.
    pub fn validate(&self) -> Result<(), ValidationError> {
        Table::new(0, 0, self.number, self.capacity).map(|_| ())
    }
}

/// A configured join between two joinable tables.
///
/// The pair is unordered; it is stored normalised with the lower id first so
/// that `(a, b)` and `(b, a)` are the same join.
///
/// # Examples
///
/// ```
/// use maitre::TableJoin;
///
/// let join = TableJoin::new(7, 2, 6).unwrap();
/// assert_eq!(join.tables(), (2, 7));
/// assert!(join.contains(7));
/// assert_eq!(join.partner_of(2), Some(7));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableJoin {
    first: TableId,
    second: TableId,
    total_capacity: u32,
}

impl TableJoin {
    /// Creates a join between two distinct tables.
    ///
    /// # Errors
    ///
    /// Returns an error if both ids are the same.
    pub fn new(a: TableId, b: TableId, total_capacity: u32) -> Result<Self, ValidationError> {
        if a == b {
            return Err(ValidationError {
                field: "table_join".into(),
                message: format!("table {a} cannot be joined with itself"),
            });
        }
        let (first, second) = if a < b { (a, b) } else { (b, a) };
        Ok(Self {
            first,
            second,
            total_capacity,
        })
    }

    /// Returns the member ids, lower id first.
    #[must_use]
    pub const fn tables(&self) -> (TableId, TableId) {
        (self.first, self.second)
    }

    /// Returns the combined capacity of both members.
    #[must_use]
    pub const fn total_capacity(&self) -> u32 {
        self.total_capacity
    }

    /// Returns whether `table` is a member of this join.
    #[must_use]
    pub const fn contains(&self, table: TableId) -> bool {
        self.first == table || self.second == table
    }

    /// Returns the other member of the join, if `table` is a member.
    #[must_use]
    pub const fn partner_of(&self, table: TableId) -> Option<TableId> {
        if self.first == table {
            Some(self.second)
        } else if self.second == table {
            Some(self.first)
        } else {
            None
        }
    }
}
