//! Error types for the maitre library.
//!
//! This module provides the error hierarchy for all operations in the
//! maitre library, using `thiserror` for ergonomic error handling.
//!
//! Note that "no table fits" is not an error: the allocator reports it as a
//! failed [`AllocationResult`](crate::allocation::AllocationResult). Errors are
//! reserved for invalid input to write operations, storage failures and
//! conflicts detected while writing.

use std::path::PathBuf;

use thiserror::Error;

use crate::table::TableId;

/// Result type alias for operations that may fail with a maitre error.
///
/// # Examples
///
/// ```
/// use maitre::{Error, Result};
///
/// fn example_operation() -> Result<u32> {
///     Ok(4)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the maitre library.
#[derive(Debug, Error)]
pub enum Error {
    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An invalid filesystem path was provided.
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath {
        /// The invalid path.
        path: PathBuf,
        /// The reason the path is invalid.
        reason: String,
    },

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// The requested resource was not found.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// A table cannot be used for an assignment.
    #[error("table {table_id} unavailable: {reason}")]
    TableUnavailable {
        /// The offending table.
        table_id: TableId,
        /// Why the table cannot be used.
        reason: String,
    },

    /// A table was booked by another writer between allocation and commit.
    #[error("table {table_id} was booked concurrently for an overlapping window")]
    TableConflict {
        /// The table that is now double-booked.
        table_id: TableId,
    },

    /// A database lock timeout occurred.
    #[error("database lock timeout after {attempts} attempt(s)")]
    LockTimeout {
        /// Number of attempts made before giving up.
        attempts: u32,
    },

    /// The data directory was not found and auto-initialization is disabled.
    #[error("data directory not found: {}", path.display())]
    DataDirectoryNotFound {
        /// The expected path to the data directory.
        path: PathBuf,
    },

    /// Database corruption was detected.
    #[error("database corruption detected: {details}")]
    DatabaseCorruption {
        /// Details about the corruption.
        details: String,
    },

    /// An unsupported schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The expected schema version.
        expected: i32,
        /// The schema version found in the database.
        found: i32,
    },

    /// A notification could not be delivered.
    #[error("notification to {address} failed: {reason}")]
    Notification {
        /// The recipient address.
        address: String,
        /// The delivery failure.
        reason: String,
    },
}

impl From<crate::reservation::ValidationError> for Error {
    fn from(err: crate::reservation::ValidationError) -> Self {
        Self::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

impl Error {
    /// Shorthand for building a [`Error::Validation`].
    pub(crate) fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for building a [`Error::NotFound`].
    pub(crate) fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Check if the error is a SQLite BUSY or LOCKED condition.
    ///
    /// These are the only errors the transaction helper retries.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        match self {
            Self::Database(rusqlite::Error::SqliteFailure(err, _)) => matches!(
                err.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }

    /// Check if the error means the requested entity does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use maitre::Error;
    ///
    /// let err = Error::NotFound { resource: "reservation 7".into() };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = Error::Validation {
            field: "party_size".to_string(),
            message: "must be at least 1".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("validation error"));
        assert!(display.contains("party_size"));
        assert!(display.contains("must be at least 1"));
    }

    #[test]
    fn test_not_found_error() {
        let err = Error::not_found("reservation 42");
        let display = format!("{err}");
        assert!(display.contains("not found"));
        assert!(display.contains("42"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_table_unavailable_error() {
        let err = Error::TableUnavailable {
            table_id: 3,
            reason: "marked unavailable".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("table 3"));
        assert!(display.contains("marked unavailable"));
    }

    #[test]
    fn test_table_conflict_error() {
        let err = Error::TableConflict { table_id: 9 };
        assert!(format!("{err}").contains("table 9"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_lock_timeout_error() {
        let err = Error::LockTimeout { attempts: 3 };
        let display = format!("{err}");
        assert!(display.contains("lock timeout"));
        assert!(display.contains('3'));
    }

    #[test]
    fn test_unsupported_schema_version_error() {
        let err = Error::UnsupportedSchemaVersion {
            expected: 1,
            found: 2,
        };
        let display = format!("{err}");
        assert!(display.contains("expected 1"));
        assert!(display.contains("found 2"));
    }

    #[test]
    fn test_busy_detection() {
        let busy = Error::Database(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            None,
        ));
        assert!(busy.is_busy());

        let other = Error::Database(rusqlite::Error::QueryReturnedNoRows);
        assert!(!other.is_busy());
        assert!(!Error::validation("x", "y").is_busy());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(format!("{err}").contains("I/O error"));
    }
}
