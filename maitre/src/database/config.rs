//! Database configuration and connection parameters.
//!
//! This module provides configuration types for database connections,
//! including path resolution and connection parameters.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Name of the database file inside the data directory.
pub const DATABASE_FILE_NAME: &str = "maitre.db";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "MAITRE_DATA_DIR";

/// Configuration for database connections.
///
/// This struct contains all parameters needed to open and configure
/// a database connection, including the database file path, timeout
/// settings, access modes and the lock retry budget.
///
/// # Examples
///
/// ```
/// use maitre::database::DatabaseConfig;
/// use std::time::Duration;
///
/// // Create a configuration with default settings
/// let config = DatabaseConfig::new("/tmp/maitre.db");
///
/// // Customize the configuration
/// let config = DatabaseConfig::new("/tmp/maitre.db")
///     .with_busy_timeout(Duration::from_millis(10000))
///     .with_max_retries(5);
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to the database file.
    pub path: PathBuf,
    /// Busy timeout for database lock contention.
    pub busy_timeout: Duration,
    /// Whether to automatically create the database if it doesn't exist.
    pub auto_create: bool,
    /// Whether to open the database in read-only mode.
    pub read_only: bool,
    /// How many times a write transaction is retried after BUSY/LOCKED.
    pub max_retries: u32,
}

impl DatabaseConfig {
    /// Creates a new database configuration with default settings.
    ///
    /// Default settings:
    /// - `busy_timeout`: 5000ms
    /// - `auto_create`: true
    /// - `read_only`: false
    /// - `max_retries`: 3
    ///
    /// # Examples
    ///
    /// ```
    /// use maitre::database::DatabaseConfig;
    ///
    /// let config = DatabaseConfig::new("/tmp/maitre.db");
    /// assert_eq!(config.path.to_str().unwrap(), "/tmp/maitre.db");
    /// ```
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            busy_timeout: Duration::from_millis(5000),
            auto_create: true,
            read_only: false,
            max_retries: 3,
        }
    }

    /// Sets the busy timeout duration.
    ///
    /// The busy timeout determines how long the database connection will
    /// wait when encountering a locked database before returning an error.
    #[must_use]
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Sets how many times a write transaction is retried on lock contention.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Disables creation of a missing database file.
    #[must_use]
    pub fn without_auto_create(mut self) -> Self {
        self.auto_create = false;
        self
    }

    /// Configures the database to be opened in read-only mode.
    ///
    /// When read-only is enabled, `auto_create` is automatically disabled.
    ///
    /// # Examples
    ///
    /// ```
    /// use maitre::database::DatabaseConfig;
    ///
    /// let config = DatabaseConfig::new("/tmp/maitre.db").read_only();
    /// assert!(config.read_only);
    /// assert!(!config.auto_create);
    /// ```
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self.auto_create = false;
        self
    }
}

/// Returns the default data directory for maitre.
///
/// The default directory is `~/.maitre`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
///
/// # Examples
///
/// ```no_run
/// use maitre::database::default_data_dir;
///
/// let data_dir = default_data_dir().unwrap();
/// println!("Data directory: {}", data_dir.display());
/// ```
pub fn default_data_dir() -> Result<PathBuf> {
    home::home_dir()
        .map(|home| home.join(".maitre"))
        .ok_or_else(|| Error::validation("home_directory", "cannot determine home directory"))
}

/// Resolves the data directory using the environment or the default.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined and
/// `MAITRE_DATA_DIR` is not set.
pub fn resolve_data_dir() -> Result<PathBuf> {
    match std::env::var_os(DATA_DIR_ENV) {
        Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => default_data_dir(),
    }
}

/// Resolves the database path using environment variables or defaults.
///
/// The resolution order is:
/// 1. `$MAITRE_DATA_DIR/maitre.db` if the `MAITRE_DATA_DIR` environment variable is set
/// 2. `~/.maitre/maitre.db` otherwise
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined and
/// `MAITRE_DATA_DIR` is not set.
pub fn resolve_database_path() -> Result<PathBuf> {
    Ok(resolve_data_dir()?.join(DATABASE_FILE_NAME))
}
