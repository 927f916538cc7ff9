//! Configuration schema definitions.
//!
//! This module defines the configuration structure for maitre: allocation
//! tunables, reservation defaults, notification and store behaviour, and the
//! output format of listing commands.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::allocation::AllocationConfig;

/// Duration used when a reservation request names none.
pub const DEFAULT_DURATION_MINUTES: u32 = 90;

/// Lock wait used when none is configured.
pub const DEFAULT_LOCK_WAIT_SECONDS: u64 = 5;

/// Complete configuration structure.
///
/// Every field is optional so that several sources can be layered; the
/// accessor methods supply the defaults.
///
/// # Examples
///
/// ```
/// use maitre::config::{AllocationSettings, Config};
///
/// let config = Config {
///     allocation: Some(AllocationSettings {
///         max_group_size: Some(3),
///         permissive_fallback: Some(false),
///     }),
///     ..Default::default()
/// };
///
/// let allocation = config.allocation_config();
/// assert_eq!(allocation.max_group_size, 3);
/// assert!(!allocation.permissive_fallback);
/// assert_eq!(config.default_duration_minutes(), 90);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Allocation engine settings.
    pub allocation: Option<AllocationSettings>,

    /// Reservation length used when a request names none.
    pub default_duration_minutes: Option<u32>,

    /// Do not send confirmation emails.
    pub disable_notifications: Option<bool>,

    /// Disable automatic database initialization.
    pub disable_autoinit: Option<bool>,

    /// Maximum time to wait for database lock acquisition (seconds).
    pub maximum_lock_wait_seconds: Option<u64>,

    /// Output format for list commands.
    pub output_format: Option<OutputFormat>,
}

impl Config {
    /// Returns the allocation engine configuration, filling in defaults.
    #[must_use]
    pub fn allocation_config(&self) -> AllocationConfig {
        let defaults = AllocationConfig::default();
        let Some(settings) = &self.allocation else {
            return defaults;
        };
        AllocationConfig {
            max_group_size: settings.max_group_size.unwrap_or(defaults.max_group_size),
            permissive_fallback: settings
                .permissive_fallback
                .unwrap_or(defaults.permissive_fallback),
        }
    }

    /// Returns the default reservation length in minutes.
    #[must_use]
    pub fn default_duration_minutes(&self) -> u32 {
        self.default_duration_minutes
            .unwrap_or(DEFAULT_DURATION_MINUTES)
    }

    /// Returns whether confirmation emails should be sent.
    #[must_use]
    pub fn notifications_enabled(&self) -> bool {
        !self.disable_notifications.unwrap_or(false)
    }

    /// Returns how long to wait for the database write lock.
    #[must_use]
    pub fn lock_wait(&self) -> Duration {
        Duration::from_secs(
            self.maximum_lock_wait_seconds
                .unwrap_or(DEFAULT_LOCK_WAIT_SECONDS),
        )
    }
}

/// Allocation settings as written in configuration files.
///
/// # Examples
///
/// ```
/// use maitre::config::AllocationSettings;
///
/// let settings: AllocationSettings =
///     serde_yaml::from_str("max_group_size: 2\n").unwrap();
/// assert_eq!(settings.max_group_size, Some(2));
/// assert_eq!(settings.permissive_fallback, None);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AllocationSettings {
    /// Largest number of tables combined for one party.
    pub max_group_size: Option<usize>,

    /// Fall back to combining joinable tables with no configured join.
    pub permissive_fallback: Option<bool>,
}

/// Output format for list commands.
///
/// # Examples
///
/// ```
/// use maitre::config::OutputFormat;
///
/// let format = OutputFormat::Json;
/// assert_eq!(format.to_string(), "json");
/// ```
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output format.
    Json,
    /// CSV output format.
    Csv,
    /// TSV output format.
    Tsv,
    /// Human-readable table format.
    Table,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
            Self::Tsv => write!(f, "tsv"),
            Self::Table => write!(f, "table"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            "table" => Ok(Self::Table),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}
