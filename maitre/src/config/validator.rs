//! Configuration validation.
//!
//! This module checks that configuration values are in range before they
//! reach the allocation engine or the store.

use crate::allocation::search::{MAX_GROUP_SIZE, MIN_GROUP_SIZE};
use crate::config::schema::{AllocationSettings, Config};
use crate::error::{Error, Result};
use crate::reservation::MAX_DURATION_MINUTES;

/// Longest reservation accepted as a default, in minutes.
pub const MAX_DEFAULT_DURATION_MINUTES: u32 = MAX_DURATION_MINUTES;

/// Validates configuration values.
///
/// # Examples
///
/// ```
/// use maitre::config::{Config, ConfigValidator};
///
/// let config = Config::default();
/// ConfigValidator::validate(&config).unwrap();
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns validation errors for invalid configurations.
    pub fn validate(config: &Config) -> Result<()> {
        if let Some(ref allocation) = config.allocation {
            Self::validate_allocation(allocation)?;
        }

        if let Some(minutes) = config.default_duration_minutes {
            if minutes == 0 || minutes > MAX_DEFAULT_DURATION_MINUTES {
                return Err(Error::Validation {
                    field: "default_duration_minutes".into(),
                    message: format!("Must be between 1 and {MAX_DEFAULT_DURATION_MINUTES}"),
                });
            }
        }

        if let Some(timeout) = config.maximum_lock_wait_seconds {
            if timeout == 0 {
                return Err(Error::Validation {
                    field: "maximum_lock_wait_seconds".into(),
                    message: "Timeout must be greater than 0".into(),
                });
            }
        }

        Ok(())
    }

    fn validate_allocation(allocation: &AllocationSettings) -> Result<()> {
        if let Some(size) = allocation.max_group_size {
            if !(MIN_GROUP_SIZE..=MAX_GROUP_SIZE).contains(&size) {
                return Err(Error::Validation {
                    field: "allocation.max_group_size".into(),
                    message: format!("Must be between {MIN_GROUP_SIZE} and {MAX_GROUP_SIZE}"),
                });
            }
        }
        Ok(())
    }
}
