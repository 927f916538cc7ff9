//! Environment variable handling for configuration overrides.
//!
//! This module provides support for MAITRE_* environment variables that
//! override configuration file values.

use std::env;
use std::str::FromStr;

use crate::config::schema::{Config, OutputFormat};
use crate::error::{Error, Result};

/// Overrides `allocation.max_group_size`.
pub const MAX_GROUP_SIZE_ENV: &str = "MAITRE_MAX_GROUP_SIZE";
/// Overrides `allocation.permissive_fallback`.
pub const PERMISSIVE_FALLBACK_ENV: &str = "MAITRE_PERMISSIVE_FALLBACK";
/// Overrides `default_duration_minutes`.
pub const DEFAULT_DURATION_ENV: &str = "MAITRE_DEFAULT_DURATION_MINUTES";
/// Overrides `disable_notifications`.
pub const DISABLE_NOTIFICATIONS_ENV: &str = "MAITRE_DISABLE_NOTIFICATIONS";
/// Overrides `disable_autoinit`.
pub const DISABLE_AUTOINIT_ENV: &str = "MAITRE_DISABLE_AUTOINIT";
/// Overrides `maximum_lock_wait_seconds`.
pub const LOCK_WAIT_ENV: &str = "MAITRE_MAXIMUM_LOCK_WAIT_SECONDS";
/// Overrides `output_format`.
pub const OUTPUT_FORMAT_ENV: &str = "MAITRE_OUTPUT_FORMAT";

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use maitre::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to config.
    ///
    /// Reads all MAITRE_* configuration variables and applies them with
    /// higher precedence than file-based configs.
    ///
    /// # Errors
    ///
    /// Returns an error if any environment variable value is invalid
    /// (e.g., non-numeric duration, invalid boolean).
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Ok(val) = env::var(MAX_GROUP_SIZE_ENV) {
            let allocation = config.allocation.get_or_insert_with(Default::default);
            allocation.max_group_size = Some(Self::parse_number(MAX_GROUP_SIZE_ENV, &val)?);
        }

        if let Ok(val) = env::var(PERMISSIVE_FALLBACK_ENV) {
            let allocation = config.allocation.get_or_insert_with(Default::default);
            allocation.permissive_fallback = Some(Self::parse_bool(PERMISSIVE_FALLBACK_ENV, &val)?);
        }

        if let Ok(val) = env::var(DEFAULT_DURATION_ENV) {
            config.default_duration_minutes = Some(Self::parse_number(DEFAULT_DURATION_ENV, &val)?);
        }

        if let Ok(val) = env::var(DISABLE_NOTIFICATIONS_ENV) {
            config.disable_notifications = Some(Self::parse_bool(DISABLE_NOTIFICATIONS_ENV, &val)?);
        }

        if let Ok(val) = env::var(DISABLE_AUTOINIT_ENV) {
            config.disable_autoinit = Some(Self::parse_bool(DISABLE_AUTOINIT_ENV, &val)?);
        }

        if let Ok(val) = env::var(LOCK_WAIT_ENV) {
            config.maximum_lock_wait_seconds = Some(Self::parse_number(LOCK_WAIT_ENV, &val)?);
        }

        if let Ok(val) = env::var(OUTPUT_FORMAT_ENV) {
            config.output_format =
                Some(
                    OutputFormat::from_str(&val).map_err(|message| Error::Validation {
                        field: OUTPUT_FORMAT_ENV.into(),
                        message,
                    })?,
                );
        }

        Ok(())
    }

    /// Parse a boolean value from a string.
    ///
    /// Accepts: true/1/yes/on for true, false/0/no/off for false (case-insensitive).
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }

    fn parse_number<T: FromStr>(field: &str, s: &str) -> Result<T> {
        s.trim().parse().map_err(|_| Error::Validation {
            field: field.into(),
            message: format!("Must be a non-negative integer, got '{s}'"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const ALL_VARS: [&str; 7] = [
        MAX_GROUP_SIZE_ENV,
        PERMISSIVE_FALLBACK_ENV,
        DEFAULT_DURATION_ENV,
        DISABLE_NOTIFICATIONS_ENV,
        DISABLE_AUTOINIT_ENV,
        LOCK_WAIT_ENV,
        OUTPUT_FORMAT_ENV,
    ];

    fn clear_env() {
        for var in ALL_VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_parse_bool_true_variants() {
        for value in ["true", "TRUE", "1", "yes", "YES", "on", "ON"] {
            assert!(EnvironmentConfig::parse_bool("test", value).unwrap());
        }
    }

    #[test]
    fn test_parse_bool_false_variants() {
        for value in ["false", "FALSE", "0", "no", "NO", "off", "OFF"] {
            assert!(!EnvironmentConfig::parse_bool("test", value).unwrap());
        }
    }

    #[test]
    fn test_parse_bool_invalid() {
        let result = EnvironmentConfig::parse_bool("test", "maybe");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_number() {
        let value: u32 = EnvironmentConfig::parse_number("test", " 45 ").unwrap();
        assert_eq!(value, 45);
        assert!(EnvironmentConfig::parse_number::<u32>("test", "-1").is_err());
        assert!(EnvironmentConfig::parse_number::<u64>("test", "soon").is_err());
    }

    #[test]
    #[serial]
    fn test_apply_overrides() {
        clear_env();
        env::set_var(MAX_GROUP_SIZE_ENV, "3");
        env::set_var(PERMISSIVE_FALLBACK_ENV, "off");
        env::set_var(DEFAULT_DURATION_ENV, "120");
        env::set_var(DISABLE_NOTIFICATIONS_ENV, "yes");
        env::set_var(OUTPUT_FORMAT_ENV, "json");

        let mut config = Config::default();
        EnvironmentConfig::apply_overrides(&mut config).unwrap();
        clear_env();

        let allocation = config.allocation_config();
        assert_eq!(allocation.max_group_size, 3);
        assert!(!allocation.permissive_fallback);
        assert_eq!(config.default_duration_minutes, Some(120));
        assert_eq!(config.disable_notifications, Some(true));
        assert_eq!(config.output_format, Some(OutputFormat::Json));
        assert_eq!(config.disable_autoinit, None);
    }

    #[test]
    #[serial]
    fn test_invalid_override_is_rejected() {
        clear_env();
        env::set_var(LOCK_WAIT_ENV, "forever");

        let mut config = Config::default();
        let result = EnvironmentConfig::apply_overrides(&mut config);
        clear_env();

        match result {
            Err(Error::Validation { field, .. }) => assert_eq!(field, LOCK_WAIT_ENV),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
