//! Configuration merging and precedence handling.
//!
//! This module implements hierarchical merging of configuration sources.
//! Allocation settings merge field by field; every other key is replaced
//! whole by a higher-precedence source that sets it.

use crate::config::loader::ConfigSource;
use crate::config::schema::{AllocationSettings, Config};

/// Merges configuration sources according to precedence rules.
///
/// # Examples
///
/// ```
/// use maitre::config::{Config, ConfigMerger};
///
/// let low = Config { default_duration_minutes: Some(60), ..Default::default() };
/// let high = Config { default_duration_minutes: Some(120), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.default_duration_minutes, Some(120));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge multiple configuration sources into final config.
    ///
    /// Sources should be provided in order from lowest to highest precedence.
    #[must_use]
    pub fn merge(sources: Vec<ConfigSource>) -> Config {
        let mut result = Config::default();
        for source in sources {
            Self::merge_into(&mut result, &source.config);
        }
        result
    }

    /// Merge source config into target (source overwrites target).
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.default_duration_minutes.is_some() {
            target.default_duration_minutes = source.default_duration_minutes;
        }

        if source.disable_notifications.is_some() {
            target.disable_notifications = source.disable_notifications;
        }

        if source.disable_autoinit.is_some() {
            target.disable_autoinit = source.disable_autoinit;
        }

        if source.maximum_lock_wait_seconds.is_some() {
            target.maximum_lock_wait_seconds = source.maximum_lock_wait_seconds;
        }

        if source.output_format.is_some() {
            target.output_format = source.output_format;
        }

        if let Some(ref source_allocation) = source.allocation {
            target.allocation = Some(match &target.allocation {
                Some(target_allocation) => Self::merge_allocation(target_allocation, source_allocation),
                None => source_allocation.clone(),
            });
        }
    }

    fn merge_allocation(target: &AllocationSettings, source: &AllocationSettings) -> AllocationSettings {
        AllocationSettings {
            max_group_size: source.max_group_size.or(target.max_group_size),
            permissive_fallback: source.permissive_fallback.or(target.permissive_fallback),
        }
    }
}
