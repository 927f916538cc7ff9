//! Configuration system for maitre.
//!
//! This module provides hierarchical configuration with support for:
//! - YAML configuration files (user config and per-site files)
//! - Environment variable overrides
//! - Programmatic configuration via builder pattern
//! - Validation of every value before use
//!
//! # Configuration Precedence
//!
//! Configuration is merged from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Programmatic overrides (via `ConfigBuilder::with_config`)
//! 2. Environment variables (MAITRE_*)
//! 3. Private site config (`maitre.local.yaml`)
//! 4. Site config (`maitre.yaml`)
//! 5. User config (`~/.maitre/config.yaml`)
//! 6. Built-in defaults
//!
//! # Examples
//!
//! Loading from a specific directory:
//!
//! ```no_run
//! use maitre::config::ConfigBuilder;
//! use std::path::Path;
//!
//! let config = ConfigBuilder::new()
//!     .with_working_dir(Path::new("/srv/bistro"))
//!     .build()
//!     .unwrap();
//! println!("default duration: {} min", config.default_duration_minutes());
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

#[cfg(test)]
mod proptests;

pub use builder::ConfigBuilder;
pub use environment::EnvironmentConfig;
pub use loader::{ConfigLoader, ConfigSource};
pub use merger::ConfigMerger;
pub use schema::{AllocationSettings, Config, OutputFormat, DEFAULT_DURATION_MINUTES};
pub use validator::ConfigValidator;
