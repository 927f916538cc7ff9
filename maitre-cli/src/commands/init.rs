//! Init command implementation.
//!
//! This module implements the `init` command for explicitly initializing
//! the maitre data directory and database.

use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::Parser;
use maitre::config::loader::USER_CONFIG_FILE;
use maitre::database::{default_data_dir, DATABASE_FILE_NAME};
use maitre::operations::{init_database, InitOptions};
use std::path::{Path, PathBuf};

/// Initialize maitre data directory and database.
#[derive(Parser)]
#[command(about = "Initialize maitre data directory and database")]
pub struct InitCommand {
    /// Data directory to initialize
    #[arg(long, value_name = "PATH")]
    data_dir: Option<PathBuf>,

    /// Overwrite existing database
    #[arg(long)]
    overwrite: bool,

    /// Create default configuration file
    #[arg(long)]
    with_config: bool,

    /// Preview actions without executing
    #[arg(long)]
    dry_run: bool,
}

impl InitCommand {
    /// Execute the init command.
    ///
    /// Note: This command does NOT accept --disable-autoinit (would be paradoxical).
    /// The --data-dir flag has a different meaning here (where to create, not where to find).
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        // Priority: command flag > global flag > default
        let data_dir = self
            .data_dir
            .clone()
            .or_else(|| global.data_dir.clone())
            .or_else(|| default_data_dir().ok())
            .ok_or_else(|| {
                CliError::Config(
                    "Could not determine data directory (home directory not found)".to_string(),
                )
            })?;

        if self.dry_run {
            println!("Dry-run mode: no changes will be made");
            println!();
            println!("Would initialize maitre in: {}", data_dir.display());
            for step in self.planned_steps(&data_dir) {
                println!("  - {step}");
            }
            return Ok(());
        }

        let options = InitOptions::new(data_dir)
            .with_overwrite(self.overwrite)
            .with_create_config(self.with_config);
        let result = init_database(&options)?;

        println!("Initialized maitre in: {}", result.data_dir.display());

        if result.data_dir_created {
            println!("  - Created data directory");
        }

        if result.database_created {
            if self.overwrite {
                println!("  - Recreated database");
            } else {
                println!("  - Created database");
            }
        }

        if result.config_created {
            println!("  - Created default configuration file");
        } else if self.with_config {
            println!("  - Configuration file already exists (not overwritten)");
        }

        Ok(())
    }

    /// Describes what a real run would do in `data_dir`.
    fn planned_steps(&self, data_dir: &Path) -> Vec<String> {
        let mut steps = Vec::new();
        if data_dir.exists() {
            steps.push(format!("Data directory already exists: {}", data_dir.display()));
        } else {
            steps.push(format!("Create data directory: {}", data_dir.display()));
        }

        let db_path = data_dir.join(DATABASE_FILE_NAME);
        match (db_path.exists(), self.overwrite) {
            (true, true) => {
                steps.push(format!("Remove existing database: {}", db_path.display()));
                steps.push(format!("Create new database: {}", db_path.display()));
            }
            (true, false) => steps.push(format!(
                "ERROR: Database already exists (use --overwrite to replace): {}",
                db_path.display()
            )),
            (false, _) => steps.push(format!("Create database: {}", db_path.display())),
        }

        if self.with_config {
            let config_path = data_dir.join(USER_CONFIG_FILE);
            if config_path.exists() {
                steps.push(format!(
                    "Configuration file already exists (will not overwrite): {}",
                    config_path.display()
                ));
            } else {
                steps.push(format!("Create configuration file: {}", config_path.display()));
            }
        }
        steps
    }
}
