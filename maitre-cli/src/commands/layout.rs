//! Layout command implementation.
//!
//! `maitre layout import` loads a floor plan; `maitre layout tables` and
//! `maitre layout joins` show what a restaurant has configured.

use crate::error::CliError;
use crate::utils::{
    load_configuration, open_database, print_rows, GlobalOptions, OutputFormat, DEFAULT_RESTAURANT,
};
use clap::{Args, Subcommand};
use maitre::operations::import_floor_plan;
use maitre::{Database, FloorPlan, RestaurantId};
use std::path::PathBuf;

/// Manage a restaurant's tables and joins.
#[derive(Args)]
pub struct LayoutCommand {
    /// Restaurant to operate on
    #[arg(
        long,
        value_name = "ID",
        default_value_t = DEFAULT_RESTAURANT,
        env = "MAITRE_RESTAURANT",
        global = true
    )]
    pub restaurant: RestaurantId,

    #[command(subcommand)]
    pub action: LayoutAction,
}

/// Layout subcommands.
#[derive(Subcommand)]
pub enum LayoutAction {
    /// Add the tables and joins of a floor-plan file
    Import {
        /// YAML floor plan
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// List tables
    Tables {
        /// Output format (default: configured format, or table)
        #[arg(long, value_enum, ignore_case = true)]
        format: Option<OutputFormat>,
    },

    /// List configured joins
    Joins {
        /// Output format (default: configured format, or table)
        #[arg(long, value_enum, ignore_case = true)]
        format: Option<OutputFormat>,
    },
}

impl LayoutCommand {
    /// Execute the layout command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;

        match self.action {
            LayoutAction::Import { file } => {
                let plan = FloorPlan::load(&file)?;
                let imported = import_floor_plan(&mut db, self.restaurant, &plan)?;

                if !global.quiet {
                    println!(
                        "Imported {} table(s) and {} join(s) into restaurant {}",
                        imported.tables.len(),
                        imported.joins.len(),
                        self.restaurant
                    );
                    for table in &imported.tables {
                        println!("  #{} seats {}", table.number(), table.capacity());
                    }
                }
                Ok(())
            }
            LayoutAction::Tables { format } => {
                let tables = Database::list_tables(db.connection(), self.restaurant)?;
                print_rows(&tables, OutputFormat::resolve(format, &config))
            }
            LayoutAction::Joins { format } => {
                let joins = Database::list_joins(db.connection(), self.restaurant)?;
                print_rows(&joins, OutputFormat::resolve(format, &config))
            }
        }
    }
}
