//! Table command implementation.
//!
//! Takes a table out of service, or puts it back, by its number.

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, GlobalOptions, DEFAULT_RESTAURANT};
use clap::{ArgGroup, Args};
use maitre::{Database, RestaurantId};

/// Enable or disable a table.
#[derive(Args)]
#[command(group(ArgGroup::new("state").required(true).args(["enable", "disable"])))]
pub struct TableCommand {
    /// Table number
    #[arg(value_name = "NUMBER")]
    pub number: u32,

    /// Restaurant the table belongs to
    #[arg(long, value_name = "ID", default_value_t = DEFAULT_RESTAURANT, env = "MAITRE_RESTAURANT")]
    pub restaurant: RestaurantId,

    /// Make the table available for allocation
    #[arg(long)]
    pub enable: bool,

    /// Exclude the table from allocation
    #[arg(long)]
    pub disable: bool,
}

impl TableCommand {
    /// Execute the table command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;

        let table = Database::list_tables(db.connection(), self.restaurant)?
            .into_iter()
            .find(|table| table.number() == self.number)
            .ok_or_else(|| {
                CliError::InvalidArguments(format!(
                    "restaurant {} has no table #{}",
                    self.restaurant, self.number
                ))
            })?;

        Database::set_table_available(db.connection(), table.id(), self.enable)?;

        if !global.quiet {
            let state = if self.enable { "available" } else { "unavailable" };
            println!("Table #{} is now {state}", self.number);
        }
        Ok(())
    }
}
