//! Floor-plan import.
//!
//! A floor plan is a YAML document listing a restaurant's tables and the
//! configured joins between them, by table number:
//!
//! ```yaml
//! tables:
//!   - { number: 1, capacity: 2, joinable: true }
//!   - { number: 2, capacity: 2, joinable: true }
//!   - { number: 8, capacity: 6 }
//! joins:
//!   - [1, 2]
//! ```
//!
//! Joins may also name tables that already exist in the restaurant.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::{Error, Result};
use crate::table::{NewTable, RestaurantId, Table, TableJoin};

/// A pair of table numbers to join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinSpec(pub u32, pub u32);

/// Tables and joins to add to a restaurant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FloorPlan {
    /// Tables to create.
    #[serde(default)]
    pub tables: Vec<NewTable>,
    /// Joins to configure, by table number.
    #[serde(default)]
    pub joins: Vec<JoinSpec>,
}

impl FloorPlan {
    /// Parses a floor plan from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or a table fails validation.
    ///
    /// # Examples
    ///
    /// ```
    /// use maitre::operations::FloorPlan;
    ///
    /// let plan = FloorPlan::from_yaml("tables:\n  - { number: 4, capacity: 4 }\n").unwrap();
    /// assert_eq!(plan.tables.len(), 1);
    /// assert!(plan.joins.is_empty());
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let plan: Self = serde_yaml::from_str(yaml)?;
        for table in &plan.tables {
            table.validate()?;
        }
        Ok(plan)
    }

    /// Reads and parses a floor-plan file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| Error::InvalidPath {
            path: path.to_path_buf(),
            reason: format!("Failed to read floor plan: {e}"),
        })?;
        Self::from_yaml(&contents)
    }
}

/// What an import created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LayoutImport {
    /// The new tables.
    pub tables: Vec<Table>,
    /// The new joins.
    pub joins: Vec<TableJoin>,
}

/// Adds a floor plan to a restaurant in one transaction.
///
/// # Errors
///
/// Returns an error, with nothing written, if a table number is already
/// taken, a join names an unknown number, or a join fails validation.
pub fn import_floor_plan(
    db: &mut Database,
    restaurant_id: RestaurantId,
    plan: &FloorPlan,
) -> Result<LayoutImport> {
    let imported = db.with_transaction(|tx| {
        let mut result = LayoutImport::default();
        for table in &plan.tables {
            result
                .tables
                .push(Database::insert_table(tx, restaurant_id, table)?);
        }

        let by_number: HashMap<u32, Table> = Database::list_tables(tx, restaurant_id)?
            .into_iter()
            .map(|table| (table.number(), table))
            .collect();
        let lookup = |number: u32| {
            by_number
                .get(&number)
                .map(Table::id)
                .ok_or_else(|| Error::not_found(format!("table #{number}")))
        };

        for &JoinSpec(a, b) in &plan.joins {
            result
                .joins
                .push(Database::insert_join(tx, lookup(a)?, lookup(b)?)?);
        }
        Ok(result)
    })?;

    log::info!(
        "imported {} table(s) and {} join(s) into restaurant {restaurant_id}",
        imported.tables.len(),
        imported.joins.len()
    );
    Ok(imported)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::create_test_database;
    use tempfile::TempDir;

    const PLAN: &str = r"
tables:
  - { number: 1, capacity: 2, joinable: true }
  - { number: 2, capacity: 2, joinable: true }
  - { number: 4, capacity: 4 }
  - { number: 8, capacity: 6, available: false }
joins:
  - [1, 2]
";

    #[test]
    fn test_parse_plan() {
        let plan = FloorPlan::from_yaml(PLAN).unwrap();
        assert_eq!(plan.tables.len(), 4);
        assert!(plan.tables[0].joinable);
        assert!(!plan.tables[2].joinable);
        assert!(!plan.tables[3].available);
        assert_eq!(plan.joins, vec![JoinSpec(1, 2)]);
    }

    #[test]
    fn test_parse_rejects_bad_tables() {
        assert!(FloorPlan::from_yaml("tables:\n  - { number: 1, capacity: 0 }\n").is_err());
        assert!(FloorPlan::from_yaml("tables:\n  - { number: 1, capacity: 2, seats: 3 }\n").is_err());
    }

    #[test]
    fn test_import_plan() {
        let mut db = create_test_database();
        let plan = FloorPlan::from_yaml(PLAN).unwrap();

        let imported = import_floor_plan(&mut db, 1, &plan).unwrap();
        assert_eq!(imported.tables.len(), 4);
        assert_eq!(imported.joins.len(), 1);
        assert_eq!(imported.joins[0].total_capacity(), 4);

        let tables = Database::list_tables(db.connection(), 1).unwrap();
        assert_eq!(tables.len(), 4);
        assert_eq!(Database::list_available_tables(db.connection(), 1).unwrap().len(), 3);
    }

    #[test]
    fn test_import_is_atomic() {
        let mut db = create_test_database();
        let plan = FloorPlan::from_yaml(
            "tables:\n  - { number: 1, capacity: 2, joinable: true }\njoins:\n  - [1, 3]\n",
        )
        .unwrap();

        let err = import_floor_plan(&mut db, 1, &plan).unwrap_err();
        assert!(err.is_not_found());
        assert!(Database::list_tables(db.connection(), 1).unwrap().is_empty());
    }

    #[test]
    fn test_join_to_existing_table() {
        let mut db = create_test_database();
        Database::insert_table(db.connection(), 1, &NewTable::new(1, 2).joinable(true)).unwrap();
        let plan = FloorPlan::from_yaml(
            "tables:\n  - { number: 2, capacity: 3, joinable: true }\njoins:\n  - [2, 1]\n",
        )
        .unwrap();

        let imported = import_floor_plan(&mut db, 1, &plan).unwrap();
        assert_eq!(imported.joins[0].total_capacity(), 5);
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("floor.yaml");
        fs::write(&path, PLAN).unwrap();
        assert_eq!(FloorPlan::load(&path).unwrap().tables.len(), 4);
        assert!(FloorPlan::load(&dir.path().join("missing.yaml")).is_err());
    }
}
