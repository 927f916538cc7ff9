//! The ordered cascade of seating strategies.
//!
//! Each [`Strategy`] looks at the same [`SelectionContext`] and either
//! proposes an [`Allocation`] or passes. [`Strategy::CASCADE`] lists them in
//! priority order; the first proposal wins and later strategies are never
//! consulted, even if they would waste fewer seats.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::table::{Table, TableId, TableJoin};

use super::graph::JoinGraph;
use super::search::find_group;
use super::{Allocation, AllocationConfig};

/// A rule for seating a party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// A standalone table whose capacity equals the party size.
    ExactFit,
    /// The smallest standalone table that seats the party.
    BestStandaloneFit,
    /// The smallest configured join whose members are both free.
    ConfiguredJoin,
    /// A connected group of joinable tables along configured joins.
    StrictCombination,
    /// Any group of joinable tables, treating all of them as adjacent.
    PermissiveCombination,
}

impl Strategy {
    /// Every strategy in the order they are tried.
    pub const CASCADE: [Self; 5] = [
        Self::ExactFit,
        Self::BestStandaloneFit,
        Self::ConfiguredJoin,
        Self::StrictCombination,
        Self::PermissiveCombination,
    ];

    /// Short human-readable name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ExactFit => "exact fit",
            Self::BestStandaloneFit => "best standalone fit",
            Self::ConfiguredJoin => "configured join",
            Self::StrictCombination => "joined tables",
            Self::PermissiveCombination => "ad-hoc joined tables",
        }
    }

    /// Runs this strategy against the context.
    #[must_use]
    pub fn apply(self, ctx: &SelectionContext<'_>) -> Option<Allocation> {
        let party_size = ctx.party_size;
        match self {
            Self::ExactFit => ctx
                .standalone()
                .find(|table| table.capacity() == party_size)
                .map(|table| ctx.allocate(self, &[table])),
            Self::BestStandaloneFit => ctx
                .standalone()
                .filter(|table| table.capacity() >= party_size)
                .min_by_key(|table| (table.capacity(), table.id()))
                .map(|table| ctx.allocate(self, &[table])),
            Self::ConfiguredJoin => ctx
                .joins
                .iter()
                .filter(|join| join.total_capacity() >= party_size)
                .filter_map(|join| {
                    let (a, b) = join.tables();
                    Some((join, ctx.free_table(a)?, ctx.free_table(b)?))
                })
                .min_by_key(|(join, _, _)| (join.total_capacity(), join.tables()))
                .map(|(_, a, b)| ctx.allocate(self, &[a, b])),
            Self::StrictCombination => {
                let graph = JoinGraph::from_joins(ctx.joins);
                ctx.combine(self, &graph)
            }
            Self::PermissiveCombination => {
                if !ctx.config.permissive_fallback {
                    return None;
                }
                let ids: Vec<TableId> = ctx.joinable().map(Table::id).collect();
                ctx.combine(self, &JoinGraph::complete(&ids))
            }
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything a strategy may look at.
#[derive(Debug)]
pub struct SelectionContext<'a> {
    free: &'a [Table],
    joins: &'a [TableJoin],
    joined: HashSet<TableId>,
    party_size: u32,
    config: &'a AllocationConfig,
}

impl<'a> SelectionContext<'a> {
    /// Creates a context.
    ///
    /// `free` are the tables free for the requested window; `joins` are all
    /// configured joins of the restaurant, whether their members are free or
    /// not.
    #[must_use]
    pub fn new(
        free: &'a [Table],
        joins: &'a [TableJoin],
        party_size: u32,
        config: &'a AllocationConfig,
    ) -> Self {
        let joined = joins
            .iter()
            .flat_map(|join| {
                let (a, b) = join.tables();
                [a, b]
            })
            .collect();
        Self {
            free,
            joins,
            joined,
            party_size,
            config,
        }
    }

    /// Free tables that belong to no configured join, in (capacity, id) order.
    pub fn standalone(&self) -> impl Iterator<Item = &'a Table> + '_ {
        self.free
            .iter()
            .filter(move |table| !self.joined.contains(&table.id()))
    }

    /// Free tables flagged joinable.
    pub fn joinable(&self) -> impl Iterator<Item = &'a Table> + '_ {
        self.free.iter().filter(|table| table.is_joinable())
    }

    fn free_table(&self, id: TableId) -> Option<&'a Table> {
        self.free.iter().find(|table| table.id() == id)
    }

    fn combine(&self, strategy: Strategy, graph: &JoinGraph) -> Option<Allocation> {
        let joinable: Vec<Table> = self.joinable().cloned().collect();
        let group = find_group(&joinable, graph, self.party_size, self.config.max_group_size)?;
        let members: Vec<&Table> = group
            .table_ids
            .iter()
            .filter_map(|&id| self.free_table(id))
            .collect();
        Some(self.allocate(strategy, &members))
    }

    fn allocate(&self, strategy: Strategy, tables: &[&Table]) -> Allocation {
        let total_capacity: u32 = tables.iter().map(|table| table.capacity()).sum();
        let wasted_seats = total_capacity.saturating_sub(self.party_size);
        let numbers = tables
            .iter()
            .map(|table| format!("#{}", table.number()))
            .collect::<Vec<_>>()
            .join(" + ");
        let noun = if tables.len() == 1 { "table" } else { "tables" };
        let mut table_ids: Vec<TableId> = tables.iter().map(|table| table.id()).collect();
        table_ids.sort_unstable();

        Allocation {
            table_ids,
            total_capacity,
            wasted_seats,
            strategy,
            description: format!(
                "{}: {noun} {numbers} ({total_capacity} seats, {wasted_seats} wasted)",
                strategy.label()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(id: TableId, capacity: u32, joinable: bool) -> Table {
        Table::new(id, 1, u32::try_from(id).unwrap(), capacity)
            .unwrap()
            .joinable(joinable)
    }

    fn join(a: &Table, b: &Table) -> TableJoin {
        TableJoin::new(a.id(), b.id(), a.capacity() + b.capacity()).unwrap()
    }

    fn run(strategy: Strategy, free: &[Table], joins: &[TableJoin], party: u32) -> Option<Allocation> {
        let config = AllocationConfig::default();
        strategy.apply(&SelectionContext::new(free, joins, party, &config))
    }

    #[test]
    fn test_exact_fit_ignores_joined_tables() {
        let free = vec![table(1, 4, true), table(2, 4, true), table(3, 4, false)];
        let joins = vec![join(&free[0], &free[1])];

        let allocation = run(Strategy::ExactFit, &free, &joins, 4).unwrap();
        assert_eq!(allocation.table_ids, vec![3]);
        assert_eq!(allocation.wasted_seats, 0);
        assert_eq!(allocation.description, "exact fit: table #3 (4 seats, 0 wasted)");
    }

    #[test]
    fn test_exact_fit_takes_lowest_id() {
        let free = vec![table(2, 4, false), table(5, 4, false)];
        let allocation = run(Strategy::ExactFit, &free, &[], 4).unwrap();
        assert_eq!(allocation.table_ids, vec![2]);
    }

    #[test]
    fn test_best_standalone_fit() {
        let free = vec![table(1, 2, false), table(2, 6, false), table(3, 8, false)];
        let allocation = run(Strategy::BestStandaloneFit, &free, &[], 5).unwrap();
        assert_eq!(allocation.table_ids, vec![2]);
        assert_eq!(allocation.wasted_seats, 1);

        assert!(run(Strategy::BestStandaloneFit, &free, &[], 9).is_none());
    }

    #[test]
    fn test_configured_join_needs_both_free() {
        let a = table(1, 2, true);
        let b = table(2, 2, true);
        let c = table(3, 4, true);
        let joins = vec![join(&a, &b), join(&b, &c)];

        // Table 2 is busy, so neither join can be used
        let free = vec![a.clone(), c.clone()];
        assert!(run(Strategy::ConfiguredJoin, &free, &joins, 4).is_none());

        let free = vec![a, b, c];
        let allocation = run(Strategy::ConfiguredJoin, &free, &joins, 4).unwrap();
        assert_eq!(allocation.table_ids, vec![1, 2]);
        let allocation = run(Strategy::ConfiguredJoin, &free, &joins, 5).unwrap();
        assert_eq!(allocation.table_ids, vec![2, 3]);
        assert_eq!(allocation.wasted_seats, 1);
    }

    #[test]
    fn test_busy_join_member_is_still_not_standalone() {
        let a = table(1, 4, true);
        let b = table(2, 4, true);
        let joins = vec![join(&a, &b)];
        let free = vec![a];
        assert!(run(Strategy::ExactFit, &free, &joins, 4).is_none());
    }

    #[test]
    fn test_strict_combination_follows_joins() {
        let free = vec![table(1, 2, true), table(2, 2, true), table(3, 2, true)];
        let joins = vec![join(&free[0], &free[1]), join(&free[1], &free[2])];

        let allocation = run(Strategy::StrictCombination, &free, &joins, 6).unwrap();
        assert_eq!(allocation.table_ids, vec![1, 2, 3]);
        assert!(allocation.description.starts_with("joined tables: tables #1 + #2 + #3"));
    }

    #[test]
    fn test_permissive_only_when_enabled() {
        let free = vec![table(1, 3, true), table(2, 3, true)];

        assert!(run(Strategy::StrictCombination, &free, &[], 6).is_none());
        let allocation = run(Strategy::PermissiveCombination, &free, &[], 6).unwrap();
        assert_eq!(allocation.table_ids, vec![1, 2]);

        let config = AllocationConfig {
            permissive_fallback: false,
            ..AllocationConfig::default()
        };
        let ctx = SelectionContext::new(&free, &[], 6, &config);
        assert!(Strategy::PermissiveCombination.apply(&ctx).is_none());
    }

    #[test]
    fn test_combinations_skip_non_joinable() {
        let free = vec![table(1, 3, true), table(2, 3, false)];
        assert!(run(Strategy::PermissiveCombination, &free, &[], 6).is_none());
    }

    #[test]
    fn test_cascade_order() {
        assert_eq!(Strategy::CASCADE[0], Strategy::ExactFit);
        assert_eq!(Strategy::CASCADE[4], Strategy::PermissiveCombination);
        assert_eq!(format!("{}", Strategy::ConfiguredJoin), "configured join");
    }
}
