//! Property-based tests for table selection.
//!
//! Random floor plans (up to eight free tables, some joinable, with random
//! configured joins between joinable tables) are fed to
//! [`TableAllocator::select`] and the result is checked against the
//! invariants every allocation must satisfy.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use crate::allocation::{
        AllocationConfig, AllocationResult, FailureKind, Strategy as Rule, TableAllocator,
    };
    use crate::table::{Table, TableJoin};

    /// Generates `(capacity, joinable)` pairs.
    fn layout_strategy() -> impl Strategy<Value = Vec<(u32, bool)>> {
        prop::collection::vec((1u32..=8, any::<bool>()), 1..=8)
    }

    fn build(layout: &[(u32, bool)], pairs: &[(usize, usize)]) -> (Vec<Table>, Vec<TableJoin>) {
        let tables: Vec<Table> = layout
            .iter()
            .zip(1i64..)
            .map(|(&(capacity, joinable), id)| {
                let number = u32::try_from(id).unwrap();
                Table::new(id, 1, number, capacity)
                    .unwrap()
                    .joinable(joinable)
            })
            .collect();

        let mut seen = HashSet::new();
        let joins = pairs
            .iter()
            .filter_map(|&(a, b)| {
                let (a, b) = (&tables[a % tables.len()], &tables[b % tables.len()]);
                if a.id() == b.id() || !a.is_joinable() || !b.is_joinable() {
                    return None;
                }
                let key = (a.id().min(b.id()), a.id().max(b.id()));
                seen.insert(key).then(|| {
                    TableJoin::new(a.id(), b.id(), a.capacity() + b.capacity()).unwrap()
                })
            })
            .collect();
        (tables, joins)
    }

    fn plan_strategy() -> impl Strategy<Value = (Vec<Table>, Vec<TableJoin>)> {
        (
            layout_strategy(),
            prop::collection::vec((0usize..8, 0usize..8), 0..10),
        )
            .prop_map(|(layout, pairs)| build(&layout, &pairs))
    }

    fn config_strategy() -> impl Strategy<Value = AllocationConfig> {
        (2usize..=4, any::<bool>()).prop_map(|(max_group_size, permissive_fallback)| {
            AllocationConfig {
                max_group_size,
                permissive_fallback,
            }
        })
    }

    fn is_standalone(table: &Table, joins: &[TableJoin]) -> bool {
        !joins.iter().any(|join| join.contains(table.id()))
    }

    proptest! {
        /// PROPERTY: every allocation seats the party with honest arithmetic.
        #[test]
        fn prop_allocation_seats_party(
            (tables, joins) in plan_strategy(),
            config in config_strategy(),
            party in 1u32..=30,
        ) {
            let allocator = TableAllocator::new(config.clone());
            if let AllocationResult::Allocated(allocation) = allocator.select(&tables, &joins, party) {
                let chosen: Vec<&Table> = tables
                    .iter()
                    .filter(|t| allocation.table_ids.contains(&t.id()))
                    .collect();
                prop_assert_eq!(chosen.len(), allocation.table_ids.len());

                let capacity: u32 = chosen.iter().map(|t| t.capacity()).sum();
                prop_assert_eq!(allocation.total_capacity, capacity);
                prop_assert!(capacity >= party);
                prop_assert_eq!(allocation.wasted_seats, capacity - party);

                let mut sorted = allocation.table_ids.clone();
                sorted.sort_unstable();
                sorted.dedup();
                prop_assert_eq!(&sorted, &allocation.table_ids);
                prop_assert!(allocation.table_ids.len() <= config.max_group_size);

                if chosen.len() > 1 {
                    prop_assert!(chosen.iter().all(|t| t.is_joinable()));
                }
                if allocation.strategy == Rule::PermissiveCombination {
                    prop_assert!(config.permissive_fallback);
                }
            }
        }

        /// PROPERTY: a standalone table of exactly the party size always wins.
        #[test]
        fn prop_exact_standalone_wins(
            (tables, joins) in plan_strategy(),
            pick in any::<prop::sample::Index>(),
        ) {
            let target = &tables[pick.index(tables.len())];
            prop_assume!(is_standalone(target, &joins));

            let party = target.capacity();
            let result = TableAllocator::default().select(&tables, &joins, party);
            let allocation = result.allocation().unwrap();
            prop_assert_eq!(allocation.strategy, Rule::ExactFit);
            prop_assert_eq!(allocation.wasted_seats, 0);
            prop_assert_eq!(allocation.table_ids.len(), 1);
        }

        /// PROPERTY: a best-fit standalone table is the smallest one that fits.
        #[test]
        fn prop_best_fit_is_smallest(
            (tables, joins) in plan_strategy(),
            party in 1u32..=8,
        ) {
            let result = TableAllocator::default().select(&tables, &joins, party);
            if let Some(allocation) = result.allocation() {
                if allocation.strategy == Rule::BestStandaloneFit {
                    let smallest = tables
                        .iter()
                        .filter(|t| is_standalone(t, &joins) && t.capacity() >= party)
                        .map(Table::capacity)
                        .min()
                        .unwrap();
                    prop_assert_eq!(allocation.total_capacity, smallest);
                }
            }
        }

        /// PROPERTY: selection is deterministic.
        #[test]
        fn prop_selection_is_deterministic(
            (tables, joins) in plan_strategy(),
            config in config_strategy(),
            party in 1u32..=30,
        ) {
            let allocator = TableAllocator::new(config);
            let mut reversed = tables.clone();
            reversed.reverse();
            prop_assert_eq!(
                allocator.select(&tables, &joins, party),
                allocator.select(&reversed, &joins, party)
            );
        }

        /// PROPERTY: capacity failures report the largest free table.
        #[test]
        fn prop_failure_reports_max_capacity(
            (tables, joins) in plan_strategy(),
            config in config_strategy(),
            party in 1u32..=40,
        ) {
            let result = TableAllocator::new(config).select(&tables, &joins, party);
            if let Some(failure) = result.failure() {
                let largest = tables.iter().map(Table::capacity).max().unwrap();
                prop_assert_eq!(
                    failure.kind,
                    FailureKind::InsufficientCapacity { max_capacity: largest }
                );
                prop_assert!(largest < party);
            }
        }
    }
}
