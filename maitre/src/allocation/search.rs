//! Combination search over joinable tables.
//!
//! One search covers every group size. Sizes are tried in ascending order and
//! the first size with any connected, large-enough group wins. Within sizes up
//! to [`WASTE_MINIMISED_UP_TO`] the group with the fewest wasted seats is
//! chosen (a zero-waste group ends the search at once); above that the first
//! match in enumeration order is taken.

use crate::table::{Table, TableId};

use super::graph::JoinGraph;

/// Largest group size the search will ever build.
pub const MAX_GROUP_SIZE: usize = 4;

/// Smallest group size the search builds.
pub const MIN_GROUP_SIZE: usize = 2;

/// Group sizes up to this one are waste-minimised; larger ones take the first
/// match.
pub const WASTE_MINIMISED_UP_TO: usize = 3;

/// A connected set of tables seating a party.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableGroup {
    /// Member ids in enumeration (capacity, then id) order.
    pub table_ids: Vec<TableId>,
    /// Sum of member capacities.
    pub total_capacity: u32,
}

impl TableGroup {
    /// Seats left empty when seating `party_size`.
    #[must_use]
    pub const fn wasted_seats(&self, party_size: u32) -> u32 {
        self.total_capacity.saturating_sub(party_size)
    }
}

/// Lexicographic iterator over the `k`-element index subsets of `0..n`.
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    indices: Vec<usize>,
    done: bool,
}

impl Combinations {
    /// Creates the iterator. Yields nothing when `k` is 0 or larger than `n`.
    #[must_use]
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            indices: (0..k).collect(),
            done: k == 0 || k > n,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.indices.clone();

        // Advance the rightmost index that still has room
        let k = self.indices.len();
        let mut i = k;
        loop {
            if i == 0 {
                self.done = true;
                break;
            }
            i -= 1;
            if self.indices[i] < self.n - k + i {
                self.indices[i] += 1;
                for j in i + 1..k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
                break;
            }
        }

        Some(current)
    }
}

/// Finds the group of joinable tables that seats `party_size`.
///
/// `tables` must already be restricted to free, joinable tables; they are
/// enumerated in (capacity, id) order. `max_group_size` is clamped to
/// [`MIN_GROUP_SIZE`]..=[`MAX_GROUP_SIZE`].
///
/// # Examples
///
/// ```
/// use maitre::allocation::graph::JoinGraph;
/// use maitre::allocation::search::find_group;
/// use maitre::Table;
///
/// let tables = vec![
///     Table::new(1, 1, 1, 2).unwrap().joinable(true),
///     Table::new(2, 1, 2, 4).unwrap().joinable(true),
///     Table::new(3, 1, 3, 4).unwrap().joinable(true),
/// ];
/// let graph = JoinGraph::complete(&[1, 2, 3]);
///
/// let group = find_group(&tables, &graph, 6, 4).unwrap();
/// assert_eq!(group.total_capacity, 6);
/// ```
#[must_use]
pub fn find_group(
    tables: &[Table],
    graph: &JoinGraph,
    party_size: u32,
    max_group_size: usize,
) -> Option<TableGroup> {
    let mut ordered: Vec<&Table> = tables.iter().collect();
    ordered.sort_by_key(|table| (table.capacity(), table.id()));

    let max_group_size = max_group_size.clamp(MIN_GROUP_SIZE, MAX_GROUP_SIZE);
    for size in MIN_GROUP_SIZE..=max_group_size.min(ordered.len()) {
        if let Some(group) = search_size(&ordered, graph, party_size, size) {
            return Some(group);
        }
    }
    None
}

fn search_size(
    ordered: &[&Table],
    graph: &JoinGraph,
    party_size: u32,
    size: usize,
) -> Option<TableGroup> {
    let minimise_waste = size <= WASTE_MINIMISED_UP_TO;
    let mut best: Option<TableGroup> = None;

    for indices in Combinations::new(ordered.len(), size) {
        let total_capacity: u32 = indices.iter().map(|&i| ordered[i].capacity()).sum();
        if total_capacity < party_size {
            continue;
        }

        let table_ids: Vec<TableId> = indices.iter().map(|&i| ordered[i].id()).collect();
        if !graph.is_connected(&table_ids) {
            continue;
        }

        let candidate = TableGroup {
            table_ids,
            total_capacity,
        };
        if !minimise_waste || candidate.wasted_seats(party_size) == 0 {
            return Some(candidate);
        }
        if best
            .as_ref()
            .map_or(true, |current| candidate.total_capacity < current.total_capacity)
        {
            best = Some(candidate);
        }
    }

    best
}
