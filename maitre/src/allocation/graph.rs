//! Adjacency between joinable tables.
//!
//! The strict graph only links tables an operator configured as a join; the
//! permissive graph links every joinable table to every other one.

use std::collections::{BTreeSet, HashMap, VecDeque};

use crate::table::{TableId, TableJoin};

/// Undirected adjacency map over table ids.
///
/// # Examples
///
/// ```
/// use maitre::allocation::graph::JoinGraph;
/// use maitre::TableJoin;
///
/// let joins = [TableJoin::new(1, 2, 4).unwrap(), TableJoin::new(2, 3, 4).unwrap()];
/// let graph = JoinGraph::from_joins(&joins);
///
/// assert!(graph.is_adjacent(2, 1));
/// assert!(!graph.is_adjacent(1, 3));
/// assert!(graph.is_connected(&[1, 2, 3]));
/// assert!(!graph.is_connected(&[1, 3]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinGraph {
    adjacency: HashMap<TableId, BTreeSet<TableId>>,
}

impl JoinGraph {
    /// Builds the strict graph: one edge per configured join, both directions.
    #[must_use]
    pub fn from_joins(joins: &[TableJoin]) -> Self {
        let mut graph = Self::default();
        for join in joins {
            let (a, b) = join.tables();
            graph.add_edge(a, b);
        }
        graph
    }

    /// Builds the permissive graph: every table is adjacent to every other.
    #[must_use]
    pub fn complete(tables: &[TableId]) -> Self {
        let mut graph = Self::default();
        for (i, &a) in tables.iter().enumerate() {
            for &b in &tables[i + 1..] {
                graph.add_edge(a, b);
            }
        }
        graph
    }

    fn add_edge(&mut self, a: TableId, b: TableId) {
        if a == b {
            return;
        }
        self.adjacency.entry(a).or_default().insert(b);
        self.adjacency.entry(b).or_default().insert(a);
    }

    /// Returns whether an edge links `a` and `b`.
    #[must_use]
    pub fn is_adjacent(&self, a: TableId, b: TableId) -> bool {
        self.adjacency
            .get(&a)
            .is_some_and(|neighbours| neighbours.contains(&b))
    }

    /// Returns the tables adjacent to `table`.
    pub fn neighbours(&self, table: TableId) -> impl Iterator<Item = TableId> + '_ {
        self.adjacency
            .get(&table)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Returns the number of undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Returns whether `group` forms a connected subgraph.
    ///
    /// A breadth-first walk from the first member, following only edges whose
    /// both ends are in `group`, must reach every member. Groups of fewer than
    /// two tables are trivially connected.
    #[must_use]
    pub fn is_connected(&self, group: &[TableId]) -> bool {
        let Some(&start) = group.first() else {
            return true;
        };
        let members: BTreeSet<TableId> = group.iter().copied().collect();

        let mut visited = BTreeSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            for next in self.neighbours(current) {
                if members.contains(&next) && visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        visited.len() == members.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn join(a: TableId, b: TableId) -> TableJoin {
        TableJoin::new(a, b, 4).unwrap()
    }

    #[test]
    fn test_strict_edges_are_undirected() {
        let graph = JoinGraph::from_joins(&[join(3, 1)]);
        assert!(graph.is_adjacent(1, 3));
        assert!(graph.is_adjacent(3, 1));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_complete_graph() {
        let graph = JoinGraph::complete(&[1, 2, 3, 4]);
        assert_eq!(graph.edge_count(), 6);
        assert!(graph.is_adjacent(1, 4));
        assert!(!graph.is_adjacent(1, 1));
        assert!(graph.is_connected(&[4, 2, 1]));
    }

    #[test]
    fn test_chain_connectivity() {
        let graph = JoinGraph::from_joins(&[join(1, 2), join(2, 3), join(3, 4)]);
        assert!(graph.is_connected(&[1, 2, 3, 4]));
        assert!(graph.is_connected(&[3, 1, 2]));
        assert!(!graph.is_connected(&[1, 2, 4]));
    }

    #[test]
    fn test_connectivity_ignores_outside_members() {
        // 1 and 3 only meet through 2, which is not in the group
        let graph = JoinGraph::from_joins(&[join(1, 2), join(2, 3)]);
        assert!(!graph.is_connected(&[1, 3]));
    }

    #[test]
    fn test_trivial_groups() {
        let graph = JoinGraph::default();
        assert!(graph.is_connected(&[]));
        assert!(graph.is_connected(&[7]));
        assert!(!graph.is_connected(&[7, 8]));
    }

    #[test]
    fn test_neighbours() {
        let graph = JoinGraph::from_joins(&[join(1, 2), join(1, 5)]);
        let neighbours: Vec<_> = graph.neighbours(1).collect();
        assert_eq!(neighbours, vec![2, 5]);
        assert_eq!(graph.neighbours(9).count(), 0);
    }
}
