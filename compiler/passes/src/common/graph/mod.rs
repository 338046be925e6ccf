// Copyright (C) 2024-2025 The dejs authors.
// This file is part of the dejs library.

// The dejs library is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// The dejs library is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with the dejs library. If not, see <https://www.gnu.org/licenses/>.

use indexmap::{IndexMap, IndexSet};
use std::fmt::Debug;
use std::hash::Hash;

/// A node in a graph.
pub trait Node: Clone + Eq + PartialEq + Debug + Hash {}

impl Node for String {}

/// A directed graph over helper names.
#[derive(Debug)]
pub struct DiGraph<N: Node> {
    /// The set of nodes in the graph.
    nodes: IndexSet<N>,
    /// The directed edges in the graph.
    edges: IndexMap<N, IndexSet<N>>,
}

impl<N: Node> DiGraph<N> {
    /// Initializes a new `DiGraph` from a set of source nodes.
    pub fn new(nodes: IndexSet<N>) -> Self {
        Self { nodes, edges: IndexMap::new() }
    }

    /// Adds an edge to the graph.
    pub fn add_edge(&mut self, from: N, to: N) {
        // Add `from` and `to` to the set of nodes if they are not already in the set.
        self.nodes.insert(from.clone());
        self.nodes.insert(to.clone());

        // Add the edge to the adjacency list.
        let entry = self.edges.entry(from).or_default();
        entry.insert(to);
    }

    /// Returns `true` if the graph contains the given node.
    pub fn contains_node(&self, node: &N) -> bool {
        self.nodes.contains(node)
    }

    /// The direct successors of `node`.
    pub fn successors(&self, node: &N) -> impl Iterator<Item = &N> {
        self.edges.get(node).into_iter().flatten()
    }

    /// Detects if there is a cycle in the graph. A self-edge counts.
    pub fn contains_cycle(&self) -> bool {
        // The set of nodes that do not need to be visited again.
        let mut finished: IndexSet<N> = IndexSet::with_capacity(self.nodes.len());
        // The set of nodes that are on the path to the current node in the search.
        let mut discovered: IndexSet<N> = IndexSet::with_capacity(self.nodes.len());

        for node in self.nodes.iter() {
            if !discovered.contains(node)
                && !finished.contains(node)
                && self.contains_cycle_from(node, &mut discovered, &mut finished)
            {
                return true;
            }
        }
        false
    }

    // Detects if there is a cycle in the graph starting from the given node,
    // via a recursive depth-first search.
    fn contains_cycle_from(&self, node: &N, discovered: &mut IndexSet<N>, finished: &mut IndexSet<N>) -> bool {
        discovered.insert(node.clone());

        for child in self.successors(node) {
            // If the node has already been discovered, there is a cycle.
            if discovered.contains(child) {
                return true;
            }
            // If the node has not been explored, explore it.
            if !finished.contains(child) && self.contains_cycle_from(child, discovered, finished) {
                return true;
            }
        }

        discovered.shift_remove(node);
        finished.insert(node.clone());

        false
    }

    /// Returns the nodes reachable from `seeds` in post-order: every node
    /// appears after the nodes it points to, except across cycle edges. This
    /// is a dependencies-first order for acyclic regions and an arbitrary
    /// linearization inside cycles.
    pub fn post_order(&self, seeds: impl IntoIterator<Item = N>) -> Vec<N> {
        let mut visited: IndexSet<N> = IndexSet::new();
        let mut order = Vec::new();
        for seed in seeds {
            self.post_order_from(&seed, &mut visited, &mut order);
        }
        order
    }

    fn post_order_from(&self, node: &N, visited: &mut IndexSet<N>, order: &mut Vec<N>) {
        if !visited.insert(node.clone()) {
            return;
        }
        for child in self.successors(node) {
            self.post_order_from(child, visited, order);
        }
        order.push(node.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&str, &str)]) -> DiGraph<String> {
        let mut graph = DiGraph::new(IndexSet::new());
        for (from, to) in edges {
            graph.add_edge(from.to_string(), to.to_string());
        }
        graph
    }

    #[test]
    fn post_order_puts_dependencies_first() {
        let graph = graph(&[("a", "b"), ("b", "c")]);
        let order = graph.post_order(["a".to_string()]);
        assert_eq!(order, vec!["c".to_string(), "b".to_string(), "a".to_string()]);
    }

    #[test]
    fn cycles_are_detected_but_do_not_hang() {
        let graph = graph(&[("a", "b"), ("b", "a")]);
        assert!(graph.contains_cycle());
        let order = graph.post_order(["a".to_string()]);
        assert_eq!(order.len(), 2);
    }

    #[test]
    fn self_edges_are_absorbed() {
        let graph = graph(&[("a", "a")]);
        assert!(graph.contains_cycle());
        assert_eq!(graph.post_order(["a".to_string()]), vec!["a".to_string()]);
    }
}
