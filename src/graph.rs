// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Graph store for the forest: trees keyed by id, paths as weighted undirected edges
//!
//! # Permissive updates
//!
//! Every mutating operation checks containment before acting and quietly does
//! nothing when the tree or path it names is absent. Callers that need to know
//! whether a request had an effect must check with [`ForestGraph::contains_tree`]
//! or [`ForestGraph::contains_path`] beforehand. Validation happens once, when a
//! [`Path`] is constructed.

use crate::types::{HealthStatus, Path, Tree, TreeId};
use petgraph::graphmap::UnGraphMap;
use std::collections::HashMap;
use tracing::trace;

/// The forest graph with a petgraph adjacency map backing the algorithms
#[derive(Debug, Clone)]
pub struct ForestGraph {
    /// All trees by id
    trees: HashMap<TreeId, Tree>,
    /// Undirected adjacency keyed by tree id, weight is the path distance
    adjacency: UnGraphMap<TreeId, f64>,
}

impl Default for ForestGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl ForestGraph {
    /// Create a new empty forest
    #[must_use]
    pub fn new() -> Self {
        Self {
            trees: HashMap::new(),
            adjacency: UnGraphMap::new(),
        }
    }

    /// Add a tree, replacing any tree with the same id
    ///
    /// A replaced tree keeps its paths.
    pub fn add_tree(&mut self, tree: Tree) {
        self.adjacency.add_node(tree.id);
        self.trees.insert(tree.id, tree);
    }

    /// Remove a tree and every path that touches it
    pub fn remove_tree(&mut self, id: TreeId) {
        if self.trees.remove(&id).is_some() {
            self.adjacency.remove_node(id);
            trace!(tree = id, "removed tree and its paths");
        }
    }

    /// Add a path, overwriting the distance if the pair is already connected
    ///
    /// No-op when either endpoint is not a tree in this forest.
    pub fn add_path(&mut self, path: Path) {
        let (a, b) = path.endpoints();
        if self.trees.contains_key(&a) && self.trees.contains_key(&b) {
            self.adjacency.add_edge(a, b, path.weight());
        }
    }

    /// Change the distance of an existing path
    ///
    /// No-op when the two trees are not connected.
    pub fn update_distance(&mut self, a: TreeId, b: TreeId, weight: f64) {
        if let Some(w) = self.adjacency.edge_weight_mut(a, b) {
            *w = weight;
        }
    }

    /// Remove the path between two trees
    pub fn remove_path(&mut self, a: TreeId, b: TreeId) {
        self.adjacency.remove_edge(a, b);
    }

    /// Set the health status of a tree
    pub fn update_health_status(&mut self, id: TreeId, status: HealthStatus) {
        if let Some(tree) = self.trees.get_mut(&id) {
            tree.health = status;
        }
    }

    /// Ids of every tree directly connected to `id`
    #[must_use]
    pub fn get_neighbors(&self, id: TreeId) -> Vec<TreeId> {
        if !self.adjacency.contains_node(id) {
            return Vec::new();
        }
        self.adjacency.neighbors(id).collect()
    }

    /// Distance of the direct path between two trees, infinite when there is none
    #[must_use]
    pub fn get_distance(&self, a: TreeId, b: TreeId) -> f64 {
        self.adjacency
            .edge_weight(a, b)
            .copied()
            .unwrap_or(f64::INFINITY)
    }

    /// Remove all trees and paths
    pub fn clear(&mut self) {
        self.trees.clear();
        self.adjacency.clear();
    }

    /// Get a tree by id
    #[must_use]
    pub fn tree(&self, id: TreeId) -> Option<&Tree> {
        self.trees.get(&id)
    }

    /// Check whether a tree exists
    #[must_use]
    pub fn contains_tree(&self, id: TreeId) -> bool {
        self.trees.contains_key(&id)
    }

    /// Check whether two trees are directly connected
    #[must_use]
    pub fn contains_path(&self, a: TreeId, b: TreeId) -> bool {
        self.adjacency.contains_edge(a, b)
    }

    /// Health of a tree, if it exists
    #[must_use]
    pub fn health_of(&self, id: TreeId) -> Option<HealthStatus> {
        self.trees.get(&id).map(|t| t.health)
    }

    /// Iterate all trees in no particular order
    pub fn trees(&self) -> impl Iterator<Item = &Tree> {
        self.trees.values()
    }

    /// All tree ids in ascending order
    #[must_use]
    pub fn tree_ids(&self) -> Vec<TreeId> {
        let mut ids: Vec<TreeId> = self.trees.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Every path once as `(smaller id, larger id, distance)`, sorted by ids
    #[must_use]
    pub fn edges(&self) -> Vec<(TreeId, TreeId, f64)> {
        let mut edges: Vec<(TreeId, TreeId, f64)> = self
            .adjacency
            .all_edges()
            .map(|(a, b, &w)| (a.min(b), a.max(b), w))
            .collect();
        edges.sort_unstable_by(|x, y| (x.0, x.1).cmp(&(y.0, y.1)));
        edges
    }

    /// Trees with the given health status, ordered by id
    #[must_use]
    pub fn trees_by_health(&self, status: HealthStatus) -> Vec<&Tree> {
        let mut found: Vec<&Tree> = self.trees.values().filter(|t| t.health == status).collect();
        found.sort();
        found
    }

    /// Number of trees
    #[must_use]
    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Number of paths
    #[must_use]
    pub fn path_count(&self) -> usize {
        self.adjacency.edge_count()
    }

    /// Check if the forest is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Export to DOT format for Graphviz
    #[must_use]
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("graph forest {\n");
        dot.push_str("  node [shape=circle, style=filled];\n\n");

        for id in self.tree_ids() {
            let Some(tree) = self.trees.get(&id) else {
                continue;
            };
            let species = tree.species.replace('"', "\\\"");
            dot.push_str(&format!(
                "  {} [label=\"{}\\n{}\", fillcolor=\"{}\"];\n",
                id,
                id,
                species,
                health_color(tree.health)
            ));
        }

        dot.push('\n');

        for (a, b, w) in self.edges() {
            dot.push_str(&format!("  {a} -- {b} [label=\"{w}\"];\n"));
        }

        dot.push_str("}\n");
        dot
    }
}

/// Fill color used for a health status in exports
fn health_color(status: HealthStatus) -> &'static str {
    match status {
        HealthStatus::Healthy => "#2ecc71",
        HealthStatus::Infected => "#e74c3c",
        HealthStatus::AtRisk => "#f39c12",
    }
}
