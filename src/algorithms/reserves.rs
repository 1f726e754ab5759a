// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Reserve detection - clusters of healthy trees
//!
//! A reserve is by default a maximal connected component of the graph
//! restricted to HEALTHY trees. Stricter definitions are available as
//! explicit [`ReserveMode`]s and a minimum size; they are never applied
//! unless asked for.

use crate::graph::ForestGraph;
use crate::types::{Tree, TreeId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Which components count as reserves
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReserveMode {
    /// Any connected component of healthy trees
    #[default]
    Connected,
    /// Components with no path to a non-healthy tree
    Isolated,
    /// Components where every pair of trees is directly connected
    Clique,
}

impl fmt::Display for ReserveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connected => "connected",
            Self::Isolated => "isolated",
            Self::Clique => "clique",
        })
    }
}

impl FromStr for ReserveMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "connected" | "component" => Ok(Self::Connected),
            "isolated" => Ok(Self::Isolated),
            "clique" | "complete" => Ok(Self::Clique),
            other => Err(format!(
                "unknown reserve mode: {other}. Valid: connected, isolated, clique"
            )),
        }
    }
}

/// Reserve detection settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReserveOptions {
    /// Component rule
    pub mode: ReserveMode,
    /// Smallest reserve size kept
    pub min_size: usize,
}

impl Default for ReserveOptions {
    fn default() -> Self {
        Self {
            mode: ReserveMode::Connected,
            min_size: 1,
        }
    }
}

/// Find reserves as maximal connected components of healthy trees
///
/// Singletons count. Reserves are returned in order of their smallest id.
#[must_use]
pub fn find_reserves(graph: &ForestGraph) -> Vec<BTreeSet<TreeId>> {
    find_reserves_with(graph, &ReserveOptions::default())
}

/// Find reserves using the given mode and minimum size
#[must_use]
pub fn find_reserves_with(graph: &ForestGraph, options: &ReserveOptions) -> Vec<BTreeSet<TreeId>> {
    let components = healthy_components(graph);
    let found = components.len();

    let reserves: Vec<BTreeSet<TreeId>> = components
        .into_iter()
        .filter(|c| c.len() >= options.min_size)
        .filter(|c| match options.mode {
            ReserveMode::Connected => true,
            ReserveMode::Isolated => is_isolated(graph, c),
            ReserveMode::Clique => is_clique(graph, c),
        })
        .collect();

    debug!(
        mode = %options.mode,
        min_size = options.min_size,
        components = found,
        reserves = reserves.len(),
        "reserve detection finished"
    );
    reserves
}

/// Connected components of the healthy subgraph, via iterative DFS in id order
fn healthy_components(graph: &ForestGraph) -> Vec<BTreeSet<TreeId>> {
    let is_healthy = |id: TreeId| graph.tree(id).is_some_and(Tree::is_healthy);

    let mut visited: HashSet<TreeId> = HashSet::new();
    let mut components = Vec::new();

    for root in graph.tree_ids() {
        if !is_healthy(root) || visited.contains(&root) {
            continue;
        }

        let mut component = BTreeSet::new();
        let mut stack = vec![root];
        visited.insert(root);

        while let Some(current) = stack.pop() {
            component.insert(current);
            for next in graph.get_neighbors(current) {
                if is_healthy(next) && visited.insert(next) {
                    stack.push(next);
                }
            }
        }

        components.push(component);
    }

    components
}

/// No member has a path to a tree outside the component
fn is_isolated(graph: &ForestGraph, component: &BTreeSet<TreeId>) -> bool {
    component.iter().all(|&id| {
        graph
            .get_neighbors(id)
            .iter()
            .all(|n| component.contains(n))
    })
}

/// Every pair of members is directly connected
fn is_clique(graph: &ForestGraph, component: &BTreeSet<TreeId>) -> bool {
    let needed = component.len() - 1;
    component.iter().all(|&id| {
        graph
            .get_neighbors(id)
            .iter()
            .filter(|n| component.contains(n))
            .count()
            == needed
    })
}
