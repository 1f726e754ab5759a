// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Point-to-point shortest path (Dijkstra)

use crate::graph::ForestGraph;
use crate::types::TreeId;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use tracing::debug;

/// Result of a shortest-path query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortestPath {
    /// Tree ids from start to end inclusive, empty when unreachable
    pub path: Vec<TreeId>,
    /// Total distance, infinite when unreachable
    ///
    /// JSON has no infinity, so an unreachable result serializes as `null`.
    #[serde(serialize_with = "finite_or_null")]
    pub distance: f64,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn finite_or_null<S: Serializer>(distance: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if distance.is_finite() {
        serializer.serialize_f64(*distance)
    } else {
        serializer.serialize_none()
    }
}

impl ShortestPath {
    /// The "no path" sentinel
    #[must_use]
    pub fn unreachable() -> Self {
        Self {
            path: Vec::new(),
            distance: f64::INFINITY,
        }
    }

    /// Whether a path was found
    #[must_use]
    pub fn is_reachable(&self) -> bool {
        !self.path.is_empty()
    }

    /// Number of paths walked
    #[must_use]
    pub fn hops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Priority-queue entry, ordered so that `BinaryHeap` pops the lowest cost first
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frontier {
    pub(crate) cost: f64,
    pub(crate) node: TreeId,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap; lower id wins ties.
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Find the minimum-distance path between two trees
///
/// Returns `([start], 0)` when `start == end`, and the unreachable sentinel
/// `([], inf)` when either tree is missing or no path joins them. Among
/// equal-distance routes the one returned is unspecified.
#[must_use]
pub fn shortest_path(graph: &ForestGraph, start: TreeId, end: TreeId) -> ShortestPath {
    if !graph.contains_tree(start) || !graph.contains_tree(end) {
        debug!(start, end, "shortest path requested for unknown tree");
        return ShortestPath::unreachable();
    }
    if start == end {
        return ShortestPath {
            path: vec![start],
            distance: 0.0,
        };
    }

    let mut dist: HashMap<TreeId, f64> = HashMap::new();
    let mut prev: HashMap<TreeId, TreeId> = HashMap::new();
    let mut settled: HashSet<TreeId> = HashSet::new();
    let mut heap = BinaryHeap::new();

    dist.insert(start, 0.0);
    heap.push(Frontier { cost: 0.0, node: start });

    while let Some(Frontier { cost, node }) = heap.pop() {
        if !settled.insert(node) {
            continue;
        }
        if node == end {
            return ShortestPath {
                path: walk_back(&prev, end),
                distance: cost,
            };
        }

        for next in graph.get_neighbors(node) {
            if settled.contains(&next) {
                continue;
            }
            let candidate = cost + graph.get_distance(node, next);
            if candidate < dist.get(&next).copied().unwrap_or(f64::INFINITY) {
                dist.insert(next, candidate);
                prev.insert(next, node);
                heap.push(Frontier {
                    cost: candidate,
                    node: next,
                });
            }
        }
    }

    debug!(start, end, settled = settled.len(), "no path between trees");
    ShortestPath::unreachable()
}

/// Follow predecessor links from `end` back to the start and return them in walk order
fn walk_back(prev: &HashMap<TreeId, TreeId>, end: TreeId) -> Vec<TreeId> {
    let mut path = vec![end];
    let mut current = end;
    while let Some(&p) = prev.get(&current) {
        path.push(p);
        current = p;
    }
    path.reverse();
    path
}
