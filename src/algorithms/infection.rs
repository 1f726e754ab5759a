// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Infection spread simulation
//!
//! Spread is modelled as earliest arrival over weighted paths: the origin is
//! infected at time 0 and a neighbour is reached at `time(source) + distance`.
//! Trees that were already infected before the run are never targets and do
//! not relay the spread.
//!
//! Computing the spread and applying it are separate steps.
//! [`plan_infection`] only reads the graph; [`InfectionSpread::apply`] marks
//! every reached tree as INFECTED. [`simulate_infection`] does both.

use super::shortest_path::Frontier;
use crate::graph::ForestGraph;
use crate::types::{HealthStatus, TreeId};
use serde::Serialize;
use std::collections::{BinaryHeap, HashMap, HashSet};
use tracing::{debug, info};

/// One tree becoming infected
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InfectionEvent {
    /// Tree that became infected
    pub tree: TreeId,
    /// Tree it caught the infection from, `None` for the origin
    pub source: Option<TreeId>,
    /// Arrival time, the cumulative distance from the origin
    pub time: f64,
}

/// Computed spread in arrival order, not yet applied to a graph
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct InfectionSpread {
    events: Vec<InfectionEvent>,
}

impl InfectionSpread {
    /// Events in arrival order
    #[must_use]
    pub fn events(&self) -> &[InfectionEvent] {
        &self.events
    }

    /// Consume the spread, keeping the events
    #[must_use]
    pub fn into_events(self) -> Vec<InfectionEvent> {
        self.events
    }

    /// Number of trees reached, origin included
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True when the simulation could not start
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Ids of every reached tree in arrival order
    #[must_use]
    pub fn infected_ids(&self) -> Vec<TreeId> {
        self.events.iter().map(|e| e.tree).collect()
    }

    /// Arrival time of the last tree reached
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.events.last().map_or(0.0, |e| e.time)
    }

    /// Mark every reached tree as INFECTED
    pub fn apply(&self, graph: &mut ForestGraph) {
        for event in &self.events {
            graph.update_health_status(event.tree, HealthStatus::Infected);
        }
    }
}

/// Compute how an infection starting at `start` spreads, without changing the graph
///
/// Empty when `start` is unknown or not currently INFECTED.
#[must_use]
pub fn plan_infection(graph: &ForestGraph, start: TreeId) -> InfectionSpread {
    match graph.health_of(start) {
        Some(HealthStatus::Infected) => {}
        Some(status) => {
            debug!(start, %status, "infection must start from an infected tree");
            return InfectionSpread::default();
        }
        None => {
            debug!(start, "infection requested for unknown tree");
            return InfectionSpread::default();
        }
    }

    let mut arrival: HashMap<TreeId, f64> = HashMap::new();
    let mut caught_from: HashMap<TreeId, TreeId> = HashMap::new();
    let mut settled: HashSet<TreeId> = HashSet::new();
    let mut heap = BinaryHeap::new();
    let mut events = Vec::new();

    arrival.insert(start, 0.0);
    heap.push(Frontier { cost: 0.0, node: start });

    while let Some(Frontier { cost, node }) = heap.pop() {
        if !settled.insert(node) {
            continue;
        }
        events.push(InfectionEvent {
            tree: node,
            source: caught_from.get(&node).copied(),
            time: cost,
        });

        for next in graph.get_neighbors(node) {
            if settled.contains(&next) || graph.health_of(next) == Some(HealthStatus::Infected) {
                continue;
            }
            let candidate = cost + graph.get_distance(node, next);
            if candidate < arrival.get(&next).copied().unwrap_or(f64::INFINITY) {
                arrival.insert(next, candidate);
                caught_from.insert(next, node);
                heap.push(Frontier {
                    cost: candidate,
                    node: next,
                });
            }
        }
    }

    let spread = InfectionSpread { events };
    info!(
        start,
        infected = spread.len(),
        duration = spread.duration(),
        "infection spread computed"
    );
    spread
}

/// Run the infection from `start` and mark every reached tree as INFECTED
///
/// Returns the events in arrival order. This mutates `graph`; use
/// [`plan_infection`] for a read-only preview.
pub fn simulate_infection(graph: &mut ForestGraph, start: TreeId) -> Vec<InfectionEvent> {
    let spread = plan_infection(graph, start);
    spread.apply(graph);
    spread.into_events()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Path, Tree};
    use HealthStatus::{AtRisk, Healthy, Infected};

    fn forest(trees: &[(TreeId, HealthStatus)], edges: &[(TreeId, TreeId, f64)]) -> ForestGraph {
        let mut graph = ForestGraph::new();
        for &(id, health) in trees {
            graph.add_tree(Tree::new(id, "Elm", 30, health));
        }
        for &(a, b, w) in edges {
            let path = Path::new(graph.tree(a).unwrap(), graph.tree(b).unwrap(), w).unwrap();
            graph.add_path(path);
        }
        graph
    }

    fn event(tree: TreeId, source: Option<TreeId>, time: f64) -> InfectionEvent {
        InfectionEvent { tree, source, time }
    }

    #[test]
    fn test_two_tree_spread() {
        let mut graph = forest(&[(1, Infected), (2, Healthy)], &[(1, 2, 4.0)]);
        let events = simulate_infection(&mut graph, 1);

        assert_eq!(events, vec![event(1, None, 0.0), event(2, Some(1), 4.0)]);
        assert_eq!(graph.health_of(2), Some(Infected));
    }

    #[test]
    fn test_start_must_be_infected() {
        let mut graph = forest(&[(1, Healthy), (2, Healthy)], &[(1, 2, 4.0)]);

        assert!(simulate_infection(&mut graph, 1).is_empty());
        assert!(simulate_infection(&mut graph, 77).is_empty());
        assert_eq!(graph.health_of(2), Some(Healthy));
    }

    #[test]
    fn test_isolated_origin() {
        let mut graph = forest(&[(1, Infected), (2, Healthy)], &[]);
        let events = simulate_infection(&mut graph, 1);

        assert_eq!(events, vec![event(1, None, 0.0)]);
    }

    #[test]
    fn test_arrival_order_follows_cumulative_distance() {
        let mut graph = forest(
            &[(1, Infected), (2, Healthy), (3, AtRisk), (4, Healthy)],
            &[(1, 2, 10.0), (1, 3, 2.0), (3, 2, 3.0), (2, 4, 1.0)],
        );
        let events = simulate_infection(&mut graph, 1);

        assert_eq!(
            events,
            vec![
                event(1, None, 0.0),
                event(3, Some(1), 2.0),
                event(2, Some(3), 5.0),
                event(4, Some(2), 6.0),
            ]
        );
        assert!(graph.trees().all(Tree::is_infected));
    }

    #[test]
    fn test_already_infected_trees_block_spread() {
        let graph = forest(
            &[(1, Infected), (2, Infected), (3, Healthy)],
            &[(1, 2, 1.0), (2, 3, 1.0)],
        );
        let spread = plan_infection(&graph, 1);

        assert_eq!(spread.infected_ids(), vec![1]);
    }

    #[test]
    fn test_plan_does_not_mutate() {
        let mut graph = forest(
            &[(1, Infected), (2, Healthy), (3, Healthy)],
            &[(1, 2, 1.0), (2, 3, 2.5)],
        );
        let spread = plan_infection(&graph, 1);

        assert_eq!(spread.len(), 3);
        assert_eq!(spread.duration(), 3.5);
        assert_eq!(graph.trees_by_health(Healthy).len(), 2);

        spread.apply(&mut graph);
        assert!(graph.trees_by_health(Healthy).is_empty());
    }
}
