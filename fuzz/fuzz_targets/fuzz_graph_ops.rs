// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
#![no_main]

use arbitrary::Arbitrary;
use grove::algorithms::{find_reserves, plan_infection, shortest_path};
use grove::graph::ForestGraph;
use grove::types::{HealthStatus, Path, Tree};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    AddTree { id: u8, health: u8 },
    RemoveTree { id: u8 },
    AddPath { a: u8, b: u8, weight: u16 },
    UpdateDistance { a: u8, b: u8, weight: u16 },
    RemovePath { a: u8, b: u8 },
    SetHealth { id: u8, health: u8 },
}

fn health(n: u8) -> HealthStatus {
    HealthStatus::ALL[usize::from(n) % HealthStatus::ALL.len()]
}

fuzz_target!(|ops: Vec<Op>| {
    let mut graph = ForestGraph::new();
    for op in ops {
        match op {
            Op::AddTree { id, health: h } => {
                graph.add_tree(Tree::new(u32::from(id), "oak", 1, health(h)));
            }
            Op::RemoveTree { id } => graph.remove_tree(u32::from(id)),
            Op::AddPath { a, b, weight } => {
                let ta = Tree::new(u32::from(a), "oak", 1, HealthStatus::Healthy);
                let tb = Tree::new(u32::from(b), "oak", 1, HealthStatus::Healthy);
                if let Ok(path) = Path::new(&ta, &tb, f64::from(weight)) {
                    graph.add_path(path);
                }
            }
            Op::UpdateDistance { a, b, weight } => {
                graph.update_distance(u32::from(a), u32::from(b), f64::from(weight) + 1.0);
            }
            Op::RemovePath { a, b } => graph.remove_path(u32::from(a), u32::from(b)),
            Op::SetHealth { id, health: h } => graph.update_health_status(u32::from(id), health(h)),
        }
    }

    for (a, b, w) in graph.edges() {
        assert!(graph.contains_tree(a) && graph.contains_tree(b));
        assert_eq!(graph.get_distance(a, b), w);
        assert_eq!(graph.get_distance(b, a), w);
    }

    let ids = graph.tree_ids();
    if let (Some(&first), Some(&last)) = (ids.first(), ids.last()) {
        let forward = shortest_path(&graph, first, last);
        let backward = shortest_path(&graph, last, first);
        assert_eq!(forward.is_reachable(), backward.is_reachable());
        let _ = plan_infection(&graph, first);
    }

    for reserve in find_reserves(&graph) {
        assert!(reserve.iter().all(|&id| graph.health_of(id) == Some(HealthStatus::Healthy)));
    }
});
