// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Forest summary statistics

use super::reserves::find_reserves;
use crate::graph::ForestGraph;
use crate::types::{HealthStatus, Tree};
use serde::Serialize;
use std::collections::BTreeMap;

/// Overview of a forest's health, species mix and reserves
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForestSummary {
    /// Number of trees
    pub total_trees: usize,
    /// Number of paths
    pub total_paths: usize,
    /// Trees per health status, every status present
    pub health_counts: BTreeMap<HealthStatus, usize>,
    /// Trees per species
    pub species_counts: BTreeMap<String, usize>,
    /// Percentage of trees that are infected
    pub infection_rate: f64,
    /// Number of baseline reserves
    pub reserve_count: usize,
    /// Size of the largest reserve
    pub max_reserve_size: usize,
    /// Most common species and its count, alphabetical on ties
    pub most_common_species: Option<(String, usize)>,
}

/// Count trees per species
pub fn count_by_species<'a>(trees: impl IntoIterator<Item = &'a Tree>) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for tree in trees {
        *counts.entry(tree.species.clone()).or_insert(0) += 1;
    }
    counts
}

/// Summarize a forest
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize(graph: &ForestGraph) -> ForestSummary {
    let mut health_counts: BTreeMap<HealthStatus, usize> =
        HealthStatus::ALL.iter().map(|&s| (s, 0)).collect();
    for tree in graph.trees() {
        *health_counts.entry(tree.health).or_insert(0) += 1;
    }

    let species_counts = count_by_species(graph.trees());
    let total = graph.tree_count();
    let infected = health_counts
        .get(&HealthStatus::Infected)
        .copied()
        .unwrap_or(0);
    let infection_rate = if total == 0 {
        0.0
    } else {
        infected as f64 / total as f64 * 100.0
    };

    let reserves = find_reserves(graph);
    let max_reserve_size = reserves.iter().map(std::collections::BTreeSet::len).max().unwrap_or(0);

    // BTreeMap iterates alphabetically, so the first maximum wins ties.
    let most_common_species = species_counts
        .iter()
        .fold(None::<(&String, usize)>, |best, (name, &count)| match best {
            Some((_, top)) if top >= count => best,
            _ => Some((name, count)),
        })
        .map(|(name, count)| (name.clone(), count));

    ForestSummary {
        total_trees: total,
        total_paths: graph.path_count(),
        health_counts,
        species_counts,
        infection_rate,
        reserve_count: reserves.len(),
        max_reserve_size,
        most_common_species,
    }
}
