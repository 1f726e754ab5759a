// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Grove library - weighted forest graphs and the analyses built on them
//!
//! This crate provides the graph store for a forest of trees joined by
//! weighted paths, together with shortest-path search, reserve detection,
//! infection-spread simulation and force-directed layout.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod algorithms;
pub mod commands;
pub mod config;
pub mod error;
pub mod graph;
pub mod loader;

/// Core data types for trees, paths and layout coordinates
pub mod types {
    use crate::error::GraphError;
    use serde::{Deserialize, Serialize};
    use std::cmp::Ordering;
    use std::fmt;
    use std::hash::{Hash, Hasher};
    use std::str::FromStr;

    /// Integer key identifying a tree within a forest
    pub type TreeId = u32;

    // =========================================================================
    // Health Status
    // =========================================================================

    /// Health of a single tree
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum HealthStatus {
        /// Healthy, eligible for reserves
        Healthy,
        /// Infected, source of spread
        Infected,
        /// Weakened but not yet infected
        AtRisk,
    }

    impl HealthStatus {
        /// All statuses in display order
        pub const ALL: [Self; 3] = [Self::Healthy, Self::Infected, Self::AtRisk];

        /// Canonical upper-case name used in CSV files
        #[must_use]
        pub fn name(&self) -> &'static str {
            match self {
                Self::Healthy => "HEALTHY",
                Self::Infected => "INFECTED",
                Self::AtRisk => "AT_RISK",
            }
        }
    }

    impl fmt::Display for HealthStatus {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.name())
        }
    }

    impl FromStr for HealthStatus {
        type Err = GraphError;

        /// Case-insensitive; spaces and hyphens count as underscores.
        fn from_str(s: &str) -> Result<Self, Self::Err> {
            let normalized: String = s
                .trim()
                .chars()
                .map(|c| if c == ' ' || c == '-' { '_' } else { c.to_ascii_uppercase() })
                .collect();
            match normalized.as_str() {
                "HEALTHY" => Ok(Self::Healthy),
                "INFECTED" => Ok(Self::Infected),
                "AT_RISK" => Ok(Self::AtRisk),
                _ => Err(GraphError::UnknownHealthStatus(s.to_string())),
            }
        }
    }

    // =========================================================================
    // Tree (Node)
    // =========================================================================

    /// A tree in the forest graph
    ///
    /// Identity is the `id` alone: two trees with the same id compare equal
    /// whatever their species, age or health.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Tree {
        /// Unique identifier
        pub id: TreeId,
        /// Species name
        pub species: String,
        /// Age in years
        pub age: u32,
        /// Current health
        pub health: HealthStatus,
    }

    impl Tree {
        /// Create a new tree
        #[must_use]
        pub fn new(id: TreeId, species: impl Into<String>, age: u32, health: HealthStatus) -> Self {
            Self {
                id,
                species: species.into(),
                age,
                health,
            }
        }

        /// Whether this tree is currently healthy
        #[must_use]
        pub fn is_healthy(&self) -> bool {
            self.health == HealthStatus::Healthy
        }

        /// Whether this tree is currently infected
        #[must_use]
        pub fn is_infected(&self) -> bool {
            self.health == HealthStatus::Infected
        }
    }

    impl PartialEq for Tree {
        fn eq(&self, other: &Self) -> bool {
            self.id == other.id
        }
    }

    impl Eq for Tree {}

    impl Hash for Tree {
        fn hash<H: Hasher>(&self, state: &mut H) {
            self.id.hash(state);
        }
    }

    impl PartialOrd for Tree {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            Some(self.cmp(other))
        }
    }

    impl Ord for Tree {
        fn cmp(&self, other: &Self) -> Ordering {
            self.id.cmp(&other.id)
        }
    }

    // =========================================================================
    // Path (Edge)
    // =========================================================================

    /// Undirected weighted connection between two trees
    #[derive(Debug, Clone, Copy)]
    pub struct Path {
        a: TreeId,
        b: TreeId,
        weight: f64,
    }

    impl Path {
        /// Create a path between two trees
        ///
        /// This is the strict entry point for edges: a path must join two
        /// distinct trees and carry a positive, finite distance.
        ///
        /// # Errors
        ///
        /// Returns [`GraphError::SelfLoop`] when both ends are the same tree
        /// and [`GraphError::InvalidDistance`] for a non-positive or
        /// non-finite weight.
        pub fn new(tree1: &Tree, tree2: &Tree, weight: f64) -> Result<Self, GraphError> {
            if tree1.id == tree2.id {
                return Err(GraphError::SelfLoop(tree1.id));
            }
            if !weight.is_finite() || weight <= 0.0 {
                return Err(GraphError::InvalidDistance(weight));
            }
            Ok(Self {
                a: tree1.id,
                b: tree2.id,
                weight,
            })
        }

        /// Both endpoints, in construction order
        #[must_use]
        pub fn endpoints(&self) -> (TreeId, TreeId) {
            (self.a, self.b)
        }

        /// Distance along this path
        #[must_use]
        pub fn weight(&self) -> f64 {
            self.weight
        }
    }

    impl PartialEq for Path {
        fn eq(&self, other: &Self) -> bool {
            let same_pair = (self.a == other.a && self.b == other.b)
                || (self.a == other.b && self.b == other.a);
            same_pair && self.weight == other.weight
        }
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Position in 2D space
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Position {
        /// X coordinate
        pub x: f64,
        /// Y coordinate
        pub y: f64,
    }

    impl Position {
        /// Create a position
        #[must_use]
        pub fn new(x: f64, y: f64) -> Self {
            Self { x, y }
        }

        /// Euclidean distance to another position
        #[must_use]
        pub fn distance_to(&self, other: &Self) -> f64 {
            (other.x - self.x).hypot(other.y - self.y)
        }
    }
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::algorithms::{
        find_reserves, find_reserves_with, force_layout, layout_forest, plan_infection,
        shortest_path, simulate_infection, summarize,
    };
    pub use crate::graph::ForestGraph;
    pub use crate::types::*;
    pub use anyhow::{Context, Result};
}
