// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Analyses over the forest graph
//!
//! Everything here reads a [`ForestGraph`](crate::graph::ForestGraph) without
//! changing it. The single exception is [`simulate_infection`], which marks
//! newly reached trees as infected; [`plan_infection`] computes the same spread
//! without touching the graph.

pub mod infection;
pub mod layout;
pub mod reserves;
pub mod shortest_path;
pub mod stats;

pub use infection::{plan_infection, simulate_infection, InfectionEvent, InfectionSpread};
pub use layout::{force_layout, layout_forest, LayoutParams};
pub use reserves::{find_reserves, find_reserves_with, ReserveMode, ReserveOptions};
pub use shortest_path::{shortest_path, ShortestPath};
pub use stats::{count_by_species, summarize, ForestSummary};
