// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Path command - shortest path between two trees

use super::{arrow_list, print_json, require_tree, ForestFiles, Output};
use crate::algorithms::shortest_path;
use crate::types::TreeId;
use anyhow::Result;
use tracing::info;

/// Run the path command
pub fn run(files: &ForestFiles, output: Output, from: TreeId, to: TreeId) -> Result<()> {
    info!("Finding shortest path from {} to {}", from, to);

    let graph = files.load()?;
    require_tree(&graph, from)?;
    require_tree(&graph, to)?;

    let result = shortest_path(&graph, from, to);

    if output.json {
        return print_json(&result);
    }

    if result.is_reachable() {
        println!("Shortest path from {} to {}:", from, to);
        println!("  {}", arrow_list(&result.path));
        println!("  distance: {}", result.distance);
        println!("  hops: {}", result.hops());
    } else {
        println!("No path between {} and {}", from, to);
    }

    Ok(())
}
