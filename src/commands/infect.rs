// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Infect command - simulate spread from an infected tree

use super::{print_json, require_tree, write_csv_file, ForestFiles, Output};
use crate::algorithms::plan_infection;
use crate::loader;
use crate::types::TreeId;
use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

/// Run the infect command
///
/// With `trees_out`, the trees CSV after the spread is written there.
pub fn run(
    files: &ForestFiles,
    output: Output,
    start: TreeId,
    trees_out: Option<PathBuf>,
) -> Result<()> {
    info!("Simulating infection from {}", start);

    let mut graph = files.load()?;
    require_tree(&graph, start)?;

    let spread = plan_infection(&graph, start);
    spread.apply(&mut graph);

    if let Some(path) = &trees_out {
        write_csv_file(path, |out| loader::write_trees(&graph, out))?;
        info!("Wrote updated trees to {}", path.display());
    }

    if output.json {
        return print_json(&spread);
    }

    if spread.is_empty() {
        let status = graph
            .health_of(start)
            .map_or_else(String::new, |s| output.health(s));
        println!("Tree {} is {}; infection must start from an INFECTED tree.", start, status);
        return Ok(());
    }

    println!("Infection order ({} trees):", spread.len());
    for event in spread.events() {
        match event.source {
            Some(source) => println!("  t={:<8} {} <- {}", event.time, event.tree, source),
            None => println!("  t={:<8} {} (origin)", event.time, event.tree),
        }
    }
    println!("  duration: {}", spread.duration());

    Ok(())
}
