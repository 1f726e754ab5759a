// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Stats command - forest summary

use super::{print_json, ForestFiles, Output};
use crate::algorithms::summarize;
use anyhow::Result;

/// Run the stats command
pub fn run(files: &ForestFiles, output: Output) -> Result<()> {
    let graph = files.load()?;
    let summary = summarize(&graph);

    if output.json {
        return print_json(&summary);
    }

    println!("Forest Summary");
    println!("==============");
    println!();
    println!("Trees: {}", summary.total_trees);
    println!("Paths: {}", summary.total_paths);
    println!();

    println!("Health:");
    for (status, count) in &summary.health_counts {
        println!("  {:<10} {}", output.health(*status), count);
    }
    println!("  infection rate: {:.1}%", summary.infection_rate);
    println!();

    if !summary.species_counts.is_empty() {
        println!("Species:");
        for (species, count) in &summary.species_counts {
            println!("  {:<20} {}", species, count);
        }
        if let Some((species, count)) = &summary.most_common_species {
            println!("  most common: {} ({})", species, count);
        }
        println!();
    }

    println!(
        "Reserves: {} (largest {} trees)",
        summary.reserve_count, summary.max_reserve_size
    );

    Ok(())
}
