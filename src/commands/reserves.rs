// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Reserves command - list clusters of healthy trees

use super::{print_json, ForestFiles, Output};
use crate::algorithms::{find_reserves_with, ReserveOptions};
use anyhow::Result;
use tracing::info;

/// Run the reserves command
pub fn run(files: &ForestFiles, output: Output, options: ReserveOptions) -> Result<()> {
    info!("Detecting reserves ({} mode, min size {})", options.mode, options.min_size);

    let graph = files.load()?;
    let reserves = find_reserves_with(&graph, &options);

    if output.json {
        return print_json(&reserves);
    }

    if reserves.is_empty() {
        println!("No reserves found.");
        return Ok(());
    }

    println!("Reserves ({}):", reserves.len());
    for (i, reserve) in reserves.iter().enumerate() {
        let ids: Vec<String> = reserve.iter().map(ToString::to_string).collect();
        println!("  #{} ({} trees): {}", i + 1, reserve.len(), ids.join(", "));
    }

    Ok(())
}
