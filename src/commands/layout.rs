// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Layout command - compute drawing coordinates for every tree

use super::{print_json, ForestFiles, Output};
use crate::algorithms::{layout_forest, LayoutParams};
use crate::types::TreeId;
use anyhow::Result;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::info;

#[derive(Serialize)]
struct Placement {
    id: TreeId,
    x: f64,
    y: f64,
}

/// Run the layout command
pub fn run(
    files: &ForestFiles,
    output: Output,
    params: &LayoutParams,
    seed: Option<u64>,
) -> Result<()> {
    if params.width <= 0.0 || params.height <= 0.0 {
        anyhow::bail!(
            "Canvas must have a positive size, got {}x{}",
            params.width,
            params.height
        );
    }
    info!(
        "Laying out forest on {}x{} canvas ({} iterations)",
        params.width, params.height, params.iterations
    );

    let graph = files.load()?;
    let mut rng = match seed {
        Some(s) => SmallRng::seed_from_u64(s),
        None => SmallRng::from_entropy(),
    };

    let positions = layout_forest(&graph, params, &mut rng);
    let mut placements: Vec<Placement> = positions
        .into_iter()
        .map(|(id, p)| Placement { id, x: p.x, y: p.y })
        .collect();
    placements.sort_by_key(|p| p.id);

    if output.json {
        return print_json(&placements);
    }

    for p in &placements {
        println!("{:>6}  {:>10.3}  {:>10.3}", p.id, p.x, p.y);
    }

    Ok(())
}
