// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Export command - writes the forest to DOT, CSV or JSON

use super::{write_csv_file, ForestFiles};
use crate::graph::ForestGraph;
use crate::loader;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Graphviz DOT format
    Dot,
    /// Trees and paths CSV, the format the loader reads
    Csv,
    /// JSON format
    Json,
}

impl FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "dot" | "graphviz" => Ok(Self::Dot),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => anyhow::bail!("Unknown export format: {}. Supported: dot, csv, json", s),
        }
    }
}

impl ExportFormat {
    /// Get file extension for format
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Dot => "dot",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// Companion file for the paths CSV: `forest.csv` -> `forest-paths.csv`
#[must_use]
pub fn paths_file_for(trees_out: &Path) -> PathBuf {
    let stem = trees_out
        .file_stem()
        .map_or_else(|| "forest".to_string(), |s| s.to_string_lossy().into_owned());
    trees_out.with_file_name(format!("{stem}-paths.csv"))
}

/// Run the export command
pub fn run(files: &ForestFiles, format: &str, output: Option<PathBuf>) -> Result<()> {
    let format: ExportFormat = format.parse()?;
    info!("Exporting to {}", format.extension());

    let graph = files.load()?;

    let content = match format {
        ExportFormat::Csv => return export_csv(&graph, output),
        ExportFormat::Dot => graph.to_dot(),
        ExportFormat::Json => to_json(&graph)?,
    };

    match output {
        Some(path) => {
            fs::write(&path, &content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
            println!("Exported to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }

    Ok(())
}

fn export_csv(graph: &ForestGraph, output: Option<PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            let paths_out = paths_file_for(&path);
            write_csv_file(&path, |out| loader::write_trees(graph, out))?;
            write_csv_file(&paths_out, |out| loader::write_paths(graph, out))?;
            println!("Exported to {} and {}", path.display(), paths_out.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            loader::write_trees(graph, &mut stdout)?;
            stdout.write_all(b"\n")?;
            loader::write_paths(graph, &mut stdout)?;
        }
    }
    Ok(())
}

fn to_json(graph: &ForestGraph) -> Result<String> {
    let trees: Vec<_> = graph
        .tree_ids()
        .into_iter()
        .filter_map(|id| graph.tree(id))
        .collect();
    let paths: Vec<_> = graph
        .edges()
        .into_iter()
        .map(|(a, b, distance)| serde_json::json!({ "a": a, "b": b, "distance": distance }))
        .collect();
    serde_json::to_string_pretty(&serde_json::json!({ "trees": trees, "paths": paths }))
        .context("Failed to serialize forest")
}
