// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations

pub mod completions;
pub mod config;
pub mod export;
pub mod infect;
pub mod layout;
pub mod path;
pub mod reserves;
pub mod stats;

use crate::graph::ForestGraph;
use crate::loader;
use crate::types::{HealthStatus, TreeId};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// The CSV pair a command reads its forest from
#[derive(Debug, Clone)]
pub struct ForestFiles {
    /// Trees CSV
    pub trees: PathBuf,
    /// Paths CSV
    pub paths: PathBuf,
}

impl ForestFiles {
    /// Load the forest, warning on stderr about skipped rows
    pub fn load(&self) -> Result<ForestGraph> {
        let (graph, report) = loader::load_forest(&self.trees, &self.paths).with_context(|| {
            format!(
                "Failed to load forest from {} and {}",
                self.trees.display(),
                self.paths.display()
            )
        })?;

        if !report.issues.is_empty() {
            eprintln!("Warning: skipped {} row(s) while loading:", report.issues.len());
            for issue in report.issues.iter().take(5) {
                eprintln!("  {issue}");
            }
            if report.issues.len() > 5 {
                eprintln!("  ... and {} more", report.issues.len() - 5);
            }
        }
        if graph.is_empty() {
            eprintln!("Warning: forest is empty.");
        }

        Ok(graph)
    }
}

/// How results are printed
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    /// Print JSON instead of text
    pub json: bool,
    /// Color health statuses in text output
    pub color: bool,
}

impl Output {
    /// Health status label, colored when enabled
    #[must_use]
    pub fn health(&self, status: HealthStatus) -> String {
        if !self.color {
            return status.name().to_string();
        }
        match status {
            HealthStatus::Healthy => status.name().green().to_string(),
            HealthStatus::Infected => status.name().red().to_string(),
            HealthStatus::AtRisk => status.name().yellow().to_string(),
        }
    }
}

/// Write a value as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(json.as_bytes())?;
    stdout.write_all(b"\n")?;
    Ok(())
}

/// Create `path` and fill it through `write`, flushing before returning
pub fn write_csv_file(
    path: &Path,
    write: impl FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write(&mut out).with_context(|| format!("Failed to write to {}", path.display()))?;
    out.flush()
        .with_context(|| format!("Failed to write to {}", path.display()))?;
    Ok(())
}

/// Fail unless the forest contains `id`
fn require_tree(graph: &ForestGraph, id: TreeId) -> Result<()> {
    if graph.contains_tree(id) {
        Ok(())
    } else {
        anyhow::bail!("Tree not found: {}", id)
    }
}

/// Join ids as `1 -> 2 -> 3`
fn arrow_list(ids: &[TreeId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}
