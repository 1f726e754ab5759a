// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! CSV import and export for forests
//!
//! A forest is stored as two files. The trees file has the header
//! `tree_id,species,age,health_status`; the paths file has
//! `tree_1,tree_2,distance` (or `tree_id1,tree_id2,distance`). Columns are
//! found by header name, so their order does not matter.
//!
//! Structural problems (unreadable file, missing columns) fail the load. Bad
//! rows are skipped and recorded in the [`LoadReport`].

use crate::error::LoadError;
use crate::graph::ForestGraph;
use crate::types::{self, HealthStatus, Tree, TreeId};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A row that was skipped while loading
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadIssue {
    /// File the row came from
    pub file: PathBuf,
    /// 1-based line number, 0 for whole-file issues
    pub line: usize,
    /// What was wrong
    pub message: String,
}

impl fmt::Display for LoadIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "{}: {}", self.file.display(), self.message)
        } else {
            write!(f, "{}:{}: {}", self.file.display(), self.line, self.message)
        }
    }
}

/// Outcome of a load
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Trees added to the graph
    pub trees_loaded: usize,
    /// Paths added to the graph
    pub paths_loaded: usize,
    /// Rows that were skipped
    pub issues: Vec<LoadIssue>,
}

impl LoadReport {
    fn skip(&mut self, file: &Path, line: usize, message: impl Into<String>) {
        let issue = LoadIssue {
            file: file.to_path_buf(),
            line,
            message: message.into(),
        };
        warn!("{issue}");
        self.issues.push(issue);
    }
}

/// Load a forest from a trees file and a paths file
///
/// A missing paths file is recorded as an issue and the trees are returned
/// without paths.
///
/// # Errors
///
/// Fails when the trees file cannot be read, either file lacks a header row,
/// or a header lacks a required column.
pub fn load_forest(
    trees_file: &Path,
    paths_file: &Path,
) -> Result<(ForestGraph, LoadReport), LoadError> {
    let mut graph = ForestGraph::new();
    let mut report = LoadReport::default();

    let trees_text = fs::read_to_string(trees_file).map_err(|source| LoadError::Io {
        path: trees_file.to_path_buf(),
        source,
    })?;
    read_trees(&trees_text, trees_file, &mut graph, &mut report)?;

    match fs::read_to_string(paths_file) {
        Ok(paths_text) => read_paths(&paths_text, paths_file, &mut graph, &mut report)?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            report.skip(paths_file, 0, "paths file not found, forest has no paths");
        }
        Err(source) => {
            return Err(LoadError::Io {
                path: paths_file.to_path_buf(),
                source,
            })
        }
    }

    info!(
        trees = report.trees_loaded,
        paths = report.paths_loaded,
        issues = report.issues.len(),
        "forest loaded"
    );
    Ok((graph, report))
}

/// Parse trees CSV text into `graph`
///
/// # Errors
///
/// Fails on a missing header row or missing columns.
pub fn read_trees(
    text: &str,
    file: &Path,
    graph: &mut ForestGraph,
    report: &mut LoadReport,
) -> Result<(), LoadError> {
    let table = Table::parse(text, file)?;
    let [id_col, species_col, age_col, health_col] =
        table.require(file, ["tree_id", "species", "age", "health_status"])?;

    for (line, fields) in &table.rows {
        let line = *line;
        let (Some(id), Some(species), Some(age), Some(health)) = (
            fields.get(id_col),
            fields.get(species_col),
            fields.get(age_col),
            fields.get(health_col),
        ) else {
            report.skip(file, line, "row has too few fields");
            continue;
        };

        let Ok(id) = id.parse::<TreeId>() else {
            report.skip(file, line, format!("invalid tree id '{id}'"));
            continue;
        };
        if graph.contains_tree(id) {
            report.skip(file, line, format!("duplicate tree id {id}, keeping the first"));
            continue;
        }
        let Ok(age) = age.parse::<u32>() else {
            report.skip(file, line, format!("invalid age '{age}'"));
            continue;
        };
        let health = match health.parse::<HealthStatus>() {
            Ok(h) => h,
            Err(e) => {
                report.skip(file, line, e.to_string());
                continue;
            }
        };

        graph.add_tree(Tree::new(id, species.clone(), age, health));
        report.trees_loaded += 1;
    }
    Ok(())
}

/// Parse paths CSV text into `graph`; endpoints must already be loaded
///
/// # Errors
///
/// Fails on a missing header row or missing columns.
pub fn read_paths(
    text: &str,
    file: &Path,
    graph: &mut ForestGraph,
    report: &mut LoadReport,
) -> Result<(), LoadError> {
    let table = Table::parse(text, file)?;
    let first = table.column_any(&["tree_1", "tree_id1"]);
    let second = table.column_any(&["tree_2", "tree_id2"]);
    let distance = table.column("distance");

    let (Some(first), Some(second), Some(distance)) = (first, second, distance) else {
        let mut missing = Vec::new();
        if first.is_none() {
            missing.push("tree_1/tree_id1".to_string());
        }
        if second.is_none() {
            missing.push("tree_2/tree_id2".to_string());
        }
        if distance.is_none() {
            missing.push("distance".to_string());
        }
        return Err(LoadError::MissingColumns {
            path: file.to_path_buf(),
            missing,
        });
    };

    for (line, fields) in &table.rows {
        let line = *line;
        let (Some(a), Some(b), Some(w)) =
            (fields.get(first), fields.get(second), fields.get(distance))
        else {
            report.skip(file, line, "row has too few fields");
            continue;
        };
        let (Ok(a), Ok(b)) = (a.parse::<TreeId>(), b.parse::<TreeId>()) else {
            report.skip(file, line, format!("invalid tree ids '{a}', '{b}'"));
            continue;
        };
        let Ok(w) = w.parse::<f64>() else {
            report.skip(file, line, format!("invalid distance '{w}'"));
            continue;
        };

        let (Some(t1), Some(t2)) = (graph.tree(a), graph.tree(b)) else {
            let unknown = if graph.contains_tree(a) { b } else { a };
            report.skip(file, line, format!("path references unknown tree {unknown}"));
            continue;
        };
        match types::Path::new(t1, t2, w) {
            Ok(path) => {
                graph.add_path(path);
                report.paths_loaded += 1;
            }
            Err(e) => report.skip(file, line, e.to_string()),
        }
    }
    Ok(())
}

/// Write the trees CSV, ordered by id
///
/// # Errors
///
/// Propagates write failures.
pub fn write_trees<W: Write>(graph: &ForestGraph, mut out: W) -> io::Result<()> {
    writeln!(out, "tree_id,species,age,health_status")?;
    for id in graph.tree_ids() {
        if let Some(tree) = graph.tree(id) {
            writeln!(
                out,
                "{},{},{},{}",
                tree.id,
                quote(&tree.species),
                tree.age,
                tree.health
            )?;
        }
    }
    Ok(())
}

/// Write the paths CSV, each path once, ordered by ids
///
/// # Errors
///
/// Propagates write failures.
pub fn write_paths<W: Write>(graph: &ForestGraph, mut out: W) -> io::Result<()> {
    writeln!(out, "tree_id1,tree_id2,distance")?;
    for (a, b, w) in graph.edges() {
        writeln!(out, "{a},{b},{w}")?;
    }
    Ok(())
}

/// Header-indexed CSV rows with their 1-based line numbers
struct Table {
    header: Vec<String>,
    rows: Vec<(usize, Vec<String>)>,
}

impl Table {
    fn parse(text: &str, file: &Path) -> Result<Self, LoadError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty());

        let (_, header_line) = lines.next().ok_or_else(|| LoadError::Empty(file.to_path_buf()))?;
        let header = split_fields(header_line.trim_start_matches('\u{feff}'))
            .into_iter()
            .map(|h| h.to_lowercase())
            .collect();
        let rows = lines.map(|(n, l)| (n, split_fields(l))).collect();

        Ok(Self { header, rows })
    }

    fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    fn column_any(&self, names: &[&str]) -> Option<usize> {
        names.iter().find_map(|n| self.column(n))
    }

    fn require<const N: usize>(
        &self,
        file: &Path,
        names: [&str; N],
    ) -> Result<[usize; N], LoadError> {
        let found = names.map(|n| self.column(n));
        let missing: Vec<String> = names
            .iter()
            .zip(&found)
            .filter(|(_, c)| c.is_none())
            .map(|(n, _)| (*n).to_string())
            .collect();
        if !missing.is_empty() {
            return Err(LoadError::MissingColumns {
                path: file.to_path_buf(),
                missing,
            });
        }
        Ok(found.map(|c| c.unwrap_or_default()))
    }
}

/// Split one CSV line, honouring double-quoted fields and `""` escapes
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

/// Quote a field if it would not survive `split_fields` unquoted
fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n']) || field != field.trim() {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
