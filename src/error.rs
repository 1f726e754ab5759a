// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Error types for graph construction and forest loading

use crate::types::TreeId;
use std::path::PathBuf;
use thiserror::Error;

/// Rejected construction input
///
/// Only raised where a bad value would break the graph store's invariants.
/// Updates against missing trees or paths are silent no-ops, not errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// Both endpoints of a path are the same tree
    #[error("a path cannot connect tree {0} to itself")]
    SelfLoop(TreeId),

    /// Path distance is zero, negative, NaN or infinite
    #[error("path distance must be positive and finite, got {0}")]
    InvalidDistance(f64),

    /// Text that does not name a health status
    #[error("unknown health status '{0}', expected HEALTHY, INFECTED or AT_RISK")]
    UnknownHealthStatus(String),
}

/// Failure to read a forest from CSV
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be opened or read
    #[error("failed to read {}", .path.display())]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The header row lacks columns the loader needs
    #[error("{} is missing required columns: {}", .path.display(), .missing.join(", "))]
    MissingColumns {
        /// File being read
        path: PathBuf,
        /// Names of the absent columns
        missing: Vec<String>,
    },

    /// The file has no header row
    #[error("{} is empty, expected a header row", .0.display())]
    Empty(PathBuf),
}
