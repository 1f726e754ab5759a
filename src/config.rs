// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management

use crate::algorithms::{LayoutParams, ReserveOptions};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up in the platform config directory
pub const CONFIG_FILE: &str = "grove.toml";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Layout defaults
    pub layout: LayoutConfig,
    /// Reserve detection defaults
    pub reserves: ReserveOptions,
}

/// Layout section of the config file
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Canvas and simulation settings
    #[serde(flatten)]
    pub params: LayoutParams,
    /// Seed for the initial positions, random when unset
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            layout: LayoutConfig::default(),
            reserves: ReserveOptions::default(),
        }
    }
}

/// Default config file location for this platform
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "hyperpolymath", "grove")
        .map(|d| d.config_dir().join(CONFIG_FILE))
}

/// Load configuration from `path`, the platform default, or built-in defaults
///
/// An explicitly given file must exist. The platform default is optional.
///
/// # Errors
///
/// Fails when the file cannot be read or is not valid TOML for [`Config`].
pub fn load(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => from_file(p),
        None => match default_path() {
            Some(p) if p.exists() => from_file(&p),
            _ => {
                debug!("no config file, using defaults");
                Ok(Config::default())
            }
        },
    }
}

fn from_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}
