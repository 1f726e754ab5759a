// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Config command - show the effective configuration

use crate::config::{self, Config};
use anyhow::{Context, Result};

/// Print the effective config, or a single dotted key such as `layout.width`
pub fn run(config: &Config, key: Option<&str>) -> Result<()> {
    let value = toml::Value::try_from(config).context("Failed to serialize config")?;

    let Some(key) = key else {
        if let Some(path) = config::default_path() {
            println!("# default location: {}", path.display());
        }
        print!("{}", toml::to_string_pretty(config).context("Failed to serialize config")?);
        return Ok(());
    };

    tracing::info!("Getting {}", key);
    match lookup(&value, key) {
        Some(toml::Value::String(s)) => println!("{s}"),
        Some(other) => println!("{other}"),
        None => anyhow::bail!("Unknown config key: {}", key),
    }
    Ok(())
}

fn lookup<'a>(value: &'a toml::Value, key: &str) -> Option<&'a toml::Value> {
    key.split('.').try_fold(value, |v, part| v.get(part))
}
