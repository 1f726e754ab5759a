// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Grove CLI - analyse a forest of trees joined by weighted paths

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use grove::algorithms::{ReserveMode, ReserveOptions};
use grove::commands::{self, ForestFiles, Output};
use grove::config;
use grove::types::TreeId;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "grove")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long, env = "GROVE_CONFIG")]
    config: Option<PathBuf>,

    /// Trees CSV (tree_id, species, age, health_status)
    #[arg(long, env = "GROVE_TREES", default_value = "trees.csv")]
    trees: PathBuf,

    /// Paths CSV (tree_1, tree_2, distance)
    #[arg(long, env = "GROVE_PATHS", default_value = "paths.csv")]
    paths: PathBuf,

    /// Disable colored output (a set NO_COLOR also disables it)
    #[arg(long, env = "NO_COLOR", value_parser = clap::builder::FalseyValueParser::new())]
    no_color: bool,

    /// Output in JSON format
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shortest path between two trees
    Path {
        /// Start tree id
        from: TreeId,

        /// Destination tree id
        to: TreeId,
    },

    /// List reserves (clusters of healthy trees)
    Reserves {
        /// Reserve rule: connected, isolated, clique
        #[arg(long)]
        mode: Option<ReserveMode>,

        /// Smallest reserve to report
        #[arg(long)]
        min_size: Option<usize>,
    },

    /// Simulate infection spreading from an infected tree
    Infect {
        /// Infected tree the spread starts from
        start: TreeId,

        /// Write the updated trees CSV here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compute layout coordinates for every tree
    Layout {
        /// Canvas width
        #[arg(long)]
        width: Option<f64>,

        /// Canvas height
        #[arg(long)]
        height: Option<f64>,

        /// Simulation iterations
        #[arg(long)]
        iterations: Option<usize>,

        /// Minimum distance between trees
        #[arg(long)]
        min_distance: Option<f64>,

        /// Seed for reproducible layouts
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Summarize the forest
    Stats,

    /// Export the forest to various formats
    Export {
        /// Output format (dot, csv, json)
        #[arg(short, long, default_value = "dot")]
        format: String,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the effective configuration
    Config {
        /// Dotted key, e.g. layout.width
        key: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load(cli.config.as_deref())?;

    // Initialize logging
    let log_level = match cli.verbose {
        0 if cli.quiet => tracing::Level::ERROR,
        0 => config.log_level.parse().unwrap_or(tracing::Level::INFO),
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let files = ForestFiles {
        trees: cli.trees,
        paths: cli.paths,
    };
    let output = Output {
        json: cli.json,
        color: !cli.no_color,
    };

    // Execute command
    match cli.command {
        Commands::Path { from, to } => commands::path::run(&files, output, from, to),
        Commands::Reserves { mode, min_size } => {
            let options = ReserveOptions {
                mode: mode.unwrap_or(config.reserves.mode),
                min_size: min_size.unwrap_or(config.reserves.min_size),
            };
            commands::reserves::run(&files, output, options)
        }
        Commands::Infect { start, output: trees_out } => {
            commands::infect::run(&files, output, start, trees_out)
        }
        Commands::Layout { width, height, iterations, min_distance, seed } => {
            let mut params = config.layout.params;
            params.width = width.unwrap_or(params.width);
            params.height = height.unwrap_or(params.height);
            params.iterations = iterations.unwrap_or(params.iterations);
            params.min_distance = min_distance.unwrap_or(params.min_distance);
            commands::layout::run(&files, output, &params, seed.or(config.layout.seed))
        }
        Commands::Stats => commands::stats::run(&files, output),
        Commands::Export { format, output: path } => commands::export::run(&files, &format, path),
        Commands::Config { key } => commands::config::run(&config, key.as_deref()),
        Commands::Completions { shell } => commands::completions::run(shell, &mut Cli::command()),
    }
}
