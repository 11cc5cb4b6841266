//! TERRACAMP CLI - Command-line interface
//!
//! Commands:
//! - match: Play engine-vs-engine games on a terrain layout
//! - layout: Print or export the built-in terrain layout

mod match_cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use terracamp_core::TerrainGrid;

#[derive(Parser)]
#[command(name = "terracamp")]
#[command(about = "TERRACAMP territory capture engine")]
struct Cli {
    /// Random seed for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play engine-vs-engine games
    Match(match_cmd::MatchArgs),
    /// Print the built-in terrain layout, or write it as JSON
    Layout {
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // RUST_LOG overrides the default level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Match(args) => match_cmd::run(args, cli.seed),
        Commands::Layout { output } => export_layout(output),
    }
}

fn export_layout(output: Option<PathBuf>) -> Result<()> {
    let grid = TerrainGrid::default();
    match output {
        Some(path) => {
            grid.save(&path, "default")?;
            tracing::info!("Wrote layout to {}", path.display());
        }
        None => {
            for row in grid.to_rows() {
                println!("{}", row);
            }
        }
    }
    Ok(())
}
