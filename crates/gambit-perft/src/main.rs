//! Gambit Perft - Counts move-generation leaf nodes.
//!
//! Runs perft on a single position, optionally split by root move, or checks
//! every position in a suite file against its expected node count.

mod config;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use config::SuiteConfig;
use gambit_core::FenParser;
use gambit_engine::{perft, perft_divide, Position};
use tracing_subscriber::EnvFilter;

/// Gambit Perft - Validates the move generator by counting nodes.
#[derive(Parser)]
#[command(name = "gambit-perft")]
#[command(about = "Counts legal move paths to a fixed depth")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run perft on one position
    Run {
        /// Position in FEN, or "startpos"
        #[arg(default_value = "startpos")]
        fen: String,

        /// Depth in plies
        #[arg(short, long, default_value = "4")]
        depth: u32,

        /// Print the node count under each root move
        #[arg(long)]
        divide: bool,
    },
    /// Check every position of a suite file
    Suite {
        /// Path to the suite TOML file
        #[arg(default_value = "suites/standard.toml")]
        path: PathBuf,

        /// Cap the depth of every entry; capped entries are not checked
        #[arg(long)]
        max_depth: Option<u32>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    match args.command {
        Command::Run { fen, depth, divide } => run(&fen, depth, divide),
        Command::Suite { path, max_depth } => suite(&path, max_depth),
    }
}

fn run(fen: &str, depth: u32, divide: bool) -> anyhow::Result<()> {
    let fen = if fen == "startpos" {
        FenParser::STARTPOS
    } else {
        fen
    };
    let mut position = Position::from_fen(fen).with_context(|| format!("invalid FEN: {fen}"))?;
    tracing::info!("Position: {}", fen);
    tracing::info!("Depth: {}", depth);

    let start = Instant::now();
    let nodes: u64 = if divide {
        let results = perft_divide(&mut position, depth);
        for (uci, count) in &results {
            println!("{uci}: {count}");
        }
        println!();
        results.iter().map(|(_, count)| count).sum()
    } else {
        perft(&mut position, depth)
    };
    let elapsed = start.elapsed();

    println!("Nodes: {nodes}");
    tracing::info!(
        "Completed in {:.3}s ({:.0} nodes/s)",
        elapsed.as_secs_f64(),
        nodes as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
    );
    Ok(())
}

fn suite(path: &Path, max_depth: Option<u32>) -> anyhow::Result<()> {
    let suite = SuiteConfig::load(path)
        .with_context(|| format!("failed to load suite {}", path.display()))?;
    tracing::info!("Loaded {} positions from {:?}", suite.positions.len(), path);

    let mut failures = 0;
    for entry in &suite.positions {
        let mut position = entry.position()?;
        let depth = max_depth.map_or(entry.depth, |cap| entry.depth.min(cap));

        let start = Instant::now();
        let nodes = perft(&mut position, depth);
        let elapsed = start.elapsed();

        // An expected count only applies at the entry's own depth.
        let expected = entry.nodes.filter(|_| depth == entry.depth);
        match expected {
            Some(expected) if expected != nodes => {
                failures += 1;
                tracing::warn!(
                    "{}: depth {} expected {} nodes, got {}",
                    entry.label(),
                    depth,
                    expected,
                    nodes
                );
                println!("FAIL {} depth {depth}: {nodes} (expected {expected})", entry.label());
            }
            Some(_) => println!("ok   {} depth {depth}: {nodes}", entry.label()),
            None => println!("--   {} depth {depth}: {nodes}", entry.label()),
        }
        tracing::debug!("{} took {:.3}s", entry.label(), elapsed.as_secs_f64());
    }

    if failures > 0 {
        bail!("{failures} of {} positions failed", suite.positions.len());
    }
    tracing::info!("All positions passed");
    Ok(())
}
