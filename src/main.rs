//! # Main: CLI Entry Point
//!
//! Routes subcommands to the oracle pipeline. Handles shared concerns:
//! `.env` loading, structured logging, configuration layering, and the rayon
//! thread pool.
//!
//! ## Global Options
//!
//! - `--config` / `ECHOPRIME_CONFIG`: TOML file with oracle constants.
//! - `--window`, `--threshold`, `--mr-rounds`: override single config values.
//! - `--threads`: rayon thread pool size (default: all cores).
//!
//! `LOG_FORMAT=json` switches log output to JSON; `RUST_LOG` filters it.

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "echoprime", about = "Deterministic safe prime oracle")]
struct Cli {
    /// TOML file with oracle constants (a, window, threshold, max_search_attempts, mr_rounds)
    #[arg(long, env = "ECHOPRIME_CONFIG")]
    config: Option<PathBuf>,

    /// Number of binomial residues tested by the collapse score
    #[arg(long, env = "ECHOPRIME_WINDOW")]
    window: Option<u64>,

    /// Minimum collapse score for p and q to pass
    #[arg(long, env = "ECHOPRIME_THRESHOLD")]
    threshold: Option<f64>,

    /// Miller-Rabin rounds for primality testing
    #[arg(long, env = "ECHOPRIME_MR_ROUNDS")]
    mr_rounds: Option<u32>,

    /// Number of rayon worker threads (defaults to all logical cores)
    #[arg(long)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the magnitude of the n-th safe prime
    Estimate {
        /// Safe prime index (>= 1)
        #[arg(long, allow_hyphen_values = true)]
        index: i64,
    },
    /// Find the safe prime pair (p, q) near the estimate for an index
    Find {
        /// Safe prime index (>= 1)
        #[arg(long, allow_hyphen_values = true)]
        index: i64,
    },
    /// Build the unverified candidate p = 2q + 1 for an index
    Candidate {
        /// Candidate index (>= 1)
        #[arg(long, allow_hyphen_values = true)]
        index: i64,
    },
    /// Map an epoch number back to a starting index
    Project {
        /// Epoch number
        #[arg(long)]
        epoch: u64,
        /// Offset added to the projected index
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        offset: i64,
    },
    /// Verify safe prime candidates
    Verify {
        /// Candidates in decimal
        #[arg(required = true, allow_hyphen_values = true)]
        candidates: Vec<String>,
    },
    /// Run the full pipeline for one index and print its trace
    Trace {
        /// Safe prime index (>= 1)
        #[arg(long, allow_hyphen_values = true)]
        index: i64,
        /// Print the ledger contract tuple instead of the trace
        #[arg(long)]
        contract: bool,
    },
    /// Run the full pipeline over a range of indices
    Batch {
        /// First index (inclusive)
        #[arg(long)]
        start: i64,
        /// Last index (inclusive)
        #[arg(long)]
        end: i64,
        /// Write the traces to this JSON file
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Throughput benchmark: estimate every index, fully verify a sample
    Bench {
        /// Number of indices to estimate
        #[arg(long, default_value_t = 1_000_000)]
        count: u64,
        /// Fraction of indices run through the full pipeline
        #[arg(long, default_value_t = 0.001)]
        sample_rate: f64,
        /// Seconds between progress reports
        #[arg(long, default_value_t = 10)]
        report_secs: u64,
    },
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // LOG_FORMAT=json for log shippers, human-readable otherwise
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();
    let config = cli::load_config(&cli)?;
    cli::configure_rayon(cli.threads);

    match &cli.command {
        Commands::Estimate { index } => cli::run_estimate(&config, *index),
        Commands::Find { index } => cli::run_find(&config, *index),
        Commands::Candidate { index } => cli::run_candidate(&config, *index),
        Commands::Project { epoch, offset } => cli::run_project(&config, *epoch, *offset),
        Commands::Verify { candidates } => cli::run_verify(&config, candidates),
        Commands::Trace { index, contract } => cli::run_trace(&config, *index, *contract),
        Commands::Batch { start, end, export } => {
            cli::run_batch(&config, *start, *end, export.as_deref())
        }
        Commands::Bench {
            count,
            sample_rate,
            report_secs,
        } => cli::run_bench(&config, *count, *sample_rate, *report_secs),
    }
}
