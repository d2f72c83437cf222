//! blobsim CLI - run the blob population simulation from the command line.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;

#[derive(Parser)]
#[command(name = "blobsim")]
#[command(author, version, about = "blobsim - blobs, food, and the coming night", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default blobsim.toml
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Run the simulation
    Run {
        /// Number of days to simulate
        #[arg(short, long)]
        days: Option<u64>,

        /// Number of blobs at the start
        #[arg(short, long)]
        blobs: Option<usize>,

        /// Seed of the foraging sampler
        #[arg(short, long)]
        seed: Option<u64>,

        /// Food in the forest at the start
        #[arg(long)]
        initial_food: Option<u64>,

        /// Food grown every night
        #[arg(long)]
        production: Option<u64>,

        /// Print the full report as JSON instead of tables
        #[arg(long)]
        json: bool,

        /// Write the JSON report to a file
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init { path } => commands::init::run(path),
        Commands::Run {
            days,
            blobs,
            seed,
            initial_food,
            production,
            json,
            output,
        } => {
            let overrides = commands::run::Overrides {
                days,
                blobs,
                seed,
                initial_food,
                production,
            };
            commands::run::run(overrides, json, output.as_deref(), cli.verbose)
        }
    }
}
