//! `mesh-tool`: headless front end for the mesh session.
//!
//! # Commands
//!
//! - `mesh-tool analyze <FILE>` - Print the defect report of a mesh file
//! - `mesh-tool repair <INPUT> [OUTPUT]` - Repair to a closed surface and save
//! - `mesh-tool process <INPUT> --config <TOML>` - Run a pipeline of operations
//!
//! Logging goes to stderr and honors `RUST_LOG`; `-v` raises the default
//! level from `info` to `debug`.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Mesh defect analysis and topology repair
#[derive(Debug, Parser)]
#[command(name = "mesh-tool")]
#[command(about = "Analyze, repair and process STL/OBJ meshes", long_about = None)]
#[command(version)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the defect report of a mesh file
    Analyze {
        /// STL or OBJ file
        #[arg(name = "FILE")]
        path: PathBuf,
    },

    /// Repair a mesh into a closed surface
    Repair {
        /// STL or OBJ file to repair
        #[arg(name = "INPUT")]
        input: PathBuf,

        /// Output file (default: <stem>_repaired.<ext> next to the input,
        /// the English form of the older `_reparado` suffix)
        #[arg(name = "OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Run the operations listed in a TOML pipeline file
    Process {
        /// STL or OBJ file to process
        #[arg(name = "INPUT")]
        input: PathBuf,

        /// Pipeline file
        #[arg(short, long)]
        config: PathBuf,

        /// Output file (default: <stem>_processed.<ext> next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Analyze { path } => commands::analyze(&path),
        Commands::Repair { input, output } => commands::repair(&input, output.as_deref()),
        Commands::Process {
            input,
            config,
            output,
        } => commands::process(&input, &config, output.as_deref()),
    }
}
