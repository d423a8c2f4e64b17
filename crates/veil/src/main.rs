//! Veil CLI - batch image perturbation against reverse-image search.
//!
//! Veil rewrites each input image just enough to break perceptual-hash and
//! crop-tolerant matching while staying visually near-identical: geometry
//! shifts, a banded gradient overlay, optional foreign elements, grain,
//! enhancement jitter, shear, a lossy re-encode, and a metadata strip.
//!
//! # Usage
//!
//! ```bash
//! # Perturb a directory of images
//! veil process ./original_images --output ./modified_images
//!
//! # Include emoji and decorative elements, reproducibly
//! veil process ./photos --emoji --decorative --seed 42
//!
//! # View configuration
//! veil config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Veil - batch image perturbation against reverse-image search.
#[derive(Parser, Debug)]
#[command(name = "veil")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Perturb images and write the results to the output directory
    Process(cli::process::ProcessArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging from config, with CLI verbose override.
    // Note: logging isn't initialized yet, so use eprintln for config warnings.
    let config = match veil_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `veil config path`."
            );
            veil_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("veil v{}", veil_core::VERSION);

    // Dispatch to the appropriate command handler
    match cli.command {
        Commands::Process(args) => cli::process::execute(config, args),
        Commands::Config(args) => cli::config::execute(args),
    }
}
