//! ICH Detect CLI - slice preprocessing and ensemble combination
//!
//! Command-line front end over the windowing and ensemble crates.

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod input;

use commands::combine::CombineCommand;
#[cfg(feature = "onnx")]
use commands::predict::PredictCommand;
use commands::window::WindowCommand;

#[derive(Parser)]
#[command(
    name = "ich-detect",
    version,
    about = "Multi-window CT preprocessing and ensemble combination for ICH classifiers",
    long_about = "Prepare decoded CT slices for intracranial hemorrhage classifiers and combine\n\
                  their per-label probabilities.\n\n\
                  Slices are windowed three times (blood, brain, bone), stacked as RGB and\n\
                  resized to the classifier input size. Classifier outputs are merged by\n\
                  mean probability and by strict majority vote.",
    after_help = "EXAMPLES:\n  \
                  # Window a decoded slice and write PNG previews\n  \
                  ich-detect window --input slice.json --output-dir ./outputs\n\n  \
                  # Combine classifier outputs with both rules\n  \
                  ich-detect combine --input predictions.json --method both\n\n  \
                  # Show the training-time window presets\n  \
                  ich-detect presets"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Window, stack and resize a decoded slice
    Window(WindowCommand),

    /// Combine per-classifier probabilities into ensemble results
    Combine(CombineCommand),

    /// Run ONNX classifiers on a decoded slice and combine their outputs
    #[cfg(feature = "onnx")]
    Predict(PredictCommand),

    /// Print the window presets
    Presets,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise --verbose selects debug
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to set tracing subscriber")?;

    match cli.command {
        Commands::Window(cmd) => cmd.execute(),
        Commands::Combine(cmd) => cmd.execute(),
        #[cfg(feature = "onnx")]
        Commands::Predict(cmd) => cmd.execute(),
        Commands::Presets => commands::presets::list_presets(),
    }
}
