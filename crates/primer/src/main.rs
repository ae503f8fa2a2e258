//! primer CLI - lesson markup renderer and snippet runner.
//!
//! Provides commands for:
//! - `render`: Parse a lesson document into content nodes
//! - `run`: Execute a code snippet in the remote sandbox

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{RenderArgs, RunArgs};
use output::Output;

/// primer - lesson markup renderer and snippet runner.
#[derive(Parser)]
#[command(name = "primer", version, about)]
struct Cli {
    /// Enable verbose output (info-level logs, including fallback warnings).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a lesson document as JSON nodes or HTML.
    Render(RenderArgs),
    /// Run a code snippet.
    Run(RunArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(&output),
        Commands::Run(args) => args.execute(&output),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            output.error(&format!("Error: {err}"));
            std::process::exit(1);
        }
    }
}
