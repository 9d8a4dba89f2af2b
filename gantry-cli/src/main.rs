//! Gantry — deployment artifact generator CLI.
//!
//! # Usage
//!
//! ```text
//! gantry generate <descriptor.yaml> [--out DIR] [--policy FILE] [--dry-run] [--json]
//! gantry check <descriptor.yaml>
//! gantry diff <descriptor.yaml> [--out DIR] [--policy FILE]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{check::CheckArgs, diff::DiffArgs, generate::GenerateArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "gantry",
    version,
    about = "Generate container build, orchestration, and delivery pipeline artifacts",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render and write the artifact bundle for a descriptor.
    Generate(GenerateArgs),

    /// Validate a descriptor without rendering anything.
    Check(CheckArgs),

    /// Show a unified diff of what generate would write.
    Diff(DiffArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Generate(args) => args.run(),
        Commands::Check(args) => args.run(),
        Commands::Diff(args) => args.run(),
    }
}
