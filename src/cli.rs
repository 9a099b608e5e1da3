use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// EMSR: empirical magnitude scaling relationships from seismic bulletins.
#[derive(Parser)]
#[command(
    name = "emsr",
    version,
    about = "Empirical magnitude scaling relationships from seismic bulletins"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Parse ISF bulletins and print what would be stored.
    Import(ImportArgs),
    /// Fit scaling relationships between two magnitude scales.
    Regress(RegressArgs),
    /// Convert measures to one target scale with a formula library.
    Harmonise(HarmoniseArgs),
}

/// Arguments for the `import` subcommand.
#[derive(clap::Args)]
pub struct ImportArgs {
    /// Bulletin files to import.
    #[arg(short, long, required = true, num_args = 1..)]
    pub input: Vec<PathBuf>,

    /// Optional TOML configuration file for the [import] section.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the catalogue name.
    #[arg(long)]
    pub catalogue: Option<String>,

    /// Abort on lines that do not belong to any event.
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the `regress` subcommand.
#[derive(clap::Args)]
pub struct RegressArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "emsr.toml")]
    pub config: PathBuf,

    /// Override the native scale from config.
    #[arg(long)]
    pub native: Option<String>,

    /// Override the target scale from config.
    #[arg(long)]
    pub target: Option<String>,

    /// Override the random selection seed from config.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Path for the JSON report; stdout if omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `harmonise` subcommand.
#[derive(clap::Args)]
pub struct HarmoniseArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "emsr.toml")]
    pub config: PathBuf,

    /// Override the target scale from config.
    #[arg(long)]
    pub target: Option<String>,

    /// Override the output path from config; stdout if neither is set.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the export format from config (csv or json).
    #[arg(short, long)]
    pub format: Option<String>,
}
