mod cli;
mod config;
mod convert;
mod harmonise_cmd;
mod import_cmd;
mod logging;
mod regress_cmd;
#[cfg(test)]
mod testutil;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Import(args) => import_cmd::run(args),
        Command::Regress(args) => regress_cmd::run(args),
        Command::Harmonise(args) => harmonise_cmd::run(args),
    }
}
