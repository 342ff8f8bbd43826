//! Environment resolver CLI
//!
//! Loads layered environment descriptors from disk, merges them, and reports
//! validation issues, deployment order or the merged model.

mod cli;
mod commands;
mod error;
mod loader;
mod logging;

use clap::{CommandFactory, Parser};
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: {}", "warning".yellow().bold(), e);
    }
    tracing::debug!(base_url = %cli.base_url, "Verbose mode enabled");

    execute_command(cli.command, &cli.base_url)
}

fn execute_command(cmd: Commands, base_url: &str) -> Result<()> {
    match cmd {
        Commands::Validate { layers, json } => commands::run_validate(&layers, base_url, json),
        Commands::Order { layers, json } => commands::run_order(&layers, base_url, json),
        Commands::Show { layers, json } => commands::run_show(&layers, base_url, json),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "envres", &mut std::io::stdout());
            Ok(())
        }
    }
}
