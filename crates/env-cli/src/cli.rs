//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Environment resolver - Merge, validate and order layered environment descriptors
#[derive(Parser, Debug)]
#[command(name = "envres")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Server that `org/name` component repositories are resolved against
    #[arg(
        long,
        global = true,
        env = "ENVRES_BASE_URL",
        default_value = env_model::DEFAULT_BASE_URL
    )]
    pub base_url: String,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Resolve descriptor layers and report validation issues
    ///
    /// Layers are given least specific first. Exits with status 2 when the
    /// merged environment has errors; warnings alone do not fail.
    ///
    /// Examples:
    ///   envres validate distribution.yaml root.yaml
    ///   envres validate root.yaml --json
    Validate {
        /// Descriptor files (YAML, JSON or TOML), least specific first
        #[arg(required = true)]
        layers: Vec<PathBuf>,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print stacks in deployment order
    Order {
        /// Descriptor files (YAML, JSON or TOML), least specific first
        #[arg(required = true)]
        layers: Vec<PathBuf>,

        /// Output as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Show a summary of the merged environment
    Show {
        /// Descriptor files (YAML, JSON or TOML), least specific first
        #[arg(required = true)]
        layers: Vec<PathBuf>,

        /// Output the full merged model as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    ///
    /// Examples:
    ///   envres completions bash > ~/.local/share/bash-completion/completions/envres
    ///   envres completions zsh > ~/.zfunc/_envres
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_validate_command() {
        let cli = Cli::parse_from(["envres", "validate", "base.yaml", "root.yaml", "--json"]);
        match cli.command {
            Commands::Validate { layers, json } => {
                assert_eq!(layers, vec![PathBuf::from("base.yaml"), PathBuf::from("root.yaml")]);
                assert!(json);
            }
            _ => panic!("Expected Validate command"),
        }
    }

    #[test]
    fn parse_validate_requires_layers() {
        assert!(Cli::try_parse_from(["envres", "validate"]).is_err());
    }

    #[test]
    fn parse_order_command() {
        let cli = Cli::parse_from(["envres", "order", "root.yaml"]);
        assert!(matches!(cli.command, Commands::Order { json: false, .. }));
    }

    #[test]
    fn parse_base_url_flag() {
        let cli = Cli::parse_from([
            "envres",
            "show",
            "root.yaml",
            "--base-url",
            "https://git.example.com/",
        ]);
        assert_eq!(cli.base_url, "https://git.example.com/");
    }

    #[test]
    fn parse_completions_command() {
        let cli = Cli::parse_from(["envres", "completions", "bash"]);
        assert!(matches!(cli.command, Commands::Completions { .. }));
    }
}
