//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::logging::OutputFormat;

/// Sheryl - run shell steps in order, with retries and step-to-step templates.
#[derive(Debug, Parser)]
#[command(name = "sheryl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Step log format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Simple)]
    pub output: OutputFormat,

    /// Path to config file, or a directory containing sheryl.yml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log every step field
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run all steps (default if no command specified)
    Run,

    /// Load and validate the configuration without running anything
    Validate,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_command_defaults_to_none() {
        let cli = Cli::parse_from(["sheryl"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.output, OutputFormat::Simple);
        assert!(!cli.verbose);
    }

    #[test]
    fn parses_run_with_global_flags() {
        let cli = Cli::parse_from(["sheryl", "run", "-o", "json", "-v", "-c", "ci.yml"]);
        assert!(matches!(cli.command, Some(Commands::Run)));
        assert_eq!(cli.output, OutputFormat::Json);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("ci.yml")));
    }

    #[test]
    fn parses_validate() {
        let cli = Cli::parse_from(["sheryl", "--no-color", "validate"]);
        assert!(matches!(cli.command, Some(Commands::Validate)));
        assert!(cli.no_color);
    }

    #[test]
    fn parses_completions_shell() {
        let cli = Cli::parse_from(["sheryl", "completions", "zsh"]);
        match cli.command {
            Some(Commands::Completions(args)) => assert_eq!(args.shell, Shell::Zsh),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_output_format() {
        assert!(Cli::try_parse_from(["sheryl", "--output", "xml"]).is_err());
    }
}
