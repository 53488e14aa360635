//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::logging::LogSink;
use crate::shell::CancelToken;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `sink` - Destination for the step log
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, sink: &mut dyn LogSink) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    base_dir: PathBuf,
    cancel: CancelToken,
}

impl CommandDispatcher {
    /// Create a new dispatcher that looks for config in `base_dir`.
    pub fn new(base_dir: PathBuf, cancel: CancelToken) -> Self {
        Self { base_dir, cancel }
    }

    /// Get the directory searched for config files.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it.
    pub fn dispatch(&self, cli: &Cli, sink: &mut dyn LogSink) -> Result<CommandResult> {
        match &cli.command {
            Some(Commands::Run) | None => {
                let cmd = super::run::RunCommand::new(
                    &self.base_dir,
                    cli.config.clone(),
                    cli.verbose,
                    self.cancel.clone(),
                );
                cmd.execute(sink)
            }
            Some(Commands::Validate) => {
                let cmd = super::validate::ValidateCommand::new(&self.base_dir, cli.config.clone());
                cmd.execute(sink)
            }
            Some(Commands::Completions(args)) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(sink)
            }
        }
    }
}
