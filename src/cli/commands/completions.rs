//! Shell completions generation.
//!
//! The `sheryl completions` command generates shell completion scripts.

use crate::cli::args::{Cli, CompletionsArgs};
use crate::logging::LogSink;
use clap::CommandFactory;
use std::io::Write;

use super::dispatcher::{Command, CommandResult};

/// The completions command implementation.
pub struct CompletionsCommand {
    args: CompletionsArgs,
}

impl CompletionsCommand {
    /// Create a new completions command.
    pub fn new(args: CompletionsArgs) -> Self {
        Self { args }
    }

    /// Write the completion script to `out`.
    pub fn generate(&self, out: &mut dyn Write) {
        let mut cmd = Cli::command();
        clap_complete::generate(self.args.shell, &mut cmd, "sheryl", out);
    }
}

impl Command for CompletionsCommand {
    fn execute(&self, _sink: &mut dyn LogSink) -> crate::error::Result<CommandResult> {
        let mut stdout = std::io::stdout();
        self.generate(&mut stdout);
        stdout.flush()?;
        Ok(CommandResult::success())
    }
}
