//! Run command implementation.
//!
//! The `sheryl run` command executes every configured step in order.

use std::path::{Path, PathBuf};

use crate::config::load_system_env;
use crate::error::Result;
use crate::logging::LogSink;
use crate::runner::{Orchestrator, RunPlan};
use crate::shell::CancelToken;

use super::dispatcher::{Command, CommandResult};
use super::{load_for_command, EXIT_CONFIG_NOT_FOUND};

/// The run command implementation.
pub struct RunCommand {
    base_dir: PathBuf,
    config: Option<PathBuf>,
    verbose: bool,
    cancel: CancelToken,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(base_dir: &Path, config: Option<PathBuf>, verbose: bool, cancel: CancelToken) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            config,
            verbose,
            cancel,
        }
    }

    /// Get the directory searched for config files.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl Command for RunCommand {
    fn execute(&self, sink: &mut dyn LogSink) -> Result<CommandResult> {
        let Some((_, config)) = load_for_command(&self.base_dir, self.config.as_deref(), sink)? else {
            return Ok(CommandResult::failure(EXIT_CONFIG_NOT_FOUND));
        };

        let mut plan = RunPlan::prepare(&config, load_system_env(), self.verbose)?;
        let report = Orchestrator::new(sink, self.cancel.clone()).run(&mut plan);

        if let Some(failure) = &report.failure {
            tracing::debug!("Run halted at '{}': {}", failure.step, failure.error);
        }

        if report.success() {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(report.exit_code()))
        }
    }
}
