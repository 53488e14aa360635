//! Validate command implementation.
//!
//! The `sheryl validate` command loads and checks the configuration without
//! running any step.

use std::path::{Path, PathBuf};

use crate::config::validate;
use crate::error::Result;
use crate::logging::{LogEvent, LogSink};
use crate::steps::FieldValue;

use super::dispatcher::{Command, CommandResult};
use super::{load_for_command, EXIT_CONFIG_NOT_FOUND};

/// The validate command implementation.
pub struct ValidateCommand {
    base_dir: PathBuf,
    config: Option<PathBuf>,
}

impl ValidateCommand {
    /// Create a new validate command.
    pub fn new(base_dir: &Path, config: Option<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            config,
        }
    }
}

impl Command for ValidateCommand {
    fn execute(&self, sink: &mut dyn LogSink) -> Result<CommandResult> {
        let Some((path, config)) = load_for_command(&self.base_dir, self.config.as_deref(), sink)? else {
            return Ok(CommandResult::failure(EXIT_CONFIG_NOT_FOUND));
        };

        validate(&config)?;

        sink.emit(
            &LogEvent::info("configuration is valid")
                .with_field("path", FieldValue::Text(path.display().to_string()))
                .with_field("steps", FieldValue::Count(config.steps.len() as u64)),
        );
        Ok(CommandResult::success())
    }
}
