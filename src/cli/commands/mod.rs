//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. This allows:
//! - Single binary with subcommands (`sheryl run`, `sheryl validate`)
//! - Shared config loading
//! - Consistent global flag handling

pub mod completions;
pub mod dispatcher;
pub mod run;
pub mod validate;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};

use std::path::{Path, PathBuf};

use crate::config::{load_config, SherylConfig};
use crate::error::{Result, SherylError};
use crate::logging::{LogEvent, LogSink};

/// Exit code when no config file could be found.
pub const EXIT_CONFIG_NOT_FOUND: i32 = 2;

/// Load the config for a command.
///
/// A missing config file is logged to `sink` and returned as `None`; every
/// other load error is propagated.
pub(crate) fn load_for_command(
    base_dir: &Path,
    config: Option<&Path>,
    sink: &mut dyn LogSink,
) -> Result<Option<(PathBuf, SherylConfig)>> {
    match load_config(base_dir, config) {
        Ok(loaded) => Ok(Some(loaded)),
        Err(e @ SherylError::ConfigNotFound { .. }) => {
            sink.emit(&LogEvent::error(e.to_string()));
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
