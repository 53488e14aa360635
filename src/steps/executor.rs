//! Single-attempt step execution.
//!
//! An attempt renders the step's template against the registry, runs the
//! result through the shell and records timing and pid on the step.

use crate::error::{Result, SherylError};
use crate::shell::{execute, CancelToken, CommandOptions};
use crate::steps::{template, Step, StepRegistry};
use chrono::Utc;

/// Runs one attempt of a step.
///
/// The retry controller drives an `AttemptRunner`; tests substitute
/// scripted runners for the shell.
pub trait AttemptRunner {
    /// Run one attempt and return the captured output on success.
    fn run_attempt(&mut self, step: &mut Step, registry: &StepRegistry) -> Result<Vec<u8>>;
}

/// Runs attempts as `/bin/sh -c` subprocesses.
#[derive(Debug, Clone, Default)]
pub struct ShellRunner {
    cancel: CancelToken,
}

impl ShellRunner {
    /// Create a runner whose subprocesses are killed when `cancel` fires.
    pub fn new(cancel: CancelToken) -> Self {
        Self { cancel }
    }
}

impl AttemptRunner for ShellRunner {
    fn run_attempt(&mut self, step: &mut Step, registry: &StepRegistry) -> Result<Vec<u8>> {
        run_attempt(step, registry, &self.cancel)
    }
}

/// Render and run one attempt of `step`.
///
/// On return `step.cmd` holds the rendered command, and `start_at`,
/// `end_at`, `duration` and `pid` describe this attempt. `output` is not
/// touched; the orchestrator sets it once the step succeeds.
///
/// # Errors
///
/// - `Template` if rendering fails (nothing is spawned)
/// - `SpawnFailed` / `CommandFailed` for execution failures
/// - `Cancelled` if the token fired while the command was running
pub fn run_attempt(step: &mut Step, registry: &StepRegistry, cancel: &CancelToken) -> Result<Vec<u8>> {
    step.cmd = template::render(&step.name, step.template(), registry)?;
    tracing::debug!("[{}] running `{}`", step.name, step.cmd);

    let options = CommandOptions::new(&step.env, cancel);
    step.start_at = Some(Utc::now());
    let result = execute(&step.cmd, &options);
    let end = Utc::now();
    step.end_at = Some(end);

    let result = match result {
        Ok(result) => result,
        Err(e) => {
            step.pid = None;
            step.duration = step
                .start_at
                .and_then(|start| (end - start).to_std().ok())
                .unwrap_or_default();
            step.failed = true;
            return Err(e);
        }
    };

    step.pid = Some(result.pid);
    step.duration = result.duration;
    step.failed = !result.success;

    if result.cancelled {
        return Err(SherylError::Cancelled {
            step: step.name.clone(),
        });
    }
    if !result.success {
        return Err(SherylError::CommandFailed {
            command: step.cmd.clone(),
            code: result.exit_code,
        });
    }
    Ok(result.output)
}
