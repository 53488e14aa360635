//! Sequential step orchestration.
//!
//! Steps run strictly in declaration order. Each one moves
//! `Pending -> Running -> {Succeeded, Failed}`; the first failure halts the
//! run and later steps stay `Pending`. A summary event is always emitted.

use crate::error::SherylError;
use crate::logging::{Level, LogEvent, LogSink};
use crate::runner::plan::RunPlan;
use crate::runner::summary::RunSummary;
use crate::shell::CancelToken;
use crate::steps::{
    execute_with_retry, step_fields, AttemptFailure, AttemptRunner, FieldValue, ShellRunner,
    Sleeper, Step, StepRegistry, StepStatus, ThreadSleeper,
};

/// Exit code for an interrupted run (128 + SIGINT).
pub const EXIT_INTERRUPTED: i32 = 130;

/// The step that halted a run and why.
#[derive(Debug)]
pub struct StepFailure {
    /// Name of the failed step.
    pub step: String,
    /// Error of its final attempt.
    pub error: SherylError,
}

/// Result of a run.
#[derive(Debug)]
pub struct RunReport {
    /// Summary as logged at the end of the run.
    pub summary: RunSummary,
    /// The failure that halted the run, if any.
    pub failure: Option<StepFailure>,
    /// Finished steps, as later templates saw them.
    pub registry: StepRegistry,
}

impl RunReport {
    /// Whether every step succeeded.
    pub fn success(&self) -> bool {
        self.failure.is_none()
    }

    /// Whether the run was halted by an interrupt.
    pub fn interrupted(&self) -> bool {
        self.failure.as_ref().is_some_and(|f| f.error.is_cancelled())
    }

    /// Process exit code for this run.
    pub fn exit_code(&self) -> i32 {
        if self.success() {
            0
        } else if self.interrupted() {
            EXIT_INTERRUPTED
        } else {
            1
        }
    }
}

/// Runs steps in order, logging to a borrowed sink.
pub struct Orchestrator<'a> {
    sink: &'a mut dyn LogSink,
    sleeper: Box<dyn Sleeper + 'a>,
    cancel: CancelToken,
}

impl<'a> Orchestrator<'a> {
    /// Create an orchestrator that sleeps on the current thread.
    pub fn new(sink: &'a mut dyn LogSink, cancel: CancelToken) -> Self {
        Self {
            sink,
            sleeper: Box::new(ThreadSleeper),
            cancel,
        }
    }

    /// Replace the sleeper used for delays and intervals.
    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'a) -> Self {
        self.sleeper = Box::new(sleeper);
        self
    }

    /// Run a prepared plan through the shell.
    pub fn run(&mut self, plan: &mut RunPlan) -> RunReport {
        let mut runner = ShellRunner::new(self.cancel.clone());
        self.run_steps(&mut plan.steps, &mut runner)
    }

    /// Run `steps` in order with the given attempt runner.
    pub fn run_steps(&mut self, steps: &mut [Step], runner: &mut dyn AttemptRunner) -> RunReport {
        let mut registry = StepRegistry::new();
        let mut failure = None;

        for step in steps.iter_mut() {
            step.status = StepStatus::Running;
            step.attempts = 0;
            tracing::debug!("[{}] starting (retries: {})", step.name, step.retries);

            let sink = &mut *self.sink;
            let result = execute_with_retry(
                step,
                &registry,
                runner,
                self.sleeper.as_ref(),
                &self.cancel,
                |attempt| sink.emit(&attempt_failed_event(&attempt)),
            );

            match result {
                Ok(output) => {
                    step.failed = false;
                    step.output = Some(String::from_utf8_lossy(&output).into_owned());
                    step.status = StepStatus::Succeeded;
                    registry.insert(step);
                    self.sink.emit(
                        &LogEvent::info(format!("[{}] succeeded", step.name))
                            .with_fields(step_fields(step)),
                    );
                }
                Err(error) => {
                    step.failed = true;
                    step.status = StepStatus::Failed;
                    registry.insert(step);
                    self.sink.emit(
                        &LogEvent::error(format!("[{}] failed: {}", step.name, error))
                            .with_fields(step_fields(step)),
                    );
                    failure = Some(StepFailure {
                        step: step.name.clone(),
                        error,
                    });
                    break;
                }
            }
        }

        let summary = RunSummary::from_steps(steps);
        self.sink.emit(&summary.to_event());

        RunReport {
            summary,
            failure,
            registry,
        }
    }
}

/// Retried attempts log as warnings; the last one as an error.
fn attempt_failed_event(attempt: &AttemptFailure<'_>) -> LogEvent {
    let level = if attempt.will_retry { Level::Warn } else { Level::Error };
    let event = LogEvent::new(
        level,
        format!(
            "[{}] attempt {}/{} failed: {}",
            attempt.step.name, attempt.attempt, attempt.max_attempts, attempt.error
        ),
    );
    match attempt.step.pid {
        Some(pid) => event.with_field("pid", FieldValue::Count(u64::from(pid))),
        None => event,
    }
}
