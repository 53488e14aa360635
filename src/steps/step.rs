//! The step entity.
//!
//! A [`Step`] is created from configuration before the run starts and is
//! owned by the orchestrator for the rest of the run. Its result fields
//! (`output`, timestamps, `pid`, `failed`) describe the last attempt.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

/// Lifecycle of a step within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepStatus {
    /// Step has not started yet.
    #[default]
    Pending,

    /// Step is currently executing (possibly retrying).
    Running,

    /// Step completed successfully.
    Succeeded,

    /// Step exhausted its attempts, or hit a non-retryable error.
    Failed,
}

impl StepStatus {
    /// Check if this is a terminal state (no more changes expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepStatus::Succeeded | StepStatus::Failed)
    }

    /// Label used in the run summary.
    pub fn summary_label(&self) -> &'static str {
        match self {
            StepStatus::Succeeded => "success",
            _ => "failed",
        }
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StepStatus::Pending => "pending",
            StepStatus::Running => "running",
            StepStatus::Succeeded => "succeeded",
            StepStatus::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// A single declared unit of shell-command work.
#[derive(Debug, Clone)]
pub struct Step {
    /// Step name, unique within the run.
    pub name: String,

    /// Command text. Holds the template until the first successful render,
    /// then the rendered command of the latest attempt.
    pub cmd: String,

    /// Declared command template. Every attempt renders from this.
    template: String,

    /// `KEY=VALUE` entries forming the complete subprocess environment.
    pub env: Arc<[String]>,

    /// Wait before every attempt.
    pub delay: Duration,

    /// Additional attempts permitted after the first failure.
    pub retries: u32,

    /// Wait between a failed attempt and the next one.
    pub interval: Duration,

    /// Combined stdout and stderr, set only on success.
    pub output: Option<String>,

    /// Start of the last attempt.
    pub start_at: Option<DateTime<Utc>>,

    /// End of the last attempt.
    pub end_at: Option<DateTime<Utc>>,

    /// Elapsed time of the last attempt.
    pub duration: Duration,

    /// Process id of the last spawned shell.
    pub pid: Option<u32>,

    /// Whether the step ended in failure.
    pub failed: bool,

    /// Current lifecycle state.
    pub status: StepStatus,

    /// Attempts made so far in this run.
    pub attempts: u32,

    /// Log the full field set for this step.
    pub verbose: bool,
}

impl Step {
    /// Create a pending step with no environment, delay or retries.
    pub fn new(name: impl Into<String>, cmd: impl Into<String>) -> Self {
        let cmd = cmd.into();
        Self {
            name: name.into(),
            template: cmd.clone(),
            cmd,
            env: Arc::from(Vec::new()),
            delay: Duration::ZERO,
            retries: 0,
            interval: Duration::ZERO,
            output: None,
            start_at: None,
            end_at: None,
            duration: Duration::ZERO,
            pid: None,
            failed: false,
            status: StepStatus::Pending,
            attempts: 0,
            verbose: false,
        }
    }

    /// Set the shared environment.
    pub fn with_env(mut self, env: Arc<[String]>) -> Self {
        self.env = env;
        self
    }

    /// Set the pre-attempt delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set the retry budget.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Set the wait between attempts.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Select the verbose log field set.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// The declared command template.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Upper bound on attempts: the first one plus `retries`.
    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }
}
