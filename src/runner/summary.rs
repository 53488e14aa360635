//! End-of-run summary.

use crate::logging::LogEvent;
use crate::steps::{FieldValue, Step, StepStatus};
use std::time::Duration;

/// Outcome of one step in the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    /// Step name.
    pub name: String,
    /// Terminal status.
    pub status: StepStatus,
}

/// Totals for a finished (or halted) run.
///
/// `results` holds only steps that reached a terminal state. Steps left
/// pending by a halt are absent there but still count in `total`, so a run
/// halted at its second of three steps reports `1/3` with two results.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Steps that reached a terminal state, in declaration order.
    pub results: Vec<ExecResult>,
    /// Sum of the last-attempt durations of those steps.
    pub exec_time: Duration,
    /// Number of steps that succeeded.
    pub succeeded: usize,
    /// Number of declared steps.
    pub total: usize,
}

impl RunSummary {
    /// Summarize the steps of a run.
    pub fn from_steps(steps: &[Step]) -> Self {
        let finished: Vec<&Step> = steps.iter().filter(|s| s.status.is_terminal()).collect();
        Self {
            results: finished
                .iter()
                .map(|s| ExecResult {
                    name: s.name.clone(),
                    status: s.status,
                })
                .collect(),
            exec_time: finished.iter().map(|s| s.duration).sum(),
            succeeded: finished
                .iter()
                .filter(|s| s.status == StepStatus::Succeeded)
                .count(),
            total: steps.len(),
        }
    }

    /// `"<succeeded>/<total>"`.
    pub fn success_ratio(&self) -> String {
        format!("{}/{}", self.succeeded, self.total)
    }

    /// Whether every declared step succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.succeeded == self.total
    }

    /// The `summary` log event.
    pub fn to_event(&self) -> LogEvent {
        let event = if self.all_succeeded() {
            LogEvent::info("summary")
        } else {
            LogEvent::error("summary")
        };
        event
            .with_field("results", FieldValue::Results(self.results.clone()))
            .with_field("execTime", FieldValue::Duration(self.exec_time))
            .with_field("success", FieldValue::Text(self.success_ratio()))
    }
}
