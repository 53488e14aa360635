//! Step execution orchestration.

pub mod orchestrator;
pub mod plan;
pub mod summary;

pub use orchestrator::{Orchestrator, RunReport, StepFailure, EXIT_INTERRUPTED};
pub use plan::RunPlan;
pub use summary::{ExecResult, RunSummary};
