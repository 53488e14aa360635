//! Steps and their execution.
//!
//! - [`Step`] - a declared unit of shell work and its latest result
//! - [`StepRegistry`] - finished steps visible to later templates
//! - [`template`] - `{{ .step.field }}` command templates
//! - [`run_attempt`] - one render-and-run attempt
//! - [`execute_with_retry`] - the retry controller

pub mod executor;
pub mod fields;
pub mod registry;
pub mod retry;
pub mod step;
pub mod template;

pub use executor::{run_attempt, AttemptRunner, ShellRunner};
pub use fields::{simple_fields, step_fields, template_field, verbose_fields, FieldValue, Fields};
pub use registry::StepRegistry;
pub use retry::{execute_with_retry, AttemptFailure, Sleeper, ThreadSleeper};
pub use step::{Step, StepStatus};
pub use template::{render, Template};
