//! Sheryl - run shell steps in order, with retries and step-to-step templates.
//!
//! Sheryl reads a YAML file of named shell steps and runs them one after
//! another. A step may retry on failure, wait before each attempt, and
//! reference the results of earlier steps through `{{ .step.field }}`
//! templates. The first step that fails for good halts the run.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, parsing, and validation
//! - [`error`] - Error types and result aliases
//! - [`logging`] - Step log sinks (simple text, JSON)
//! - [`runner`] - Run preparation and step orchestration
//! - [`shell`] - Shell command execution and cancellation
//! - [`steps`] - Steps, templates, and the retry controller
//!
//! # Example
//!
//! ```
//! use sheryl::config::parse_config;
//! use sheryl::logging::MemorySink;
//! use sheryl::runner::{Orchestrator, RunPlan};
//! use sheryl::shell::CancelToken;
//! use std::path::Path;
//!
//! let yaml = r#"
//! steps:
//!   - name: greet
//!     cmd: echo hello
//!   - name: shout
//!     cmd: "printf '%s!' '{{ .greet.output }}'"
//! "#;
//! let config = parse_config(yaml, Path::new("sheryl.yml")).unwrap();
//! let mut plan = RunPlan::prepare(&config, Vec::new(), false).unwrap();
//!
//! let mut sink = MemorySink::new();
//! let report = Orchestrator::new(&mut sink, CancelToken::new()).run(&mut plan);
//!
//! assert!(report.success());
//! assert_eq!(plan.steps[1].cmd, "printf '%s!' 'hello\n'");
//! assert_eq!(plan.steps[1].output.as_deref(), Some("hello\n!"));
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod runner;
pub mod shell;
pub mod steps;

pub use error::{Result, SherylError};
