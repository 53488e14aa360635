//! Error types for sheryl operations.
//!
//! This module defines [`SherylError`], the error type used throughout the
//! crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! Errors fall into three families that the retry controller treats
//! differently:
//!
//! - Configuration errors (missing/invalid config, duplicate steps, bad
//!   durations, template errors) abort the run and are never retried
//! - Execution errors (non-zero exit, spawn failure) are retried up to the
//!   step's budget
//! - [`SherylError::Cancelled`] aborts immediately and bypasses retries

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for sheryl operations.
#[derive(Debug, Error)]
pub enum SherylError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// Two steps share a name (names are compared case-insensitively).
    #[error("Step name '{name}' is duplicated")]
    DuplicateStep { name: String },

    /// A duration field could not be parsed.
    #[error("Invalid {field} '{value}' for step '{step}': {message}")]
    InvalidDuration {
        step: String,
        field: &'static str,
        value: String,
        message: String,
    },

    /// A command template failed to parse or render.
    #[error("Template error in step '{step}': {message}")]
    Template { step: String, message: String },

    /// Shell command exited unsuccessfully.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// The shell could not be started.
    #[error("Failed to spawn `{command}`: {message}")]
    SpawnFailed { command: String, message: String },

    /// The run was interrupted while the step was in flight.
    #[error("Step '{step}' was cancelled")]
    Cancelled { step: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SherylError {
    /// Whether another attempt of the same step may succeed.
    ///
    /// Only subprocess failures are retried. Template errors are
    /// configuration problems and cancellation is final.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SherylError::CommandFailed { .. } | SherylError::SpawnFailed { .. }
        )
    }

    /// Whether this error was caused by an interrupt.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SherylError::Cancelled { .. })
    }
}

/// Result type alias for sheryl operations.
pub type Result<T> = std::result::Result<T, SherylError>;
