//! Configuration loading, parsing, and validation for sheryl.
//!
//! This module handles all aspects of configuration:
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Validation in [`validator`]
//! - Duration strings in [`duration`]
//! - Environment merging in [`environment`]
//!
//! # Example
//!
//! ```
//! use sheryl::config::{load_config, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(
//!     temp.path().join("sheryl.yml"),
//!     "steps:\n  - name: hello\n    cmd: echo hello\n",
//! )
//! .unwrap();
//!
//! let (_, config) = load_config(temp.path(), None).unwrap();
//! validate(&config).unwrap();
//! assert_eq!(config.steps[0].name, "hello");
//! ```

pub mod duration;
pub mod environment;
pub mod loader;
pub mod schema;
pub mod validator;

pub use duration::{format_duration, parse_duration};
pub use environment::{config_env, load_system_env, merge_env};
pub use loader::{find_config, load_config, load_config_file, parse_config, CONFIG_FILE_NAMES};
pub use schema::{SherylConfig, StepConfig};
pub use validator::{validate, validate_config, ValidationError};
