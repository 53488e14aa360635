//! Configuration schema definitions for sheryl.
//!
//! This module contains the struct definitions that map to the YAML
//! configuration file format.

use serde::{Deserialize, Serialize};

/// Root configuration structure for `sheryl.yml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SherylConfig {
    /// Global environment shared by every step.
    ///
    /// Keys are upper-cased when merged. Scalar values are stringified.
    #[serde(skip_serializing_if = "serde_yaml::Mapping::is_empty")]
    pub env: serde_yaml::Mapping,

    /// Step definitions, executed in declaration order.
    pub steps: Vec<StepConfig>,
}

/// Configuration for a single step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepConfig {
    /// Unique step name, also the key other steps use in templates.
    pub name: String,

    /// Shell command, possibly containing `{{ .step.field }}` references.
    pub cmd: String,

    /// Wait before every attempt (e.g. `500ms`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<String>,

    /// Additional attempts after the first failure.
    #[serde(skip_serializing_if = "is_zero")]
    pub retries: u32,

    /// Wait between a failed attempt and the next retry (e.g. `2s`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
}

fn is_zero(v: &u32) -> bool {
    *v == 0
}
