//! Configuration validation rules.
//!
//! This module validates configuration before anything runs:
//! - Steps must have a name and a command
//! - Step names must be unique, ignoring case
//! - `delay` and `interval` must be valid durations
//! - Command templates must parse

use crate::config::duration::parse_duration;
use crate::config::schema::{SherylConfig, StepConfig};
use crate::error::{Result, SherylError};
use crate::steps::Template;
use std::collections::HashSet;

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
    /// Step name if error is step-specific
    pub step: Option<String>,
}

impl ValidationError {
    fn for_step(rule: &str, step: &StepConfig, message: String) -> Self {
        Self {
            rule: rule.to_string(),
            message,
            step: Some(step.name.clone()),
        }
    }
}

/// Validate a configuration and return all errors.
///
/// This function collects all validation errors rather than stopping
/// at the first one, allowing users to fix multiple issues at once.
pub fn validate_config(config: &SherylConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (index, step) in config.steps.iter().enumerate() {
        if step.name.trim().is_empty() {
            errors.push(ValidationError::for_step(
                "missing-name",
                step,
                format!("Step #{} has no name", index + 1),
            ));
        } else if !seen.insert(step.name.to_lowercase()) {
            errors.push(ValidationError::for_step(
                "duplicate-step",
                step,
                format!("Step name '{}' is duplicated", step.name),
            ));
        }

        if step.cmd.trim().is_empty() {
            errors.push(ValidationError::for_step(
                "missing-command",
                step,
                format!("Step '{}' has no command", step.name),
            ));
        }

        for (field, value) in [("delay", &step.delay), ("interval", &step.interval)] {
            let Some(value) = value.as_deref().filter(|v| !v.is_empty()) else {
                continue;
            };
            if let Err(e) = parse_duration(value) {
                errors.push(ValidationError::for_step(
                    "invalid-duration",
                    step,
                    format!("Step '{}' has invalid {} '{}': {}", step.name, field, value, e),
                ));
            }
        }

        if let Err(e) = Template::parse(&step.cmd) {
            errors.push(ValidationError::for_step(
                "template-syntax",
                step,
                format!("Step '{}' has an invalid command template: {}", step.name, e),
            ));
        }
    }

    errors
}

/// Validate configuration and return first error.
///
/// A duplicated step name is reported as `DuplicateStep`; every other
/// problem is collected into one `ConfigValidationError`.
pub fn validate(config: &SherylConfig) -> Result<()> {
    let errors = validate_config(config);

    if let Some(duplicate) = errors.iter().find(|e| e.rule == "duplicate-step") {
        return Err(SherylError::DuplicateStep {
            name: duplicate.step.clone().unwrap_or_default(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(SherylError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(name: &str, cmd: &str) -> StepConfig {
        StepConfig {
            name: name.to_string(),
            cmd: cmd.to_string(),
            ..Default::default()
        }
    }

    fn config(steps: Vec<StepConfig>) -> SherylConfig {
        SherylConfig {
            steps,
            ..Default::default()
        }
    }

    fn rules(config: &SherylConfig) -> Vec<String> {
        validate_config(config).into_iter().map(|e| e.rule).collect()
    }

    #[test]
    fn valid_config_passes() {
        let config = config(vec![step("a", "echo hi"), step("b", "echo {{ .a.output }}")]);
        assert!(validate_config(&config).is_empty());
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn empty_config_is_valid() {
        assert!(validate(&SherylConfig::default()).is_ok());
    }

    #[test]
    fn detects_missing_name() {
        assert_eq!(rules(&config(vec![step("", "true")])), vec!["missing-name"]);
    }

    #[test]
    fn detects_missing_command() {
        assert_eq!(rules(&config(vec![step("a", "  ")])), vec!["missing-command"]);
    }

    #[test]
    fn detects_duplicates_ignoring_case() {
        let config = config(vec![step("build", "true"), step("Build", "true")]);
        assert_eq!(rules(&config), vec!["duplicate-step"]);

        let err = validate(&config).unwrap_err();
        assert!(matches!(err, SherylError::DuplicateStep { ref name } if name == "Build"));
    }

    #[test]
    fn detects_invalid_durations() {
        let mut bad = step("a", "true");
        bad.delay = Some("soon".to_string());
        bad.interval = Some("-1s".to_string());

        let errors = validate_config(&config(vec![bad]));
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.rule == "invalid-duration"));
        assert!(errors[0].message.contains("delay"));
        assert!(errors[1].message.contains("interval"));
    }

    #[test]
    fn empty_duration_strings_are_allowed() {
        let mut s = step("a", "true");
        s.delay = Some(String::new());
        s.interval = Some("0".to_string());
        assert!(validate_config(&config(vec![s])).is_empty());
    }

    #[test]
    fn detects_template_syntax_errors() {
        let config = config(vec![step("a", "echo {{ .b.output")]);
        assert_eq!(rules(&config), vec!["template-syntax"]);
    }

    #[test]
    fn forward_references_are_left_to_render_time() {
        let config = config(vec![step("a", "echo {{ .b.output }}"), step("b", "true")]);
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn collects_all_errors() {
        let config = config(vec![step("", ""), step("x", "{{ }}")]);
        let err = validate(&config).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("no name"));
        assert!(message.contains("no command"));
        assert!(message.contains("empty action"));
    }
}
