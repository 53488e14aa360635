//! Run preparation.
//!
//! A [`RunPlan`] is everything the orchestrator needs, built from a loaded
//! config before any step runs.

use crate::config::{merge_env, parse_duration, validate, SherylConfig, StepConfig};
use crate::error::{Result, SherylError};
use crate::steps::Step;
use std::sync::Arc;
use std::time::Duration;

/// Validated steps ready to run.
#[derive(Debug, Clone)]
pub struct RunPlan {
    /// Steps in declaration order.
    pub steps: Vec<Step>,
    /// Whether steps log their full field set.
    pub verbose: bool,
}

impl RunPlan {
    /// Validate `config` and build its steps.
    ///
    /// Every step shares one environment: `process_env` overlaid with the
    /// config's `env` mapping.
    ///
    /// # Errors
    ///
    /// Returns the validation error if the config is invalid.
    pub fn prepare(
        config: &SherylConfig,
        process_env: impl IntoIterator<Item = (String, String)>,
        verbose: bool,
    ) -> Result<Self> {
        validate(config)?;

        let env: Arc<[String]> = merge_env(&config.env, process_env).into();
        let steps = config
            .steps
            .iter()
            .map(|s| step_from_config(s, &env, verbose))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!("Prepared {} steps ({} env entries)", steps.len(), env.len());
        Ok(Self { steps, verbose })
    }

    /// Number of steps in the plan.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the plan has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

fn step_from_config(config: &StepConfig, env: &Arc<[String]>, verbose: bool) -> Result<Step> {
    Ok(Step::new(&config.name, &config.cmd)
        .with_env(Arc::clone(env))
        .with_delay(step_duration(config, "delay", config.delay.as_deref())?)
        .with_retries(config.retries)
        .with_interval(step_duration(config, "interval", config.interval.as_deref())?)
        .with_verbose(verbose))
}

fn step_duration(config: &StepConfig, field: &'static str, value: Option<&str>) -> Result<Duration> {
    match value {
        None | Some("") => Ok(Duration::ZERO),
        Some(value) => parse_duration(value).map_err(|message| SherylError::InvalidDuration {
            step: config.name.clone(),
            field,
            value: value.to_string(),
            message,
        }),
    }
}
