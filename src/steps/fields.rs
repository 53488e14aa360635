//! Field projections of a step.
//!
//! Log sinks and the template resolver both see a step through the same
//! small set of named values. The projections are explicit so that adding a
//! field to [`Step`] never leaks into logs or templates by accident.

use crate::config::format_duration;
use crate::runner::summary::ExecResult;
use crate::steps::Step;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};
use std::time::Duration;

/// A typed value attached to a log event or rendered into a template.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Plain text.
    Text(String),

    /// Ordered list of strings, e.g. the environment.
    List(Vec<String>),

    /// Elapsed or configured time span.
    Duration(Duration),

    /// Non-negative integer.
    Count(u64),

    /// Boolean flag.
    Flag(bool),

    /// Wall-clock instant.
    Time(DateTime<Utc>),

    /// Per-step outcomes of a run.
    Results(Vec<ExecResult>),

    /// A value that has not been set yet.
    Unset,
}

impl FieldValue {
    /// Whether this is a zero value that log projections leave out.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Duration(d) => d.is_zero(),
            FieldValue::Count(n) => *n == 0,
            FieldValue::Flag(b) => !b,
            FieldValue::Time(_) => false,
            FieldValue::Results(results) => results.is_empty(),
            FieldValue::Unset => true,
        }
    }

    /// JSON representation used by the JSON sink.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::List(items) => json!(items),
            FieldValue::Duration(d) => Value::String(format_duration(*d)),
            FieldValue::Count(n) => json!(n),
            FieldValue::Flag(b) => Value::Bool(*b),
            FieldValue::Time(t) => Value::String(format_time(t)),
            FieldValue::Results(results) => Value::Array(
                results
                    .iter()
                    .map(|r| json!({ "name": r.name, "status": r.status.summary_label() }))
                    .collect(),
            ),
            FieldValue::Unset => Value::Null,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::List(items) => write!(f, "[{}]", items.join(" ")),
            FieldValue::Duration(d) => write!(f, "{}", format_duration(*d)),
            FieldValue::Count(n) => write!(f, "{}", n),
            FieldValue::Flag(b) => write!(f, "{}", b),
            FieldValue::Time(t) => write!(f, "{}", format_time(t)),
            FieldValue::Results(results) => {
                let parts: Vec<String> = results
                    .iter()
                    .map(|r| format!("{}: {}", r.name, r.status.summary_label()))
                    .collect();
                write!(f, "[{}]", parts.join(", "))
            }
            FieldValue::Unset => Ok(()),
        }
    }
}

fn format_time(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Named field list carried by a log event.
pub type Fields = Vec<(&'static str, FieldValue)>;

fn non_empty(pairs: Vec<(&'static str, FieldValue)>) -> Fields {
    pairs.into_iter().filter(|(_, v)| !v.is_empty()).collect()
}

/// Fields logged for a step by default.
pub fn simple_fields(step: &Step) -> Fields {
    non_empty(vec![
        ("name", FieldValue::Text(step.name.clone())),
        ("env", FieldValue::List(step.env.to_vec())),
        ("cmd", FieldValue::Text(step.cmd.clone())),
        ("output", optional_text(&step.output)),
        ("duration", FieldValue::Duration(step.duration)),
    ])
}

/// Fields logged for a step in verbose mode.
pub fn verbose_fields(step: &Step) -> Fields {
    non_empty(vec![
        ("name", FieldValue::Text(step.name.clone())),
        ("env", FieldValue::List(step.env.to_vec())),
        ("cmd", FieldValue::Text(step.cmd.clone())),
        ("delay", FieldValue::Duration(step.delay)),
        ("retries", FieldValue::Count(u64::from(step.retries))),
        ("interval", FieldValue::Duration(step.interval)),
        ("output", optional_text(&step.output)),
        ("startAt", optional_time(step.start_at)),
        ("endAt", optional_time(step.end_at)),
        ("duration", FieldValue::Duration(step.duration)),
        ("pid", optional_pid(step.pid)),
    ])
}

/// Fields for a step, following its verbosity.
pub fn step_fields(step: &Step) -> Fields {
    if step.verbose {
        verbose_fields(step)
    } else {
        simple_fields(step)
    }
}

/// Look up a template-visible field by name, ignoring case.
///
/// Returns `None` for names that are not part of the template namespace.
pub fn template_field(step: &Step, field: &str) -> Option<FieldValue> {
    let value = match field.to_ascii_lowercase().as_str() {
        "name" => FieldValue::Text(step.name.clone()),
        "env" => FieldValue::List(step.env.to_vec()),
        "cmd" => FieldValue::Text(step.cmd.clone()),
        "delay" => FieldValue::Duration(step.delay),
        "retries" => FieldValue::Count(u64::from(step.retries)),
        "interval" => FieldValue::Duration(step.interval),
        "output" => optional_text(&step.output),
        "startat" => optional_time(step.start_at),
        "endat" => optional_time(step.end_at),
        "duration" => FieldValue::Duration(step.duration),
        "pid" => optional_pid(step.pid),
        "failed" => FieldValue::Flag(step.failed),
        _ => return None,
    };
    Some(value)
}

impl Step {
    /// See [`template_field`].
    pub fn template_field(&self, field: &str) -> Option<FieldValue> {
        template_field(self, field)
    }
}

fn optional_text(value: &Option<String>) -> FieldValue {
    value.clone().map_or(FieldValue::Unset, FieldValue::Text)
}

fn optional_time(value: Option<DateTime<Utc>>) -> FieldValue {
    value.map_or(FieldValue::Unset, FieldValue::Time)
}

fn optional_pid(value: Option<u32>) -> FieldValue {
    value.map_or(FieldValue::Unset, |pid| FieldValue::Count(u64::from(pid)))
}
