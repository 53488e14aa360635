//! Command templates.
//!
//! A step command may reference fields of steps that finished earlier in the
//! same run:
//!
//! - `{{ .build.output }}` - the `output` field of step `build`
//! - `{{- .build.output }}` / `{{ .build.output -}}` - also trim whitespace
//!   before / after the action
//! - `{{/* note */}}` - a comment, renders nothing
//!
//! Step and field names are matched case-insensitively. Anything else inside
//! `{{ }}` is rejected when the template is parsed.
//!
//! # Example
//!
//! ```
//! use sheryl::steps::{render, Step, StepRegistry};
//!
//! let mut registry = StepRegistry::new();
//! let mut build = Step::new("build", "make");
//! build.output = Some("ok".to_string());
//! registry.insert(&build);
//!
//! let cmd = render("notify", "echo {{ .build.output }}", &registry).unwrap();
//! assert_eq!(cmd, "echo ok");
//! ```

use crate::error::{Result, SherylError};
use crate::steps::StepRegistry;

/// A segment of a parsed template.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text
    Literal(String),
    /// Field reference: {{ .step.field }}
    Reference { step: String, field: String },
}

/// A parsed command template.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parse template text.
    ///
    /// Returns a human-readable message describing the first syntax error.
    pub fn parse(input: &str) -> std::result::Result<Self, String> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = input;
        let mut trim_next = false;

        while let Some(open) = rest.find("{{") {
            let mut text = &rest[..open];
            if trim_next {
                text = text.trim_start();
            }

            let mut body = &rest[open + 2..];
            if let Some(after) = strip_trim_marker(body) {
                text = text.trim_end();
                body = after;
            }
            literal.push_str(text);

            let close = body
                .find("}}")
                .ok_or_else(|| format!("unclosed action starting at byte {}", open))?;
            let mut inner = &body[..close];
            rest = &body[close + 2..];

            trim_next = false;
            if let Some(before) = inner.strip_suffix('-') {
                if before.ends_with(is_space) {
                    trim_next = true;
                    inner = before;
                }
            }

            let action = inner.trim();
            if action.starts_with("/*") {
                if action.len() < 4 || !action.ends_with("*/") {
                    return Err("unclosed comment".to_string());
                }
                continue;
            }

            let (step, field) = parse_reference(action)?;
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Reference { step, field });
        }

        let text = if trim_next { rest.trim_start() } else { rest };
        literal.push_str(text);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    /// The parsed segments in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Step/field pairs referenced by this template.
    pub fn references(&self) -> impl Iterator<Item = (&str, &str)> {
        self.segments.iter().filter_map(|seg| match seg {
            Segment::Reference { step, field } => Some((step.as_str(), field.as_str())),
            Segment::Literal(_) => None,
        })
    }

    /// Render against the finished steps of the current run.
    pub fn render(&self, registry: &StepRegistry) -> std::result::Result<String, String> {
        let mut out = String::new();
        for seg in &self.segments {
            match seg {
                Segment::Literal(text) => out.push_str(text),
                Segment::Reference { step, field } => {
                    let source = registry.get(step).ok_or_else(|| {
                        format!("no step named '{}' has finished before this one", step)
                    })?;
                    let value = source
                        .template_field(field)
                        .ok_or_else(|| format!("step '{}' has no field '{}'", source.name, field))?;
                    out.push_str(&value.to_string());
                }
            }
        }
        Ok(out)
    }
}

/// Parse and render `template` for the step named `step_name`.
///
/// # Errors
///
/// Returns `SherylError::Template` for syntax errors and unresolvable
/// references.
pub fn render(step_name: &str, template: &str, registry: &StepRegistry) -> Result<String> {
    let to_error = |message: String| SherylError::Template {
        step: step_name.to_string(),
        message,
    };
    let parsed = Template::parse(template).map_err(to_error)?;
    parsed.render(registry).map_err(to_error)
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// `{{- ` opens a left-trimming action; `{{-3}}` does not.
fn strip_trim_marker(body: &str) -> Option<&str> {
    let after = body.strip_prefix('-')?;
    after.starts_with(is_space).then_some(after)
}

fn parse_reference(action: &str) -> std::result::Result<(String, String), String> {
    if action.is_empty() {
        return Err("empty action".to_string());
    }
    let path = action.strip_prefix('.').ok_or_else(|| unsupported(action))?;
    if path.is_empty() {
        return Err("the step table itself cannot be rendered, use {{ .step.field }}".to_string());
    }

    let parts: Vec<&str> = path.split('.').collect();
    let valid = |p: &&str| !p.is_empty() && p.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-');
    if !parts.iter().all(valid) {
        return Err(unsupported(action));
    }

    match parts.as_slice() {
        [step] => Err(format!("reference to step '{}' is missing a field", step)),
        [step, field] => Ok((step.to_string(), field.to_string())),
        _ => Err(format!("nested field access '{}' is not supported", action)),
    }
}

fn unsupported(action: &str) -> String {
    format!(
        "unsupported action '{}', only {{{{ .step.field }}}} references are allowed",
        action
    )
}
