//! Results of steps that have finished in the current run.

use crate::steps::Step;
use std::collections::HashMap;

/// Snapshots of finished steps keyed by lower-cased name.
///
/// Templates resolve `{{ .name.field }}` against this registry, so a step
/// can only see steps that reached a terminal state before it started.
#[derive(Debug, Default, Clone)]
pub struct StepRegistry {
    entries: HashMap<String, Step>,
}

impl StepRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished step.
    ///
    /// The first snapshot for a name is kept; returns `false` if the name
    /// was already present.
    pub fn insert(&mut self, step: &Step) -> bool {
        let key = Self::key(&step.name);
        if self.entries.contains_key(&key) {
            tracing::warn!("Step '{}' already recorded, keeping first result", step.name);
            return false;
        }
        self.entries.insert(key, step.clone());
        true
    }

    /// Look up a finished step by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&Step> {
        self.entries.get(&Self::key(name))
    }

    /// Check whether a step has finished.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&Self::key(name))
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn key(name: &str) -> String {
        name.to_lowercase()
    }
}
