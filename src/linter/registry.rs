//! Ordered rule registry with per-rule overrides and storage.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::diagnostic::Severity;
use crate::linter::rule::{LinterRule, RuleStorage};

/// Programmer error at the registry boundary: duplicate add, or an
/// operation on a rule that is not registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("rule \"{0}\" is already registered")]
    DuplicateRule(String),
    #[error("rule \"{0}\" doesn't exist")]
    UnknownRule(String),
}

/// One registered rule with its private storage and overrides.
pub struct RuleEntry {
    pub(crate) rule: Arc<dyn LinterRule>,
    pub(crate) storage: RuleStorage,
    pub(crate) config_override: Option<Vec<serde_json::Value>>,
    pub(crate) severity_override: Option<Severity>,
}

impl RuleEntry {
    fn new(rule: Arc<dyn LinterRule>) -> Self {
        Self {
            rule,
            storage: RuleStorage::default(),
            config_override: None,
            severity_override: None,
        }
    }

    /// Severity the rule currently reports at.
    pub fn effective_severity(&self) -> Severity {
        self.severity_override.unwrap_or_else(|| self.rule.severity())
    }

    pub fn rule(&self) -> &Arc<dyn LinterRule> {
        &self.rule
    }
}

/// Rule registry preserving registration order.
#[derive(Default)]
pub struct RuleRegistry {
    entries: Vec<RuleEntry>,
    index: HashMap<&'static str, usize>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn add(&mut self, rule: Arc<dyn LinterRule>) -> Result<(), RegistryError> {
        let name = rule.name();
        if self.index.contains_key(name) {
            return Err(RegistryError::DuplicateRule(name.to_string()));
        }
        self.index.insert(name, self.entries.len());
        self.entries.push(RuleEntry::new(rule));
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<(), RegistryError> {
        let Some(idx) = self.index.remove(name) else {
            return Err(RegistryError::UnknownRule(name.to_string()));
        };
        self.entries.remove(idx);
        // Entries after the removed one shift down by one.
        for slot in self.index.values_mut() {
            if *slot > idx {
                *slot -= 1;
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&RuleEntry> {
        self.index.get(name).map(|&idx| &self.entries[idx])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut RuleEntry> {
        self.index.get(name).map(|&idx| &mut self.entries[idx])
    }

    pub fn has(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.rule.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entries(&self) -> &[RuleEntry] {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [RuleEntry] {
        &mut self.entries
    }

    /// Clear every override and zero all rule storage.
    pub(crate) fn reset_overrides(&mut self) {
        for entry in &mut self.entries {
            entry.severity_override = None;
            entry.config_override = None;
            entry.storage.clear();
        }
    }
}
