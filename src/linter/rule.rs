//! The diagnostic rule contract and the per-event rule context.

use std::any::Any;
use std::sync::Arc;

use crate::ast::AnyRule;
use crate::diagnostic::{Position, Problem, Severity};
use crate::linter::config::{ConfigError, LinterConfig};
use crate::subparser::{SubParser, SubParserError, SubParserRegistry};

/// A diagnostic rule. Implementations must be `Send + Sync` so a rule set
/// can be shared between linter instances.
///
/// Rules are pure tree-walkers: they inspect the AST handed through the
/// context and call [`RuleContext::report`]. They must not mutate the AST;
/// a fix attached to a report must be a deep copy owned by the problem.
pub trait LinterRule: Send + Sync {
    /// Rule name, e.g. `single-selector`.
    fn name(&self) -> &'static str;

    /// Severity the rule reports at when no override is configured.
    fn severity(&self) -> Severity {
        Severity::Error
    }

    /// Validate rule-specific configuration parameters (the values after
    /// the severity). Rules with a configuration schema override this;
    /// the default accepts anything.
    fn validate_config(&self, _params: &[serde_json::Value]) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Called once before the first line of a filter list.
    fn on_start_filter_list(&self, _ctx: &mut RuleContext<'_>) {}

    /// Called for every linted line with the parsed AST available.
    fn on_rule(&self, _ctx: &mut RuleContext<'_>) {}

    /// Called once after the last line of a filter list.
    fn on_end_filter_list(&self, _ctx: &mut RuleContext<'_>) {}
}

/// Scratch space private to one rule, owned by its registry entry. The
/// kernel never inspects the payload and zeroes it on configuration reset.
#[derive(Default)]
pub struct RuleStorage {
    slot: Option<Box<dyn Any + Send + Sync>>,
}

impl RuleStorage {
    /// Borrow the typed storage value, initializing it first if the slot
    /// is empty or holds a different type.
    pub fn get_or_insert_with<T: Send + Sync + 'static>(
        &mut self,
        init: impl FnOnce() -> T,
    ) -> &mut T {
        if !self.slot.as_ref().is_some_and(|slot| slot.is::<T>()) {
            self.slot = Some(Box::new(init()));
        }
        match self.slot.as_mut().and_then(|slot| slot.downcast_mut::<T>()) {
            Some(value) => value,
            None => unreachable!("storage slot was just initialized"),
        }
    }

    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.slot.as_ref().and_then(|slot| slot.downcast_ref::<T>())
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }
}

/// A problem as reported by a rule. The kernel stamps the rule name and
/// the effective severity.
#[derive(Debug, Clone)]
pub struct ProblemReport {
    pub message: String,
    pub position: Position,
    pub fix: Option<Vec<AnyRule>>,
}

/// Per-event context handed to rule callbacks. Everything except the
/// storage slot and the problem sink is read-only; the configuration
/// getter returns a defensive copy.
pub struct RuleContext<'a> {
    pub(crate) linter_config: &'a LinterConfig,
    pub(crate) subparsers: &'a SubParserRegistry,
    pub(crate) content: &'a str,
    pub(crate) fixing: bool,
    pub(crate) line: Option<&'a str>,
    pub(crate) ast: Option<&'a AnyRule>,
    pub(crate) line_no: usize,
    pub(crate) rule_name: &'static str,
    pub(crate) severity: Severity,
    pub(crate) config_params: &'a [serde_json::Value],
    pub(crate) storage: &'a mut RuleStorage,
    pub(crate) problems: &'a mut Vec<Problem>,
}

impl RuleContext<'_> {
    /// Defensive copy of the current linter configuration.
    pub fn linter_config(&self) -> LinterConfig {
        self.linter_config.clone()
    }

    /// The whole filter list being linted.
    pub fn filter_list_content(&self) -> &str {
        self.content
    }

    /// AST of the line currently being linted. `None` outside `on_rule`.
    pub fn actual_rule(&self) -> Option<&AnyRule> {
        self.ast
    }

    /// Raw text of the line currently being linted. `None` outside
    /// `on_rule`.
    pub fn actual_raw(&self) -> Option<&str> {
        self.line
    }

    /// 1-based number of the line currently being linted; 0 outside
    /// `on_rule`.
    pub fn actual_line(&self) -> usize {
        self.line_no
    }

    pub fn fixing_enabled(&self) -> bool {
        self.fixing
    }

    /// Rule-specific configuration parameters (after the severity).
    pub fn config(&self) -> &[serde_json::Value] {
        self.config_params
    }

    /// This rule's private storage.
    pub fn storage(&mut self) -> &mut RuleStorage {
        self.storage
    }

    /// Look up a registered sub-parser by AST-path selector.
    pub fn subparser(&self, path: &str) -> Option<&Arc<dyn SubParser>> {
        self.subparsers.get(path)
    }

    /// Report a problem. The kernel stamps the rule name and the
    /// effective severity.
    pub fn report(&mut self, report: ProblemReport) {
        self.problems.push(Problem {
            rule: Some(self.rule_name.to_string()),
            severity: self.severity,
            message: report.message,
            position: report.position,
            fix: report.fix,
        });
    }

    /// Record a sub-parser failure as a problem at this rule's severity.
    pub fn report_subparser_error(&mut self, error: &SubParserError) {
        let (start_line, start_column) = error.start;
        let (end_line, end_column) = error.end;
        self.problems.push(Problem {
            rule: Some(self.rule_name.to_string()),
            severity: self.severity,
            message: error.message.clone(),
            position: Position {
                start_line,
                start_column: Some(start_column),
                end_line,
                end_column: Some(end_column),
            },
            fix: None,
        });
    }
}
