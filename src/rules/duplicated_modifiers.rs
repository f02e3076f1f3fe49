//! Network rule modifier lists should not repeat a modifier.

use crate::ast::{AnyRule, NetworkRule};
use crate::diagnostic::Severity;
use crate::linter::rule::{LinterRule, ProblemReport, RuleContext};

/// Flags modifiers that occur more than once in one network rule. The
/// parser keeps duplicates; deduplication is this rule's job.
pub struct DuplicatedModifiers;

impl LinterRule for DuplicatedModifiers {
    fn name(&self) -> &'static str {
        "duplicated-modifiers"
    }

    fn severity(&self) -> Severity {
        Severity::Warn
    }

    fn on_rule(&self, ctx: &mut RuleContext<'_>) {
        let Some(AnyRule::Network(NetworkRule::Basic(rule))) = ctx.actual_rule() else {
            return;
        };

        let names: Vec<&str> = rule.modifiers.iter().map(|m| m.name.as_str()).collect();
        let mut duplicated: Vec<String> = Vec::new();
        for (idx, name) in names.iter().enumerate() {
            if names[..idx].contains(name) && !duplicated.iter().any(|d| d == name) {
                duplicated.push(name.to_string());
            }
        }
        let position = rule.position;

        for name in duplicated {
            ctx.report(ProblemReport {
                message: format!("The modifier \"{name}\" is used multiple times"),
                position,
                fix: None,
            });
        }
    }
}
