//! Preprocessor directive names must be known.

use crate::ast::{AnyRule, CommentRule};
use crate::diagnostic::Severity;
use crate::linter::rule::{LinterRule, ProblemReport, RuleContext};

/// Directives the composition preprocessors understand.
const KNOWN_DIRECTIVES: [&str; 5] = ["if", "else", "endif", "include", "safari_cb_affinity"];

/// Flags `!#…` directives with unknown names.
pub struct UnknownPreProcessorDirectives;

impl LinterRule for UnknownPreProcessorDirectives {
    fn name(&self) -> &'static str {
        "unknown-preprocessor-directives"
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn on_rule(&self, ctx: &mut RuleContext<'_>) {
        let Some(AnyRule::Comment(CommentRule::PreProcessor(directive))) = ctx.actual_rule()
        else {
            return;
        };

        // `safari_cb_affinity(general)` keeps the parenthesized part in
        // the name when no whitespace separates it.
        let name = directive
            .name
            .split('(')
            .next()
            .unwrap_or(directive.name.as_str());
        if KNOWN_DIRECTIVES.contains(&name) {
            return;
        }
        let name = name.to_string();
        let position = directive.position;

        ctx.report(ProblemReport {
            message: format!("Unknown preprocessor directive \"{name}\""),
            position,
            fix: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linter::config::LinterConfig;
    use crate::linter::Linter;
    use std::sync::Arc;

    fn linter() -> Linter {
        let mut linter = Linter::new(false, LinterConfig::default()).unwrap();
        linter
            .add_rule(Arc::new(UnknownPreProcessorDirectives))
            .unwrap();
        linter
    }

    #[test]
    fn known_directives_pass() {
        let content = "!#if (adguard)\n!#include https://example.com/list.txt\n!#endif";
        let result = linter().lint(content, false);
        assert!(result.problems.is_empty());
    }

    #[test]
    fn parenthesized_affinity_passes() {
        let result = linter().lint("!#safari_cb_affinity(general,privacy)", false);
        assert!(result.problems.is_empty());
    }

    #[test]
    fn unknown_directive_flagged() {
        let result = linter().lint("!#incl https://example.com/list.txt", false);
        assert_eq!(result.problems.len(), 1);
        assert!(result.problems[0].message.contains("\"incl\""));
        assert_eq!(result.problems[0].severity, Severity::Error);
    }

    #[test]
    fn plain_comments_ignored() {
        let result = linter().lint("! plain comment", false);
        assert!(result.problems.is_empty());
    }
}
