//! Every `!#if` needs a matching `!#endif`.

use crate::ast::{AnyRule, CommentRule};
use crate::diagnostic::{Position, Severity};
use crate::linter::rule::{LinterRule, ProblemReport, RuleContext};

/// Open `!#if` directives seen so far in the current filter list.
#[derive(Debug, Default)]
struct OpenIfs {
    positions: Vec<Position>,
}

/// Flags unclosed `!#if` directives and `!#endif` directives without an
/// opening `!#if`. Keeps the open-directive stack in per-rule storage and
/// reports leftovers from the end-of-list event.
pub struct IfClosed;

impl LinterRule for IfClosed {
    fn name(&self) -> &'static str {
        "if-closed"
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn on_start_filter_list(&self, ctx: &mut RuleContext<'_>) {
        // A fresh stack per invocation; storage persists across lints on
        // the same instance otherwise.
        ctx.storage().get_or_insert_with(OpenIfs::default).positions.clear();
    }

    fn on_rule(&self, ctx: &mut RuleContext<'_>) {
        let Some(AnyRule::Comment(CommentRule::PreProcessor(directive))) = ctx.actual_rule()
        else {
            return;
        };
        let is_if = directive.name == "if";
        let is_endif = directive.name == "endif";
        let position = directive.position;

        if is_if {
            ctx.storage()
                .get_or_insert_with(OpenIfs::default)
                .positions
                .push(position);
        } else if is_endif {
            let opened = ctx
                .storage()
                .get_or_insert_with(OpenIfs::default)
                .positions
                .pop();
            if opened.is_none() {
                ctx.report(ProblemReport {
                    message: "Using an \"endif\" directive without an opening \"if\" directive"
                        .to_string(),
                    position,
                    fix: None,
                });
            }
        }
    }

    fn on_end_filter_list(&self, ctx: &mut RuleContext<'_>) {
        let unclosed = std::mem::take(
            &mut ctx.storage().get_or_insert_with(OpenIfs::default).positions,
        );
        for position in unclosed {
            ctx.report(ProblemReport {
                message: "Unclosed \"if\" directive".to_string(),
                position,
                fix: None,
            });
        }
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
        linter.add_rule(Arc::new(IfClosed)).unwrap();
        linter
    }

    #[test]
    fn balanced_directives_pass() {
        let content = "!#if (adguard)\n||example.com^\n!#endif";
        let result = linter().lint(content, false);
        assert!(result.problems.is_empty());
    }

    #[test]
    fn nested_directives_pass() {
        let content = "!#if (a)\n!#if (b)\n!#endif\n!#endif";
        let result = linter().lint(content, false);
        assert!(result.problems.is_empty());
    }

    #[test]
    fn unclosed_if_reported_at_its_line() {
        let content = "!#if (adguard)\n||example.com^";
        let result = linter().lint(content, false);
        assert_eq!(result.problems.len(), 1);
        assert_eq!(result.problems[0].message, "Unclosed \"if\" directive");
        assert_eq!(result.problems[0].position.start_line, 1);
    }

    #[test]
    fn stray_endif_reported() {
        let content = "||example.com^\n!#endif";
        let result = linter().lint(content, false);
        assert_eq!(result.problems.len(), 1);
        assert_eq!(result.problems[0].position.start_line, 2);
    }

    #[test]
    fn state_resets_between_invocations() {
        let mut linter = linter();
        assert_eq!(linter.lint("!#if (a)", false).problems.len(), 1);
        // The previous unclosed `if` must not leak into the next run.
        assert!(linter.lint("!#if (a)\n!#endif", false).problems.is_empty());
    }
}
