//! Element hiding rules should contain only one selector.

use crate::ast::{AnyRule, CosmeticRuleBody, CosmeticRuleType, ElementHidingBody};
use crate::diagnostic::Severity;
use crate::linter::rule::{LinterRule, ProblemReport, RuleContext};
use crate::parse::scan::split_selector_list;

/// Flags element hiding rules with multiple selectors and offers a fix
/// that splits the rule into one rule per selector.
pub struct SingleSelector;

impl LinterRule for SingleSelector {
    fn name(&self) -> &'static str {
        "single-selector"
    }

    fn severity(&self) -> Severity {
        Severity::Warn
    }

    fn on_rule(&self, ctx: &mut RuleContext<'_>) {
        let Some(AnyRule::Cosmetic(cosmetic)) = ctx.actual_rule() else {
            return;
        };
        if cosmetic.rule_type != CosmeticRuleType::ElementHiding {
            return;
        }
        let CosmeticRuleBody::ElementHiding(body) = &cosmetic.body else {
            return;
        };
        let selectors: Vec<String> = split_selector_list(&body.selector_list)
            .into_iter()
            .map(|s| s.trim().to_string())
            .collect();
        if selectors.len() < 2 {
            return;
        }

        // The fix is a deep copy per selector; the handed AST stays
        // untouched.
        let fix: Vec<AnyRule> = selectors
            .iter()
            .map(|selector| {
                let mut split = cosmetic.clone();
                split.body = CosmeticRuleBody::ElementHiding(ElementHidingBody {
                    selector_list: selector.clone(),
                });
                AnyRule::Cosmetic(split)
            })
            .collect();
        let position = cosmetic.position;

        ctx.report(ProblemReport {
            message: "An element hiding rule should contain only one selector".to_string(),
            position,
            fix: Some(fix),
        });
    }
}
