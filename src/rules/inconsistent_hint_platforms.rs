//! A platform must not be both targeted and excluded by one hint comment.

use crate::ast::{AnyRule, CommentRule};
use crate::diagnostic::Severity;
use crate::linter::rule::{LinterRule, ProblemReport, RuleContext};

const PLATFORM_HINT: &str = "PLATFORM";
const NOT_PLATFORM_HINT: &str = "NOT_PLATFORM";

/// Flags platforms listed in both `PLATFORM()` and `NOT_PLATFORM()` of the
/// same hint comment.
pub struct InconsistentHintPlatforms;

impl LinterRule for InconsistentHintPlatforms {
    fn name(&self) -> &'static str {
        "inconsistent-hint-platforms"
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn on_rule(&self, ctx: &mut RuleContext<'_>) {
        let Some(AnyRule::Comment(CommentRule::Hint(hint))) = ctx.actual_rule() else {
            return;
        };

        let mut targeted: Vec<&str> = Vec::new();
        let mut excluded: Vec<&str> = Vec::new();
        for entry in &hint.hints {
            let Some(params) = &entry.params else {
                continue;
            };
            let bucket = match entry.name.as_str() {
                PLATFORM_HINT => &mut targeted,
                NOT_PLATFORM_HINT => &mut excluded,
                _ => continue,
            };
            bucket.extend(params.iter().map(String::as_str).filter(|p| !p.is_empty()));
        }

        let conflicting: Vec<String> = targeted
            .iter()
            .filter(|platform| excluded.contains(platform))
            .map(|platform| platform.to_string())
            .collect();
        let position = hint.position;

        let mut seen: Vec<&str> = Vec::new();
        for platform in &conflicting {
            if seen.contains(&platform.as_str()) {
                continue;
            }
            seen.push(platform);
            ctx.report(ProblemReport {
                message: format!(
                    "Platform \"{platform}\" is targeted by a PLATFORM() hint and excluded by a NOT_PLATFORM() hint at the same time"
                ),
                position,
                fix: None,
            });
        }
    }
}
