//! The linter kernel: rule registry ownership, the lint loop, the inline
//! configuration state machine, problem collation and fix merging.

pub mod config;
pub mod registry;
pub mod rule;

use std::sync::Arc;

use thiserror::Error;

use crate::ast::{AnyRule, CommentRule, ConfigCommentParams, ConfigCommentRule};
use crate::diagnostic::{Position, Problem, Severity};
use crate::parse::source::{split_lines, InputLine};
use crate::parse::RuleParser;
use crate::subparser::SubParserRegistry;

use self::config::{ConfigError, LinterConfig, RuleConfigValue};
use self::registry::{RegistryError, RuleRegistry};
use self::rule::{LinterRule, RuleContext};

/// Error returned by linter API calls. Parse failures never surface here;
/// they become fatal problems in the lint result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinterError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Result of one lint invocation.
#[derive(Debug)]
pub struct LinterResult {
    pub problems: Vec<Problem>,
    pub warning_count: usize,
    pub error_count: usize,
    pub fatal_error_count: usize,
    /// Rewritten filter list, present when fixing was requested.
    pub fixed: Option<String>,
}

/// State machine of the inline configuration comments. Global flags
/// persist for the rest of the list; next-line flags are cleared after the
/// next non-config line.
#[derive(Debug, Default)]
struct InlineConfigState {
    is_disabled: bool,
    disabled_for_next_line: bool,
    enabled_for_next_line: bool,
    next_line_disabled: Vec<String>,
    next_line_enabled: Vec<String>,
}

impl InlineConfigState {
    fn line_skipped(&self) -> bool {
        (self.is_disabled || self.disabled_for_next_line) && !self.enabled_for_next_line
    }

    fn clear_next_line(&mut self) {
        self.disabled_for_next_line = false;
        self.enabled_for_next_line = false;
        self.next_line_disabled.clear();
        self.next_line_enabled.clear();
    }
}

/// The linter. Owns the rule registry, the current configuration and the
/// sub-parser registry. Not safe for concurrent `lint` calls; distinct
/// instances are independent.
pub struct Linter {
    config: LinterConfig,
    registry: RuleRegistry,
    subparsers: SubParserRegistry,
}

impl Linter {
    /// Create a linter, optionally loading the built-in rules, and apply
    /// the given configuration with `reset = true`.
    pub fn new(default_rules: bool, config: LinterConfig) -> Result<Self, LinterError> {
        let mut linter = Self {
            config: LinterConfig::default(),
            registry: RuleRegistry::new(),
            subparsers: SubParserRegistry::new(),
        };
        if default_rules {
            for rule in crate::rules::default_rules() {
                linter.registry.add(rule)?;
            }
        }
        linter.set_config(config, true)?;
        Ok(linter)
    }

    /// Replace the configuration. With `reset`, all per-rule overrides and
    /// storage are cleared first; the new configuration merges with the
    /// defaults and its `rules` section is applied.
    pub fn set_config(&mut self, config: LinterConfig, reset: bool) -> Result<(), LinterError> {
        if reset {
            self.registry.reset_overrides();
        }
        self.config = config;
        let rules = self.config.rules.clone();
        for (name, value) in &rules {
            self.apply_rule_config(name, value)?;
        }
        Ok(())
    }

    pub fn get_config(&self) -> &LinterConfig {
        &self.config
    }

    /// The sub-parser registry, for registering external sub-grammars.
    pub fn subparsers_mut(&mut self) -> &mut SubParserRegistry {
        &mut self.subparsers
    }

    // --- registry operations ---

    pub fn add_rule(&mut self, rule: Arc<dyn LinterRule>) -> Result<(), RegistryError> {
        self.registry.add(rule)
    }

    /// Add a rule together with its configuration.
    pub fn add_rule_with_config(
        &mut self,
        rule: Arc<dyn LinterRule>,
        value: RuleConfigValue,
    ) -> Result<(), LinterError> {
        let name = rule.name();
        self.registry.add(rule)?;
        self.set_rule_config(name, value)
    }

    pub fn remove_rule(&mut self, name: &str) -> Result<(), RegistryError> {
        self.registry.remove(name)
    }

    /// Validate and apply a rule's configuration value.
    pub fn set_rule_config(
        &mut self,
        name: &str,
        value: RuleConfigValue,
    ) -> Result<(), LinterError> {
        self.apply_rule_config(name, &value)?;
        self.config.rules.insert(name.to_string(), value);
        Ok(())
    }

    fn apply_rule_config(&mut self, name: &str, value: &RuleConfigValue) -> Result<(), LinterError> {
        let severity = value.severity()?;
        let entry = self
            .registry
            .get_mut(name)
            .ok_or_else(|| ConfigError::UnknownRule(name.to_string()))?;
        entry.rule.validate_config(value.params())?;
        entry.severity_override = Some(severity);
        entry.config_override =
            (!value.params().is_empty()).then(|| value.params().to_vec());
        Ok(())
    }

    /// Drop a rule's overrides so it reports at its declared severity
    /// with its default configuration again.
    pub fn reset_rule_config(&mut self, name: &str) -> Result<(), RegistryError> {
        let entry = self
            .registry
            .get_mut(name)
            .ok_or_else(|| RegistryError::UnknownRule(name.to_string()))?;
        entry.severity_override = None;
        entry.config_override = None;
        self.config.rules.remove(name);
        Ok(())
    }

    /// The rule's current configuration: effective severity plus any
    /// configured parameters.
    pub fn get_rule_config(&self, name: &str) -> Result<RuleConfigValue, RegistryError> {
        let entry = self
            .registry
            .get(name)
            .ok_or_else(|| RegistryError::UnknownRule(name.to_string()))?;
        let severity = entry.effective_severity();
        match &entry.config_override {
            Some(params) => {
                let mut values = vec![serde_json::json!(severity.name())];
                values.extend(params.iter().cloned());
                Ok(RuleConfigValue::Tuple(values))
            }
            None => Ok(RuleConfigValue::Severity(severity)),
        }
    }

    pub fn disable_rule(&mut self, name: &str) -> Result<(), RegistryError> {
        let entry = self
            .registry
            .get_mut(name)
            .ok_or_else(|| RegistryError::UnknownRule(name.to_string()))?;
        entry.severity_override = Some(Severity::Off);
        Ok(())
    }

    /// Clear a rule's severity override so its disabled state follows the
    /// rule's declared severity again.
    pub fn enable_rule(&mut self, name: &str) -> Result<(), RegistryError> {
        let entry = self
            .registry
            .get_mut(name)
            .ok_or_else(|| RegistryError::UnknownRule(name.to_string()))?;
        entry.severity_override = None;
        Ok(())
    }

    pub fn is_rule_disabled(&self, name: &str) -> bool {
        self.registry
            .get(name)
            .is_some_and(|entry| entry.effective_severity() == Severity::Off)
    }

    pub fn has_rule(&self, name: &str) -> bool {
        self.registry.has(name)
    }

    pub fn get_rule(&self, name: &str) -> Option<Arc<dyn LinterRule>> {
        self.registry.get(name).map(|entry| Arc::clone(entry.rule()))
    }

    pub fn get_rules(&self) -> Vec<&'static str> {
        self.registry.names()
    }

    // --- linting ---

    /// Lint filter list content. Rules see lines in input order between
    /// the start and end events; problems are collated in report order.
    /// With `fix`, lines carrying exactly one fix are rewritten.
    pub fn lint(&mut self, content: &str, fix: bool) -> LinterResult {
        let lines = split_lines(content);
        let mut problems: Vec<Problem> = Vec::new();
        let mut state = InlineConfigState::default();

        self.emit_list_event(content, fix, false, &mut problems);

        for (idx, input) in lines.iter().enumerate() {
            let line_no = idx + 1;
            let ast = match RuleParser::parse_line(input.text, line_no) {
                Ok(ast) => ast,
                Err(error) => {
                    if !state.line_skipped() {
                        problems.push(Problem {
                            rule: None,
                            severity: Severity::Fatal,
                            message: format!("AGLint parsing error: {}", error.message),
                            position: Position::full_line(line_no, input.text.len()),
                            fix: None,
                        });
                    }
                    state.clear_next_line();
                    continue;
                }
            };

            if self.config.allow_inline_config {
                if let AnyRule::Comment(CommentRule::Config(config_comment)) = &ast {
                    if let Err(error) = self.apply_inline_config(config_comment, &mut state) {
                        problems.push(Problem {
                            rule: None,
                            severity: Severity::Fatal,
                            message: error.to_string(),
                            position: config_comment.position,
                            fix: None,
                        });
                    }
                    continue;
                }
            }

            if !state.line_skipped() {
                self.run_rules_on_line(&ast, input.text, line_no, content, fix, &state, &mut problems);
            }
            state.clear_next_line();
        }

        self.emit_list_event(content, fix, true, &mut problems);

        let mut warning_count = 0;
        let mut error_count = 0;
        let mut fatal_error_count = 0;
        for problem in &problems {
            match problem.severity {
                Severity::Warn => warning_count += 1,
                Severity::Error => error_count += 1,
                Severity::Fatal => fatal_error_count += 1,
                Severity::Off => {}
            }
        }

        let fixed = fix.then(|| build_fixed_output(&lines, &problems));

        LinterResult {
            problems,
            warning_count,
            error_count,
            fatal_error_count,
            fixed,
        }
    }

    /// Emit `on_start_filter_list` or `on_end_filter_list` for every
    /// enabled rule. The AST and raw-line getters are unset here.
    fn emit_list_event(
        &mut self,
        content: &str,
        fix: bool,
        end: bool,
        problems: &mut Vec<Problem>,
    ) {
        let config = &self.config;
        let subparsers = &self.subparsers;
        for entry in self.registry.entries_mut() {
            let effective = entry.effective_severity();
            if effective == Severity::Off {
                continue;
            }
            let params = entry.config_override.as_deref().unwrap_or(&[]);
            if entry.rule.validate_config(params).is_err() {
                continue;
            }
            let rule = Arc::clone(&entry.rule);
            let mut ctx = RuleContext {
                linter_config: config,
                subparsers,
                content,
                fixing: fix,
                line: None,
                ast: None,
                line_no: 0,
                rule_name: rule.name(),
                severity: effective,
                config_params: params,
                storage: &mut entry.storage,
                problems: &mut *problems,
            };
            if end {
                rule.on_end_filter_list(&mut ctx);
            } else {
                rule.on_start_filter_list(&mut ctx);
            }
        }
    }

    /// Run every applicable rule on one parsed line.
    #[allow(clippy::too_many_arguments)]
    fn run_rules_on_line(
        &mut self,
        ast: &AnyRule,
        raw: &str,
        line_no: usize,
        content: &str,
        fix: bool,
        state: &InlineConfigState,
        problems: &mut Vec<Problem>,
    ) {
        let config = &self.config;
        let subparsers = &self.subparsers;
        for entry in self.registry.entries_mut() {
            let name = entry.rule.name();
            let enabled_next = state.next_line_enabled.iter().any(|n| n == name);
            // When a rule is named in both next-line sets, enable wins.
            if state.next_line_disabled.iter().any(|n| n == name) && !enabled_next {
                continue;
            }
            let effective = entry.effective_severity();
            if effective == Severity::Off && !enabled_next {
                continue;
            }
            let params = entry.config_override.as_deref().unwrap_or(&[]);
            if entry.rule.validate_config(params).is_err() {
                continue;
            }
            // A next-line enable reports at the rule's declared severity,
            // not at the (possibly off) configured one.
            let stamped = if enabled_next {
                entry.rule.severity()
            } else {
                effective
            };
            let rule = Arc::clone(&entry.rule);
            let mut ctx = RuleContext {
                linter_config: config,
                subparsers,
                content,
                fixing: fix,
                line: Some(raw),
                ast: Some(ast),
                line_no,
                rule_name: name,
                severity: stamped,
                config_params: params,
                storage: &mut entry.storage,
                problems: &mut *problems,
            };
            rule.on_rule(&mut ctx);
        }
    }

    /// Apply one inline configuration comment to the linter state.
    fn apply_inline_config(
        &mut self,
        comment: &ConfigCommentRule,
        state: &mut InlineConfigState,
    ) -> Result<(), LinterError> {
        match comment.command.as_str() {
            crate::parse::comment::CONFIG_COMMAND_MAIN => {
                let Some(ConfigCommentParams::Object(value)) = &comment.params else {
                    return Err(ConfigError::InvalidRulesObject.into());
                };
                let Some(map) = value.as_object() else {
                    return Err(ConfigError::InvalidRulesObject.into());
                };
                for (name, raw) in map {
                    let value: RuleConfigValue =
                        serde_json::from_value(raw.clone()).map_err(|_| {
                            ConfigError::InvalidRuleConfig {
                                rule: name.clone(),
                                message: "expected a severity or a [severity, …] array"
                                    .to_string(),
                            }
                        })?;
                    self.set_rule_config(name, value)?;
                }
                Ok(())
            }
            crate::parse::comment::CONFIG_COMMAND_DISABLE => {
                match config_comment_names(comment) {
                    [] => state.is_disabled = true,
                    names => {
                        for name in names {
                            self.disable_rule(name)?;
                        }
                    }
                }
                Ok(())
            }
            crate::parse::comment::CONFIG_COMMAND_ENABLE => {
                match config_comment_names(comment) {
                    [] => state.is_disabled = false,
                    names => {
                        for name in names {
                            self.enable_rule(name)?;
                        }
                    }
                }
                Ok(())
            }
            crate::parse::comment::CONFIG_COMMAND_DISABLE_NEXT_LINE => {
                match config_comment_names(comment) {
                    [] => state.disabled_for_next_line = true,
                    names => state
                        .next_line_disabled
                        .extend(names.iter().cloned()),
                }
                Ok(())
            }
            crate::parse::comment::CONFIG_COMMAND_ENABLE_NEXT_LINE => {
                match config_comment_names(comment) {
                    [] => state.enabled_for_next_line = true,
                    names => state.next_line_enabled.extend(names.iter().cloned()),
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl Default for Linter {
    fn default() -> Self {
        match Self::new(true, LinterConfig::default()) {
            Ok(linter) => linter,
            Err(_) => unreachable!("the default configuration is valid"),
        }
    }
}

fn config_comment_names(comment: &ConfigCommentRule) -> &[String] {
    match &comment.params {
        Some(ConfigCommentParams::Rules(names)) => names,
        _ => &[],
    }
}

/// Rebuild the filter list, replacing each line that carries exactly one
/// fix. A fix may expand one line into several, reusing the original
/// terminator; lines with conflicting fixes are kept unchanged.
fn build_fixed_output(lines: &[InputLine<'_>], problems: &[Problem]) -> String {
    let mut out = String::new();
    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let mut fixes = problems.iter().filter_map(|p| {
            (p.position.start_line == line_no && p.position.end_line == line_no)
                .then_some(p.fix.as_ref())
                .flatten()
        });
        match (fixes.next(), fixes.next()) {
            (Some(fix), None) => {
                let joiner = if line.terminator.is_empty() {
                    "\n"
                } else {
                    line.terminator
                };
                let generated: Vec<String> = fix.iter().map(AnyRule::generate).collect();
                out.push_str(&generated.join(joiner));
                out.push_str(line.terminator);
            }
            _ => {
                out.push_str(line.text);
                out.push_str(line.terminator);
            }
        }
    }
    out
}
