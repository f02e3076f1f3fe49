//! Cosmetic rules: element hiding, CSS injection, scriptlets, HTML
//! filtering and raw JS injection.

use std::fmt;

use crate::diagnostic::Position;
use crate::syntax::AdblockSyntax;

/// Cosmetic rule subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CosmeticRuleType {
    ElementHiding,
    Css,
    Scriptlet,
    Html,
    Js,
}

/// Cosmetic separator token. The token alone does not determine the rule
/// subtype; several separators are overloaded by body shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CosmeticSeparator {
    /// `##`
    ElementHiding,
    /// `#@#`
    ElementHidingException,
    /// `#?#`
    ExtendedElementHiding,
    /// `#@?#`
    ExtendedElementHidingException,
    /// `#$#` (AdGuard CSS injection or ABP snippet, by body shape)
    AdgCss,
    /// `#@$#`
    AdgCssException,
    /// `#$?#`
    AdgExtendedCss,
    /// `#@$?#`
    AdgExtendedCssException,
    /// `#%#`
    AdgJs,
    /// `#@%#`
    AdgJsException,
    /// `$$`
    AdgHtml,
    /// `$@$`
    AdgHtmlException,
}

impl CosmeticSeparator {
    /// All separators, longest token first so that greedy matching at a
    /// position is unambiguous.
    pub const ALL: [CosmeticSeparator; 12] = [
        CosmeticSeparator::AdgExtendedCssException,
        CosmeticSeparator::ExtendedElementHidingException,
        CosmeticSeparator::AdgCssException,
        CosmeticSeparator::AdgJsException,
        CosmeticSeparator::AdgExtendedCss,
        CosmeticSeparator::ElementHidingException,
        CosmeticSeparator::ExtendedElementHiding,
        CosmeticSeparator::AdgCss,
        CosmeticSeparator::AdgJs,
        CosmeticSeparator::AdgHtmlException,
        CosmeticSeparator::ElementHiding,
        CosmeticSeparator::AdgHtml,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CosmeticSeparator::ElementHiding => "##",
            CosmeticSeparator::ElementHidingException => "#@#",
            CosmeticSeparator::ExtendedElementHiding => "#?#",
            CosmeticSeparator::ExtendedElementHidingException => "#@?#",
            CosmeticSeparator::AdgCss => "#$#",
            CosmeticSeparator::AdgCssException => "#@$#",
            CosmeticSeparator::AdgExtendedCss => "#$?#",
            CosmeticSeparator::AdgExtendedCssException => "#@$?#",
            CosmeticSeparator::AdgJs => "#%#",
            CosmeticSeparator::AdgJsException => "#@%#",
            CosmeticSeparator::AdgHtml => "$$",
            CosmeticSeparator::AdgHtmlException => "$@$",
        }
    }

    pub fn is_exception(&self) -> bool {
        matches!(
            self,
            CosmeticSeparator::ElementHidingException
                | CosmeticSeparator::ExtendedElementHidingException
                | CosmeticSeparator::AdgCssException
                | CosmeticSeparator::AdgExtendedCssException
                | CosmeticSeparator::AdgJsException
                | CosmeticSeparator::AdgHtmlException
        )
    }
}

impl fmt::Display for CosmeticSeparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a cosmetic rule's domain list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainListEntry {
    pub domain: String,
    pub exception: bool,
}

impl DomainListEntry {
    fn generate(&self) -> String {
        if self.exception {
            format!("~{}", self.domain)
        } else {
            self.domain.clone()
        }
    }
}

/// AdGuard cosmetic rule modifier from a `[$name=value,…]` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CosmeticRuleModifier {
    pub name: String,
    pub value: Option<String>,
}

impl CosmeticRuleModifier {
    fn generate(&self) -> String {
        match &self.value {
            Some(value) => format!("{}={}", self.name, value),
            None => self.name.clone(),
        }
    }
}

/// Quoting tag of a scriptlet parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptletParamType {
    Unquoted,
    SingleQuoted,
    DoubleQuoted,
    Regex,
}

/// One scriptlet parameter. `value` is stored without its delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptletParam {
    pub param_type: ScriptletParamType,
    pub value: String,
}

impl ScriptletParam {
    pub fn unquoted(value: &str) -> Self {
        Self {
            param_type: ScriptletParamType::Unquoted,
            value: value.to_string(),
        }
    }

    pub fn generate(&self) -> String {
        match self.param_type {
            ScriptletParamType::Unquoted => self.value.clone(),
            ScriptletParamType::SingleQuoted => format!("'{}'", self.value),
            ScriptletParamType::DoubleQuoted => format!("\"{}\"", self.value),
            ScriptletParamType::Regex => format!("/{}/", self.value),
        }
    }
}

/// A single scriptlet invocation: name plus parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptletCall {
    pub name: ScriptletParam,
    pub params: Vec<ScriptletParam>,
}

/// Scriptlet body dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptletDialect {
    /// AdGuard `//scriptlet('name', …)`
    Adg,
    /// uBlock Origin `+js(name, …)`
    Ubo,
    /// Adblock Plus `name arg0; name2 arg0` snippets
    Abp,
}

/// Scriptlet rule body. ADG and uBO bodies carry exactly one call; ABP
/// snippet bodies may chain several.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptletBody {
    pub dialect: ScriptletDialect,
    pub calls: Vec<ScriptletCall>,
}

impl ScriptletBody {
    pub fn generate(&self) -> String {
        fn call_args(call: Option<&ScriptletCall>) -> String {
            let Some(call) = call else {
                return String::new();
            };
            let mut args = vec![call.name.generate()];
            args.extend(call.params.iter().map(ScriptletParam::generate));
            args.join(", ")
        }

        match self.dialect {
            ScriptletDialect::Adg => {
                format!("//scriptlet({})", call_args(self.calls.first()))
            }
            ScriptletDialect::Ubo => {
                format!("+js({})", call_args(self.calls.first()))
            }
            ScriptletDialect::Abp => {
                let calls: Vec<String> = self
                    .calls
                    .iter()
                    .map(|call| {
                        let mut tokens = vec![call.name.generate()];
                        tokens.extend(call.params.iter().map(ScriptletParam::generate));
                        tokens.join(" ")
                    })
                    .collect();
                calls.join("; ")
            }
        }
    }
}

/// Element hiding body. The selector list is kept raw; CSS sub-grammars
/// are a sub-parser's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementHidingBody {
    pub selector_list: String,
}

/// CSS injection body, kept raw (`selector { decls }` for AdGuard,
/// `selector:style(…)` for uBlock Origin).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssInjectionBody {
    pub raw: String,
}

/// HTML filtering body (`div[tag-content="…"]`, `^script:has-text(…)`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlBody {
    pub body: String,
}

/// Raw JS injection body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsBody {
    pub code: String,
}

/// Cosmetic rule body, indexed by [`CosmeticRuleType`].
#[derive(Debug, Clone, PartialEq)]
pub enum CosmeticRuleBody {
    ElementHiding(ElementHidingBody),
    Css(CssInjectionBody),
    Scriptlet(ScriptletBody),
    Html(HtmlBody),
    Js(JsBody),
}

impl CosmeticRuleBody {
    pub fn generate(&self) -> String {
        match self {
            CosmeticRuleBody::ElementHiding(b) => b.selector_list.clone(),
            CosmeticRuleBody::Css(b) => b.raw.clone(),
            CosmeticRuleBody::Scriptlet(b) => b.generate(),
            CosmeticRuleBody::Html(b) => b.body.clone(),
            CosmeticRuleBody::Js(b) => b.code.clone(),
        }
    }
}

/// A cosmetic rule: optional AdGuard modifier block, domain list,
/// separator and body.
#[derive(Debug, Clone, PartialEq)]
pub struct CosmeticRule {
    pub syntax: AdblockSyntax,
    pub position: Position,
    pub rule_type: CosmeticRuleType,
    pub exception: bool,
    pub separator: CosmeticSeparator,
    pub modifiers: Vec<CosmeticRuleModifier>,
    pub domains: Vec<DomainListEntry>,
    pub body: CosmeticRuleBody,
}

impl CosmeticRule {
    pub fn generate(&self) -> String {
        let mut out = String::new();
        if !self.modifiers.is_empty() {
            let modifiers: Vec<String> =
                self.modifiers.iter().map(CosmeticRuleModifier::generate).collect();
            out.push_str("[$");
            out.push_str(&modifiers.join(","));
            out.push(']');
        }
        let domains: Vec<String> = self.domains.iter().map(DomainListEntry::generate).collect();
        out.push_str(&domains.join(","));
        out.push_str(self.separator.as_str());
        out.push_str(&self.body.generate());
        out
    }
}
