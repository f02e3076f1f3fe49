//! Network rules: basic pattern-plus-modifiers rules and the two
//! header-removal dialects.

use crate::diagnostic::Position;
use crate::syntax::AdblockSyntax;

/// One `[~]name[=value]` entry of a network rule modifier list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkRuleModifier {
    pub exception: bool,
    pub name: String,
    pub value: Option<String>,
}

impl NetworkRuleModifier {
    fn generate(&self) -> String {
        let mut out = String::new();
        if self.exception {
            out.push('~');
        }
        out.push_str(&self.name);
        if let Some(value) = &self.value {
            out.push('=');
            out.push_str(value);
        }
        out
    }
}

/// Basic network rule: `[@@]pattern[$modifiers]`.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicNetworkRule {
    pub syntax: AdblockSyntax,
    pub position: Position,
    pub exception: bool,
    pub pattern: String,
    pub modifiers: Vec<NetworkRuleModifier>,
}

impl BasicNetworkRule {
    pub fn generate(&self) -> String {
        let mut out = String::new();
        if self.exception {
            out.push_str("@@");
        }
        out.push_str(&self.pattern);
        if !self.modifiers.is_empty() {
            let modifiers: Vec<String> =
                self.modifiers.iter().map(NetworkRuleModifier::generate).collect();
            out.push('$');
            out.push_str(&modifiers.join(","));
        }
        out
    }
}

/// Header-removal rule. AdGuard spells it `pattern$removeheader=name`,
/// uBlock Origin `pattern##^responseheader(name)`.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoveHeaderNetworkRule {
    pub syntax: AdblockSyntax,
    pub position: Position,
    pub exception: bool,
    pub pattern: String,
    pub header: String,
}

impl RemoveHeaderNetworkRule {
    pub fn generate(&self) -> String {
        match self.syntax {
            AdblockSyntax::Ubo => {
                let separator = if self.exception { "#@#^" } else { "##^" };
                format!("{}{}responseheader({})", self.pattern, separator, self.header)
            }
            _ => {
                let prefix = if self.exception { "@@" } else { "" };
                format!("{}{}$removeheader={}", prefix, self.pattern, self.header)
            }
        }
    }
}

/// Network-category rule.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkRule {
    Basic(BasicNetworkRule),
    RemoveHeader(RemoveHeaderNetworkRule),
}

impl NetworkRule {
    pub fn syntax(&self) -> AdblockSyntax {
        match self {
            NetworkRule::Basic(r) => r.syntax,
            NetworkRule::RemoveHeader(r) => r.syntax,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            NetworkRule::Basic(r) => r.position,
            NetworkRule::RemoveHeader(r) => r.position,
        }
    }

    pub fn exception(&self) -> bool {
        match self {
            NetworkRule::Basic(r) => r.exception,
            NetworkRule::RemoveHeader(r) => r.exception,
        }
    }

    pub fn generate(&self) -> String {
        match self {
            NetworkRule::Basic(r) => r.generate(),
            NetworkRule::RemoveHeader(r) => r.generate(),
        }
    }
}
