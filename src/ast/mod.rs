//! Typed syntax tree for adblock filter rules.
//!
//! Every parsed line becomes exactly one [`AnyRule`] variant. Nodes store
//! their substrings by value so the tree is independent of the source
//! buffer, and each rule carries the [`Position`] of its trimmed content
//! within the original line. `generate` reproduces the filter text and is
//! the inverse of the parser modulo the documented whitespace
//! normalizations.

pub mod comment;
pub mod cosmetic;
pub mod network;

pub use comment::{
    Agent, AgentCommentRule, CommentMarker, CommentRule, ConfigCommentParams, ConfigCommentRule,
    Hint, HintCommentRule, MetadataCommentRule, PreProcessorCommentRule, SimpleCommentRule,
};
pub use cosmetic::{
    CosmeticRule, CosmeticRuleBody, CosmeticRuleModifier, CosmeticRuleType, CosmeticSeparator,
    CssInjectionBody, DomainListEntry, ElementHidingBody, HtmlBody, JsBody, ScriptletBody,
    ScriptletCall, ScriptletDialect, ScriptletParam, ScriptletParamType,
};
pub use network::{BasicNetworkRule, NetworkRule, NetworkRuleModifier, RemoveHeaderNetworkRule};

use crate::diagnostic::Position;
use crate::syntax::AdblockSyntax;

/// Top-level rule category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleCategory {
    Empty,
    Comment,
    Cosmetic,
    Network,
}

/// A whitespace-only line.
#[derive(Debug, Clone, PartialEq)]
pub struct EmptyRule {
    pub syntax: AdblockSyntax,
    pub position: Position,
}

/// Any parsed filter list rule.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyRule {
    Empty(EmptyRule),
    Comment(CommentRule),
    Cosmetic(CosmeticRule),
    Network(NetworkRule),
}

impl AnyRule {
    pub fn category(&self) -> RuleCategory {
        match self {
            AnyRule::Empty(_) => RuleCategory::Empty,
            AnyRule::Comment(_) => RuleCategory::Comment,
            AnyRule::Cosmetic(_) => RuleCategory::Cosmetic,
            AnyRule::Network(_) => RuleCategory::Network,
        }
    }

    pub fn syntax(&self) -> AdblockSyntax {
        match self {
            AnyRule::Empty(r) => r.syntax,
            AnyRule::Comment(r) => r.syntax(),
            AnyRule::Cosmetic(r) => r.syntax,
            AnyRule::Network(r) => r.syntax(),
        }
    }

    pub fn position(&self) -> Position {
        match self {
            AnyRule::Empty(r) => r.position,
            AnyRule::Comment(r) => r.position(),
            AnyRule::Cosmetic(r) => r.position,
            AnyRule::Network(r) => r.position(),
        }
    }

    /// Reproduce the rule as filter text.
    pub fn generate(&self) -> String {
        match self {
            AnyRule::Empty(_) => String::new(),
            AnyRule::Comment(r) => r.generate(),
            AnyRule::Cosmetic(r) => r.generate(),
            AnyRule::Network(r) => r.generate(),
        }
    }
}
