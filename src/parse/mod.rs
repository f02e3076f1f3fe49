//! Line classification and parsing.
//!
//! [`RuleParser::parse`] turns one line of filter text into an [`AnyRule`];
//! [`RuleParser::generate`] inverts it. Classification order: empty line,
//! agent tag, comment family, cosmetic family, network rule.

pub mod comment;
pub mod cosmetic;
pub mod network;
pub mod scan;
pub mod scriptlet;
pub mod source;

use thiserror::Error;

use crate::ast::{AnyRule, CommentRule, EmptyRule};
use crate::diagnostic::Position;
use crate::syntax::AdblockSyntax;

/// A malformed line. Surfaced by the linter as a fatal problem for the
/// line; parsing of the rest of the list continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The rule dispatcher.
pub struct RuleParser;

impl RuleParser {
    /// Parse a single line, reporting positions on line 1.
    pub fn parse(line: &str) -> Result<AnyRule, ParseError> {
        Self::parse_line(line, 1)
    }

    /// Parse a single line with an explicit 1-based line number for
    /// position bookkeeping.
    pub fn parse_line(line: &str, line_no: usize) -> Result<AnyRule, ParseError> {
        let (trimmed, start) = scan::trim_with_offset(line);
        if trimmed.is_empty() {
            return Ok(AnyRule::Empty(EmptyRule {
                syntax: AdblockSyntax::Common,
                position: Position::full_line(line_no, line.len()),
            }));
        }
        let position = Position::line_span(line_no, start, start + trimmed.len());

        if let Some(agent) = comment::parse_agent(trimmed, position) {
            return Ok(AnyRule::Comment(CommentRule::Agent(agent)));
        }

        if let Some(rule) = comment::parse_comment(trimmed, position)? {
            return Ok(AnyRule::Comment(rule));
        }

        if let Some(rule) = cosmetic::parse_cosmetic(trimmed, position)? {
            return Ok(rule);
        }

        network::parse_network(trimmed, position).map(AnyRule::Network)
    }

    /// Reproduce a rule as filter text. Inverse of [`RuleParser::parse`]
    /// modulo the documented whitespace normalizations.
    pub fn generate(rule: &AnyRule) -> String {
        rule.generate()
    }
}
