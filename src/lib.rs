//! aglint: a linter for adblock filter lists.
//!
//! The crate parses every line of a filter list into a typed AST
//! ([`ast::AnyRule`]), distinguishes the adblock syntax dialects
//! ([`syntax::AdblockSyntax`]), reproduces rules as text
//! ([`parse::RuleParser::generate`]), and runs a registry of diagnostic
//! rules over the line stream ([`linter::Linter`]), collecting problems
//! with line/column positions and optionally rewriting lines that carry a
//! fix.
//!
//! ```
//! use aglint::linter::config::LinterConfig;
//! use aglint::linter::Linter;
//!
//! let mut linter = Linter::new(true, LinterConfig::default()).unwrap();
//! let result = linter.lint("example.com##.a, .b", false);
//! assert_eq!(result.warning_count, 1);
//! ```

pub mod ast;
pub mod diagnostic;
pub mod linter;
pub mod parse;
pub mod rules;
pub mod subparser;
pub mod syntax;

pub use ast::AnyRule;
pub use diagnostic::{Position, Problem, Severity};
pub use linter::config::LinterConfig;
pub use linter::{Linter, LinterResult};
pub use parse::RuleParser;
pub use syntax::AdblockSyntax;
