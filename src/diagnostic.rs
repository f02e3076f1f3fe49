use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::ast::AnyRule;

/// Severity of a linter problem.
///
/// `Off` only ever appears in configuration (a rule set to `Off` is
/// disabled); reported problems carry `Warn`, `Error` or `Fatal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Off,
    Warn,
    Error,
    Fatal,
}

impl Severity {
    /// Numeric form used in configuration: 0 = off, 1 = warn, 2 = error,
    /// 3 = fatal.
    pub fn as_number(&self) -> u8 {
        match self {
            Severity::Off => 0,
            Severity::Warn => 1,
            Severity::Error => 2,
            Severity::Fatal => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Severity::Off => "off",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        }
    }

    pub fn from_str(s: &str) -> Option<Severity> {
        match s.to_lowercase().as_str() {
            "off" => Some(Severity::Off),
            "warn" => Some(Severity::Warn),
            "error" => Some(Severity::Error),
            "fatal" => Some(Severity::Fatal),
            _ => None,
        }
    }

    pub fn from_number(n: u64) -> Option<Severity> {
        match n {
            0 => Some(Severity::Off),
            1 => Some(Severity::Warn),
            2 => Some(Severity::Error),
            3 => Some(Severity::Fatal),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SeverityVisitor;

        impl Visitor<'_> for SeverityVisitor {
            type Value = Severity;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("\"off\", \"warn\", \"error\", \"fatal\" or an integer 0..=3")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Severity, E> {
                Severity::from_str(v).ok_or_else(|| E::custom(format!("invalid severity \"{v}\"")))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Severity, E> {
                Severity::from_number(v).ok_or_else(|| E::custom(format!("invalid severity {v}")))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Severity, E> {
                u64::try_from(v)
                    .ok()
                    .and_then(Severity::from_number)
                    .ok_or_else(|| E::custom(format!("invalid severity {v}")))
            }
        }

        deserializer.deserialize_any(SeverityVisitor)
    }
}

/// Source span of a problem or rule. Lines are 1-based, columns 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub start_line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_column: Option<usize>,
    pub end_line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_column: Option<usize>,
}

impl Position {
    /// Span covering columns `start..end` of a single line.
    pub fn line_span(line: usize, start: usize, end: usize) -> Self {
        Self {
            start_line: line,
            start_column: Some(start),
            end_line: line,
            end_column: Some(end),
        }
    }

    /// Full-line span for a line of the given length.
    pub fn full_line(line: usize, len: usize) -> Self {
        Self::line_span(line, 0, len)
    }
}

/// A single problem found while linting.
#[derive(Debug, Clone)]
pub struct Problem {
    /// Name of the rule that reported the problem. Absent for parse
    /// failures that happen before any rule runs.
    pub rule: Option<String>,
    pub severity: Severity,
    pub message: String,
    pub position: Position,
    /// Replacement rule(s) for the offending line, applied when fixing is
    /// requested. Owned by the problem (a deep copy, never the AST the
    /// rule was handed).
    pub fix: Option<Vec<AnyRule>>,
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.position.start_line,
            self.position.start_column.unwrap_or(0),
            self.severity,
            self.message,
        )?;
        if let Some(rule) = &self.rule {
            write!(f, " ({rule})")?;
        }
        Ok(())
    }
}
