//! Comment-category rules: agent tags, AdGuard hints, preprocessor
//! directives, metadata headers, inline linter-configuration comments and
//! plain comments.

use std::fmt;

use crate::diagnostic::Position;
use crate::syntax::AdblockSyntax;

/// Comment marker character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentMarker {
    /// `!`
    Regular,
    /// `#`
    Hashmark,
}

impl CommentMarker {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentMarker::Regular => "!",
            CommentMarker::Hashmark => "#",
        }
    }

    pub fn from_char(c: char) -> Option<CommentMarker> {
        match c {
            '!' => Some(CommentMarker::Regular),
            '#' => Some(CommentMarker::Hashmark),
            _ => None,
        }
    }
}

impl fmt::Display for CommentMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One adblocker product reference inside an agent tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    pub adblock: String,
    pub version: Option<String>,
}

/// Agent tag, e.g. `[Adblock Plus 2.0; AdGuard]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentCommentRule {
    pub syntax: AdblockSyntax,
    pub position: Position,
    pub agents: Vec<Agent>,
}

impl AgentCommentRule {
    pub fn generate(&self) -> String {
        let entries: Vec<String> = self
            .agents
            .iter()
            .map(|a| match &a.version {
                Some(version) => format!("{} {}", a.adblock, version),
                None => a.adblock.clone(),
            })
            .collect();
        format!("[{}]", entries.join("; "))
    }
}

/// One hint inside a hint comment. `params` is `None` when the hint has no
/// parameter list at all and `Some(vec![])` for an empty `()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    pub name: String,
    pub params: Option<Vec<String>>,
}

impl Hint {
    fn generate(&self) -> String {
        match &self.params {
            Some(params) => format!("{}({})", self.name, params.join(", ")),
            None => self.name.clone(),
        }
    }
}

/// AdGuard hint comment, e.g. `!+ NOT_OPTIMIZED PLATFORM(windows, mac)`.
#[derive(Debug, Clone, PartialEq)]
pub struct HintCommentRule {
    /// Always [`AdblockSyntax::Adg`]; hints are an AdGuard extension.
    pub syntax: AdblockSyntax,
    pub position: Position,
    pub hints: Vec<Hint>,
}

impl HintCommentRule {
    pub fn generate(&self) -> String {
        let hints: Vec<String> = self.hints.iter().map(Hint::generate).collect();
        format!("!+ {}", hints.join(" "))
    }
}

/// Preprocessor directive, e.g. `!#if (adguard)`. The parameter string is
/// kept opaque beyond name extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct PreProcessorCommentRule {
    pub syntax: AdblockSyntax,
    pub position: Position,
    pub name: String,
    pub params: Option<String>,
}

impl PreProcessorCommentRule {
    pub fn generate(&self) -> String {
        match &self.params {
            Some(params) => format!("!#{} {}", self.name, params),
            None => format!("!#{}", self.name),
        }
    }
}

/// Metadata header, e.g. `! Title: My Filter List`.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataCommentRule {
    pub syntax: AdblockSyntax,
    pub position: Position,
    pub marker: CommentMarker,
    pub header: String,
    pub value: String,
}

impl MetadataCommentRule {
    pub fn generate(&self) -> String {
        format!("{} {}: {}", self.marker, self.header, self.value)
    }
}

/// Parameters of an inline configuration comment. The `aglint` command
/// carries a configuration object; every other command carries a list of
/// rule names, possibly empty.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigCommentParams {
    Rules(Vec<String>),
    Object(serde_json::Value),
}

/// Inline linter-configuration comment, e.g.
/// `! aglint-disable-next-line rule-name -- reason`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigCommentRule {
    pub syntax: AdblockSyntax,
    pub position: Position,
    pub marker: CommentMarker,
    pub command: String,
    pub params: Option<ConfigCommentParams>,
    pub comment: Option<String>,
}

impl ConfigCommentRule {
    pub fn generate(&self) -> String {
        let mut out = format!("{} {}", self.marker, self.command);
        match &self.params {
            Some(ConfigCommentParams::Rules(names)) if !names.is_empty() => {
                out.push(' ');
                out.push_str(&names.join(", "));
            }
            Some(ConfigCommentParams::Rules(_)) | None => {}
            Some(ConfigCommentParams::Object(value)) => {
                out.push(' ');
                out.push_str(&object_entries(value));
            }
        }
        if let Some(comment) = &self.comment {
            out.push_str(" -- ");
            out.push_str(comment);
        }
        out
    }
}

/// Serialize a configuration object as compact JSON key-value pairs
/// without the surrounding braces.
fn object_entries(value: &serde_json::Value) -> String {
    match value.as_object() {
        Some(map) => map
            .iter()
            .map(|(k, v)| format!("{}: {}", serde_json::Value::String(k.clone()), v))
            .collect::<Vec<_>>()
            .join(", "),
        None => value.to_string(),
    }
}

/// Any other marker-led line.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleCommentRule {
    pub syntax: AdblockSyntax,
    pub position: Position,
    pub marker: CommentMarker,
    pub text: String,
}

impl SimpleCommentRule {
    pub fn generate(&self) -> String {
        format!("{}{}", self.marker, self.text)
    }
}

/// Comment-category rule.
#[derive(Debug, Clone, PartialEq)]
pub enum CommentRule {
    Agent(AgentCommentRule),
    Hint(HintCommentRule),
    PreProcessor(PreProcessorCommentRule),
    Metadata(MetadataCommentRule),
    Config(ConfigCommentRule),
    Simple(SimpleCommentRule),
}

impl CommentRule {
    pub fn syntax(&self) -> AdblockSyntax {
        match self {
            CommentRule::Agent(r) => r.syntax,
            CommentRule::Hint(r) => r.syntax,
            CommentRule::PreProcessor(r) => r.syntax,
            CommentRule::Metadata(r) => r.syntax,
            CommentRule::Config(r) => r.syntax,
            CommentRule::Simple(r) => r.syntax,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            CommentRule::Agent(r) => r.position,
            CommentRule::Hint(r) => r.position,
            CommentRule::PreProcessor(r) => r.position,
            CommentRule::Metadata(r) => r.position,
            CommentRule::Config(r) => r.position,
            CommentRule::Simple(r) => r.position,
        }
    }

    pub fn generate(&self) -> String {
        match self {
            CommentRule::Agent(r) => r.generate(),
            CommentRule::Hint(r) => r.generate(),
            CommentRule::PreProcessor(r) => r.generate(),
            CommentRule::Metadata(r) => r.generate(),
            CommentRule::Config(r) => r.generate(),
            CommentRule::Simple(r) => r.generate(),
        }
    }
}
