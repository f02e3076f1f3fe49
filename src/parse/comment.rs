//! Comment family parsers: agent tags, AdGuard hints, preprocessor
//! directives, metadata headers, inline configuration comments and simple
//! comments.

use std::sync::LazyLock;

use regex::Regex;

use crate::ast::{
    Agent, AgentCommentRule, CommentMarker, CommentRule, ConfigCommentParams, ConfigCommentRule,
    Hint, HintCommentRule, MetadataCommentRule, PreProcessorCommentRule, SimpleCommentRule,
};
use crate::diagnostic::Position;
use crate::parse::scan;
use crate::parse::ParseError;
use crate::syntax::AdblockSyntax;

/// Inline configuration comment recognizer: a comment marker, optional
/// whitespace, then a word with the `aglint` prefix.
static CONFIG_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[!#]\s*((?i:aglint)\S*)").unwrap());

/// Metadata headers a filter list may carry. Matched case-insensitively.
const KNOWN_METADATA_HEADERS: [&str; 16] = [
    "checksum",
    "description",
    "diff-path",
    "expires",
    "homepage",
    "last modified",
    "last_modified",
    "lastmodified",
    "licence",
    "license",
    "redirect",
    "redirect-url",
    "time updated",
    "timeupdated",
    "title",
    "version",
];

/// Inline configuration commands.
pub const CONFIG_COMMAND_MAIN: &str = "aglint";
pub const CONFIG_COMMAND_DISABLE: &str = "aglint-disable";
pub const CONFIG_COMMAND_ENABLE: &str = "aglint-enable";
pub const CONFIG_COMMAND_DISABLE_NEXT_LINE: &str = "aglint-disable-next-line";
pub const CONFIG_COMMAND_ENABLE_NEXT_LINE: &str = "aglint-enable-next-line";

const CONFIG_COMMANDS: [&str; 5] = [
    CONFIG_COMMAND_MAIN,
    CONFIG_COMMAND_DISABLE,
    CONFIG_COMMAND_ENABLE,
    CONFIG_COMMAND_DISABLE_NEXT_LINE,
    CONFIG_COMMAND_ENABLE_NEXT_LINE,
];

/// Separator between config comment params and the trailing free-text
/// comment.
const CONFIG_COMMENT_TAIL: &str = "--";

/// Parse an agent tag like `[Adblock Plus 2.0; AdGuard]`, optionally
/// preceded by a comment marker. Returns `None` when the line is not an
/// agent tag.
pub fn parse_agent(trimmed: &str, position: Position) -> Option<AgentCommentRule> {
    let mut rest = trimmed;
    if let Some(stripped) = rest.strip_prefix('!').or_else(|| rest.strip_prefix('#')) {
        rest = stripped.trim_start();
    }
    let inner = rest.strip_prefix('[')?.strip_suffix(']')?;
    // A bracketed prefix of a cosmetic rule is not an agent tag.
    if inner.contains('[') || inner.contains(']') {
        return None;
    }
    if crate::parse::cosmetic::find_separator(inner).is_some() {
        return None;
    }

    let mut agents = Vec::new();
    for entry in inner.split(';') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        agents.push(split_agent_entry(entry));
    }

    Some(AgentCommentRule {
        syntax: AdblockSyntax::Common,
        position,
        agents,
    })
}

/// Split one agent entry into product name and version. The version starts
/// at the first word containing a digit or a dot.
fn split_agent_entry(entry: &str) -> Agent {
    let words: Vec<&str> = entry.split_whitespace().collect();
    let version_start = words
        .iter()
        .position(|w| w.chars().any(|c| c.is_ascii_digit() || c == '.'));
    match version_start {
        Some(idx) if idx > 0 => Agent {
            adblock: words[..idx].join(" "),
            version: Some(words[idx..].join(" ")),
        },
        _ => Agent {
            adblock: words.join(" "),
            version: None,
        },
    }
}

/// Parse the comment families other than agent tags. Returns `Ok(None)`
/// when the line is not a comment at all.
pub fn parse_comment(trimmed: &str, position: Position) -> Result<Option<CommentRule>, ParseError> {
    let Some(marker_char) = trimmed.chars().next() else {
        return Ok(None);
    };
    let Some(marker) = CommentMarker::from_char(marker_char) else {
        return Ok(None);
    };

    // A hashmark-led line containing a cosmetic separator is a cosmetic
    // rule, e.g. `##.banner` or `#@#.banner`.
    if marker == CommentMarker::Hashmark
        && crate::parse::cosmetic::find_separator(trimmed).is_some()
    {
        return Ok(None);
    }

    if let Some(hint_body) = trimmed.strip_prefix("!+") {
        return parse_hints(hint_body, position).map(CommentRule::Hint).map(Some);
    }

    if trimmed.starts_with("!#") && !trimmed.starts_with("!##") {
        return parse_preprocessor(&trimmed[2..], position)
            .map(CommentRule::PreProcessor)
            .map(Some);
    }

    if let Some(metadata) = parse_metadata(trimmed, marker, position) {
        return Ok(Some(CommentRule::Metadata(metadata)));
    }

    if let Some(config) = parse_config_comment(trimmed, marker, position)? {
        return Ok(Some(CommentRule::Config(config)));
    }

    Ok(Some(CommentRule::Simple(SimpleCommentRule {
        syntax: AdblockSyntax::Common,
        position,
        marker,
        text: trimmed[1..].to_string(),
    })))
}

/// Parse the body of a hint comment (`!+` already stripped).
fn parse_hints(body: &str, position: Position) -> Result<HintCommentRule, ParseError> {
    let bytes = body.as_bytes();
    let mut hints = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if scan::is_whitespace(bytes[i]) {
            i += 1;
            continue;
        }

        let name_start = i;
        while i < bytes.len() && is_hint_ident(bytes[i]) {
            i += 1;
        }
        let name = &body[name_start..i];

        if i < bytes.len() && bytes[i] == b'(' {
            if name.is_empty() {
                return Err(ParseError::new("Missing hint name"));
            }
            let params_start = i + 1;
            let mut close = None;
            let mut j = params_start;
            while j < bytes.len() {
                match bytes[j] {
                    b'(' => return Err(ParseError::new("Nesting hints isn't supported")),
                    b')' => {
                        close = Some(j);
                        break;
                    }
                    _ => j += 1,
                }
            }
            let Some(close) = close else {
                return Err(ParseError::new("Unclosed opening bracket"));
            };
            let inner = &body[params_start..close];
            let params = if inner.trim().is_empty() {
                Vec::new()
            } else {
                inner.split(',').map(|p| p.trim().to_string()).collect()
            };
            hints.push(Hint {
                name: name.to_string(),
                params: Some(params),
            });
            i = close + 1;
        } else if !name.is_empty() {
            hints.push(Hint {
                name: name.to_string(),
                params: None,
            });
        } else {
            return Err(ParseError::new(format!(
                "Invalid character \"{}\" in hint",
                bytes[i] as char
            )));
        }
    }

    if hints.is_empty() {
        return Err(ParseError::new("Empty hint rule"));
    }

    Ok(HintCommentRule {
        syntax: AdblockSyntax::Adg,
        position,
        hints,
    })
}

fn is_hint_ident(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Parse a preprocessor directive body (`!#` already stripped).
fn parse_preprocessor(body: &str, position: Position) -> Result<PreProcessorCommentRule, ParseError> {
    if body.trim().is_empty() {
        return Err(ParseError::new("Empty preprocessor directive"));
    }
    let (name, params) = match scan::find_unescaped_ws_outside_parens(body) {
        Some(idx) => {
            let params = body[idx..].trim();
            (
                &body[..idx],
                (!params.is_empty()).then(|| params.to_string()),
            )
        }
        None => (body, None),
    };
    if name.is_empty() {
        return Err(ParseError::new("Empty preprocessor directive"));
    }
    Ok(PreProcessorCommentRule {
        syntax: AdblockSyntax::Common,
        position,
        name: name.to_string(),
        params,
    })
}

/// Parse a metadata header if the text before the first `:` is a known
/// header name.
fn parse_metadata(
    trimmed: &str,
    marker: CommentMarker,
    position: Position,
) -> Option<MetadataCommentRule> {
    let body = &trimmed[1..];
    let colon = body.find(':')?;
    let header = body[..colon].trim();
    let normalized = header.to_lowercase();
    if !KNOWN_METADATA_HEADERS.contains(&normalized.as_str()) {
        return None;
    }
    Some(MetadataCommentRule {
        syntax: AdblockSyntax::Common,
        position,
        marker,
        header: header.to_string(),
        value: body[colon + 1..].trim().to_string(),
    })
}

/// Parse an inline configuration comment. Returns `Ok(None)` when the
/// comment body does not start with the `aglint` prefix.
fn parse_config_comment(
    trimmed: &str,
    marker: CommentMarker,
    position: Position,
) -> Result<Option<ConfigCommentRule>, ParseError> {
    let Some(word) = CONFIG_COMMENT_RE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
    else {
        return Ok(None);
    };
    let command = word.as_str();
    let lowercase = command.to_lowercase();
    if !CONFIG_COMMANDS.contains(&lowercase.as_str()) {
        // Only the exact `aglint` word or an `aglint-` command counts as a
        // directive; anything else is prose mentioning an aglint-like word.
        if lowercase.starts_with("aglint-") {
            return Err(ParseError::new(format!(
                "Unknown aglint command \"{command}\""
            )));
        }
        return Ok(None);
    }

    let tail = &trimmed[word.end()..];
    let (params_str, comment) = match tail.find(CONFIG_COMMENT_TAIL) {
        Some(idx) => {
            let text = tail[idx + CONFIG_COMMENT_TAIL.len()..].trim();
            (
                tail[..idx].trim(),
                (!text.is_empty()).then(|| text.to_string()),
            )
        }
        None => (tail.trim(), None),
    };

    let params = if lowercase == CONFIG_COMMAND_MAIN {
        if params_str.is_empty() {
            return Err(ParseError::new("Missing configuration object"));
        }
        let value: serde_json::Value = json5::from_str(&format!("{{ {params_str} }}"))
            .map_err(|e| ParseError::new(format!("Invalid configuration object: {e}")))?;
        Some(ConfigCommentParams::Object(value))
    } else {
        let names: Vec<String> = params_str
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        Some(ConfigCommentParams::Rules(names))
    };

    Ok(Some(ConfigCommentRule {
        syntax: AdblockSyntax::Common,
        position,
        marker,
        command: lowercase,
        params,
        comment,
    }))
}
