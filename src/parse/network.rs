//! Network rule parser: exception prefix, pattern/modifier separation and
//! the modifier list, including the two header-removal dialects.

use crate::ast::{BasicNetworkRule, NetworkRule, NetworkRuleModifier, RemoveHeaderNetworkRule};
use crate::diagnostic::Position;
use crate::parse::{scan, ParseError};
use crate::syntax::AdblockSyntax;

/// AdGuard header-removal modifier name.
const REMOVEHEADER_MODIFIER: &str = "removeheader";

/// uBlock Origin header-removal body prefix (after the `##^` separator).
const RESPONSEHEADER_PREFIX: &str = "^responseheader(";

/// Parse a network rule. Every line that reaches this parser is treated as
/// a network rule; malformed modifier lists are errors.
pub fn parse_network(trimmed: &str, position: Position) -> Result<NetworkRule, ParseError> {
    let (exception, body) = match trimmed.strip_prefix("@@") {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let Some(separator) = find_modifier_separator(body) else {
        return Ok(NetworkRule::Basic(BasicNetworkRule {
            syntax: AdblockSyntax::Common,
            position,
            exception,
            pattern: body.to_string(),
            modifiers: Vec::new(),
        }));
    };

    let pattern = &body[..separator];
    let modifiers = parse_modifier_list(&body[separator + 1..])?;

    if let Some(removeheader) = modifiers.iter().find(|m| m.name == REMOVEHEADER_MODIFIER) {
        let header = removeheader.value.as_deref().unwrap_or("").trim();
        if header.is_empty() {
            return Err(ParseError::new("No header name specified in rule"));
        }
        return Ok(NetworkRule::RemoveHeader(RemoveHeaderNetworkRule {
            syntax: AdblockSyntax::Adg,
            position,
            exception,
            pattern: pattern.to_string(),
            header: header.to_string(),
        }));
    }

    Ok(NetworkRule::Basic(BasicNetworkRule {
        syntax: AdblockSyntax::Common,
        position,
        exception,
        pattern: pattern.to_string(),
        modifiers,
    }))
}

/// Find the `$` that separates the pattern from the modifier list.
///
/// Scans backward for an unescaped `$`. A candidate immediately followed
/// by `/` is the tail of a regex value (`…$/`) and is skipped; regex
/// anchors elsewhere inside `/…/` values are escaped in well-formed rules.
fn find_modifier_separator(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    for i in (0..bytes.len()).rev() {
        if bytes[i] != b'$' || scan::is_escaped(s, i) {
            continue;
        }
        if bytes.get(i + 1) == Some(&b'/') {
            continue;
        }
        return Some(i);
    }
    None
}

/// Parse a comma-separated modifier list: `[~]name[=value]` entries.
fn parse_modifier_list(s: &str) -> Result<Vec<NetworkRuleModifier>, ParseError> {
    let mut modifiers = Vec::new();
    for (_, entry) in scan::split_outside_strings_and_regex(s, b',') {
        let entry = entry.trim();
        if entry.is_empty() {
            return Err(ParseError::new("Empty modifier specified"));
        }
        let (entry, exception) = match entry.strip_prefix('~') {
            Some(rest) => (rest.trim(), true),
            None => (entry, false),
        };
        let (name, value) = match entry.find('=') {
            Some(eq) => (entry[..eq].trim(), Some(entry[eq + 1..].to_string())),
            None => (entry, None),
        };
        if name.is_empty() {
            return Err(ParseError::new("Empty modifier name"));
        }
        modifiers.push(NetworkRuleModifier {
            exception,
            name: name.to_string(),
            value,
        });
    }
    Ok(modifiers)
}

/// Parse the body of a uBlock Origin `##^responseheader(header)` rule.
/// The cosmetic dispatcher routes here after separator discovery.
pub fn parse_ubo_responseheader(
    pattern: &str,
    body: &str,
    exception: bool,
    position: Position,
) -> Result<RemoveHeaderNetworkRule, ParseError> {
    let Some(tail) = body.strip_prefix(RESPONSEHEADER_PREFIX) else {
        return Err(ParseError::new("Not a responseheader rule"));
    };
    let Some(header) = tail.strip_suffix(')') else {
        return Err(ParseError::new(
            "Missing closing parenthesis in responseheader rule",
        ));
    };
    let header = header.trim();
    if header.is_empty() {
        return Err(ParseError::new("No header name specified in rule"));
    }
    Ok(RemoveHeaderNetworkRule {
        syntax: AdblockSyntax::Ubo,
        position,
        exception,
        pattern: pattern.to_string(),
        header: header.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos() -> Position {
        Position::full_line(1, 0)
    }

    fn basic(line: &str) -> BasicNetworkRule {
        match parse_network(line, pos()).unwrap() {
            NetworkRule::Basic(rule) => rule,
            other => panic!("expected basic network rule, got {other:?}"),
        }
    }

    #[test]
    fn plain_pattern_without_modifiers() {
        let rule = basic("||example.com^");
        assert!(!rule.exception);
        assert_eq!(rule.pattern, "||example.com^");
        assert!(rule.modifiers.is_empty());
        assert_eq!(rule.generate(), "||example.com^");
    }

    #[test]
    fn pattern_with_modifiers() {
        let rule = basic("||example.com^$script,third-party");
        assert_eq!(rule.pattern, "||example.com^");
        assert_eq!(rule.modifiers.len(), 2);
        assert_eq!(rule.modifiers[0].name, "script");
        assert_eq!(rule.modifiers[1].name, "third-party");
        assert_eq!(rule.generate(), "||example.com^$script,third-party");
    }

    #[test]
    fn exception_prefix_peeled() {
        let rule = basic("@@||example.com^$script");
        assert!(rule.exception);
        assert_eq!(rule.pattern, "||example.com^");
    }

    #[test]
    fn negated_modifier() {
        let rule = basic("||example.com^$~third-party,domain=example.org");
        assert!(rule.modifiers[0].exception);
        assert_eq!(rule.modifiers[0].name, "third-party");
        assert_eq!(rule.modifiers[1].value.as_deref(), Some("example.org"));
    }

    #[test]
    fn regex_pattern_with_regex_modifier_values() {
        // The `$` after `/example/` is the separator; the ones inside the
        // regex values are escaped or regex tails.
        let rule = basic("@@/example/$m1,m2=v2,m3=/^r3\\$/,m4=/r4\\/r4$/,m5=/^r5\\$/");
        assert!(rule.exception);
        assert_eq!(rule.pattern, "/example/");
        let names: Vec<&str> = rule.modifiers.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["m1", "m2", "m3", "m4", "m5"]);
        assert_eq!(rule.modifiers[1].value.as_deref(), Some("v2"));
        assert_eq!(rule.modifiers[2].value.as_deref(), Some("/^r3\\$/"));
        assert_eq!(rule.modifiers[3].value.as_deref(), Some("/r4\\/r4$/"));
        assert_eq!(rule.modifiers[4].value.as_deref(), Some("/^r5\\$/"));
        assert_eq!(
            rule.generate(),
            "@@/example/$m1,m2=v2,m3=/^r3\\$/,m4=/r4\\/r4$/,m5=/^r5\\$/"
        );
    }

    #[test]
    fn pure_regex_pattern_keeps_inner_dollar() {
        let rule = basic("/banner\\d+$/");
        assert_eq!(rule.pattern, "/banner\\d+$/");
        assert!(rule.modifiers.is_empty());
    }

    #[test]
    fn regex_pattern_with_trailing_modifier() {
        let rule = basic("/banner$/$third-party");
        assert_eq!(rule.pattern, "/banner$/");
        assert_eq!(rule.modifiers[0].name, "third-party");
    }

    #[test]
    fn escaped_dollar_is_not_a_separator() {
        let rule = basic("||example.com/page\\$print");
        assert_eq!(rule.pattern, "||example.com/page\\$print");
        assert!(rule.modifiers.is_empty());
    }

    #[test]
    fn empty_modifier_fails() {
        let err = parse_network("||example.com^$script,,image", pos()).unwrap_err();
        assert_eq!(err.message, "Empty modifier specified");
    }

    #[test]
    fn removeheader_reclassifies() {
        let rule = parse_network("||example.org^$removeheader=header-name", pos()).unwrap();
        let NetworkRule::RemoveHeader(rh) = rule else {
            panic!("expected remove-header rule");
        };
        assert_eq!(rh.syntax, AdblockSyntax::Adg);
        assert!(!rh.exception);
        assert_eq!(rh.pattern, "||example.org^");
        assert_eq!(rh.header, "header-name");
        assert_eq!(rh.generate(), "||example.org^$removeheader=header-name");
    }

    #[test]
    fn removeheader_exception() {
        let rule = parse_network("@@||example.org^$removeheader=refresh", pos()).unwrap();
        let NetworkRule::RemoveHeader(rh) = rule else {
            panic!("expected remove-header rule");
        };
        assert!(rh.exception);
    }

    #[test]
    fn removeheader_without_value_fails() {
        let err = parse_network("||example.org^$removeheader", pos()).unwrap_err();
        assert_eq!(err.message, "No header name specified in rule");
        let err = parse_network("||example.org^$removeheader=", pos()).unwrap_err();
        assert_eq!(err.message, "No header name specified in rule");
    }

    #[test]
    fn responseheader_parsing() {
        let rule =
            parse_ubo_responseheader("example.org", "^responseheader(refresh)", false, pos())
                .unwrap();
        assert_eq!(rule.syntax, AdblockSyntax::Ubo);
        assert_eq!(rule.header, "refresh");
    }

    #[test]
    fn responseheader_empty_header_fails() {
        let err = parse_ubo_responseheader("example.org", "^responseheader( )", false, pos())
            .unwrap_err();
        assert_eq!(err.message, "No header name specified in rule");
    }

    #[test]
    fn responseheader_unclosed_fails() {
        let err = parse_ubo_responseheader("example.org", "^responseheader(refresh", false, pos())
            .unwrap_err();
        assert_eq!(err.message, "Missing closing parenthesis in responseheader rule");
    }
}
