//! Cosmetic rule parser: separator discovery, domain list, the AdGuard
//! `[$…]` modifier block, and body routing.

use crate::ast::{
    AnyRule, CosmeticRule, CosmeticRuleBody, CosmeticRuleModifier, CosmeticRuleType,
    CosmeticSeparator, CssInjectionBody, DomainListEntry, ElementHidingBody, HtmlBody, JsBody,
    NetworkRule,
};
use crate::diagnostic::Position;
use crate::parse::{scan, scriptlet, ParseError};
use crate::syntax::AdblockSyntax;

/// A cosmetic separator found in a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeparatorMatch {
    pub index: usize,
    pub separator: CosmeticSeparator,
}

/// Find the first cosmetic separator that is not inside a quoted region or
/// an AdGuard `[$…]` modifier block. Modifier blocks may contain regex
/// values with unescaped `#` or `]`, so a `/…/` region inside the block
/// suspends both separator matching and block closing.
pub fn find_separator(s: &str) -> Option<SeparatorMatch> {
    let bytes = s.as_bytes();
    let mut in_single = false;
    let mut in_double = false;
    let mut in_regex = false;
    let mut in_block = false;
    let mut escaped = false;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if escaped {
            escaped = false;
            i += 1;
            continue;
        }
        if b == b'\\' {
            escaped = true;
            i += 1;
            continue;
        }
        if in_single {
            in_single = b != b'\'';
            i += 1;
            continue;
        }
        if in_double {
            in_double = b != b'"';
            i += 1;
            continue;
        }
        if in_regex {
            in_regex = b != b'/';
            i += 1;
            continue;
        }
        if in_block {
            match b {
                b'\'' => in_single = true,
                b'"' => in_double = true,
                b'/' => in_regex = true,
                b']' => in_block = false,
                _ => {}
            }
            i += 1;
            continue;
        }
        match b {
            b'\'' => in_single = true,
            b'"' => in_double = true,
            b'[' if bytes.get(i + 1) == Some(&b'$') => in_block = true,
            b'#' | b'$' => {
                for sep in CosmeticSeparator::ALL {
                    if s[i..].starts_with(sep.as_str()) {
                        return Some(SeparatorMatch {
                            index: i,
                            separator: sep,
                        });
                    }
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Parse a cosmetic rule. Returns `Ok(None)` when the line contains no
/// cosmetic separator. uBlock Origin `##^responseheader(…)` rules are
/// cosmetic-shaped but semantically network rules, so those come back as
/// [`AnyRule::Network`].
pub fn parse_cosmetic(trimmed: &str, position: Position) -> Result<Option<AnyRule>, ParseError> {
    let Some(found) = find_separator(trimmed) else {
        return Ok(None);
    };
    let separator = found.separator;
    let left = trimmed[..found.index].trim();
    let body = trimmed[found.index + separator.as_str().len()..].trim();

    if matches!(
        separator,
        CosmeticSeparator::ElementHiding | CosmeticSeparator::ElementHidingException
    ) && body.starts_with("^responseheader(")
    {
        let rule = crate::parse::network::parse_ubo_responseheader(
            left,
            body,
            separator.is_exception(),
            position,
        )?;
        return Ok(Some(AnyRule::Network(NetworkRule::RemoveHeader(rule))));
    }

    if body.is_empty() {
        return Err(ParseError::new("Empty rule body"));
    }

    let (modifiers, domains_part) = parse_modifier_block(left)?;
    let domains = parse_domain_list(domains_part.trim())?;

    let (rule_type, body_node, mut syntax) = route_body(separator, body)?;
    if syntax == AdblockSyntax::Common && !modifiers.is_empty() {
        syntax = AdblockSyntax::Adg;
    }

    Ok(Some(AnyRule::Cosmetic(CosmeticRule {
        syntax,
        position,
        rule_type,
        exception: separator.is_exception(),
        separator,
        modifiers,
        domains,
        body: body_node,
    })))
}

/// Pick the body parser by separator token and body shape.
fn route_body(
    separator: CosmeticSeparator,
    body: &str,
) -> Result<(CosmeticRuleType, CosmeticRuleBody, AdblockSyntax), ParseError> {
    use CosmeticSeparator as S;
    match separator {
        S::ElementHiding
        | S::ElementHidingException
        | S::ExtendedElementHiding
        | S::ExtendedElementHidingException => {
            if body.starts_with("+js(") {
                let scriptlet = scriptlet::parse_ubo_scriptlet_body(body)?;
                return Ok((
                    CosmeticRuleType::Scriptlet,
                    CosmeticRuleBody::Scriptlet(scriptlet),
                    AdblockSyntax::Ubo,
                ));
            }
            if body.starts_with('^') {
                return Ok((
                    CosmeticRuleType::Html,
                    CosmeticRuleBody::Html(HtmlBody {
                        body: body.to_string(),
                    }),
                    AdblockSyntax::Ubo,
                ));
            }
            if body.contains(":style(") || body.contains(":remove()") {
                return Ok((
                    CosmeticRuleType::Css,
                    CosmeticRuleBody::Css(CssInjectionBody {
                        raw: body.to_string(),
                    }),
                    AdblockSyntax::Ubo,
                ));
            }
            let syntax = if body.contains(":matches-path(") || body.contains(":has-text(") {
                AdblockSyntax::Ubo
            } else {
                AdblockSyntax::Common
            };
            Ok((
                CosmeticRuleType::ElementHiding,
                CosmeticRuleBody::ElementHiding(ElementHidingBody {
                    selector_list: body.to_string(),
                }),
                syntax,
            ))
        }
        S::AdgCss | S::AdgCssException => {
            if has_css_injection_shape(body) {
                Ok((
                    CosmeticRuleType::Css,
                    CosmeticRuleBody::Css(CssInjectionBody {
                        raw: body.to_string(),
                    }),
                    AdblockSyntax::Adg,
                ))
            } else {
                let snippet = scriptlet::parse_abp_snippet_body(body)?;
                Ok((
                    CosmeticRuleType::Scriptlet,
                    CosmeticRuleBody::Scriptlet(snippet),
                    AdblockSyntax::Abp,
                ))
            }
        }
        S::AdgExtendedCss | S::AdgExtendedCssException => Ok((
            CosmeticRuleType::Css,
            CosmeticRuleBody::Css(CssInjectionBody {
                raw: body.to_string(),
            }),
            AdblockSyntax::Adg,
        )),
        S::AdgJs | S::AdgJsException => {
            if body.starts_with("//scriptlet") {
                let scriptlet = scriptlet::parse_adg_scriptlet_body(body)?;
                Ok((
                    CosmeticRuleType::Scriptlet,
                    CosmeticRuleBody::Scriptlet(scriptlet),
                    AdblockSyntax::Adg,
                ))
            } else {
                Ok((
                    CosmeticRuleType::Js,
                    CosmeticRuleBody::Js(JsBody {
                        code: body.to_string(),
                    }),
                    AdblockSyntax::Adg,
                ))
            }
        }
        S::AdgHtml | S::AdgHtmlException => Ok((
            CosmeticRuleType::Html,
            CosmeticRuleBody::Html(HtmlBody {
                body: body.to_string(),
            }),
            AdblockSyntax::Adg,
        )),
    }
}

/// CSS injection bodies are brace-delimited: `selector { declarations }`.
fn has_css_injection_shape(body: &str) -> bool {
    scan::find_unescaped_outside_strings(body, b'{', 0).is_some() && body.trim_end().ends_with('}')
}

/// Strip a leading AdGuard `[$name=value,…]` modifier block.
fn parse_modifier_block(left: &str) -> Result<(Vec<CosmeticRuleModifier>, &str), ParseError> {
    if !left.starts_with("[$") {
        return Ok((Vec::new(), left));
    }
    let Some(close) = scan::find_unescaped_outside_strings_and_regex(left, b']', 2) else {
        return Err(ParseError::new("Missing closing bracket of modifier list"));
    };
    let inner = &left[2..close];
    let mut modifiers = Vec::new();
    for (_, entry) in scan::split_outside_strings_and_regex(inner, b',') {
        let entry = entry.trim();
        if entry.is_empty() {
            return Err(ParseError::new("Empty modifier specified"));
        }
        let (name, value) = match entry.find('=') {
            Some(eq) => (entry[..eq].trim(), Some(entry[eq + 1..].to_string())),
            None => (entry, None),
        };
        if name.is_empty() {
            return Err(ParseError::new("Empty modifier name"));
        }
        modifiers.push(CosmeticRuleModifier {
            name: name.to_string(),
            value,
        });
    }
    Ok((modifiers, &left[close + 1..]))
}

/// Parse a comma-separated domain list with `~` exception markers.
fn parse_domain_list(s: &str) -> Result<Vec<DomainListEntry>, ParseError> {
    if s.is_empty() {
        return Ok(Vec::new());
    }
    let mut domains = Vec::new();
    for part in s.split(',') {
        let part = part.trim();
        if part.is_empty() {
            return Err(ParseError::new("Empty domain specified"));
        }
        let (domain, exception) = match part.strip_prefix('~') {
            Some(rest) => (rest.trim(), true),
            None => (part, false),
        };
        if domain.is_empty() {
            return Err(ParseError::new("Empty domain specified"));
        }
        domains.push(DomainListEntry {
            domain: domain.to_string(),
            exception,
        });
    }
    Ok(domains)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ScriptletDialect;

    fn pos() -> Position {
        Position::full_line(1, 0)
    }

    fn cosmetic(line: &str) -> CosmeticRule {
        match parse_cosmetic(line, pos()).unwrap().unwrap() {
            AnyRule::Cosmetic(rule) => rule,
            other => panic!("expected cosmetic rule, got {other:?}"),
        }
    }

    #[test]
    fn separator_discovery_basic() {
        let m = find_separator("example.com##.banner").unwrap();
        assert_eq!(m.index, 11);
        assert_eq!(m.separator, CosmeticSeparator::ElementHiding);
    }

    #[test]
    fn separator_discovery_longest_wins() {
        assert_eq!(
            find_separator("example.com#@$?#.x").unwrap().separator,
            CosmeticSeparator::AdgExtendedCssException
        );
        assert_eq!(
            find_separator("example.com#?#.x").unwrap().separator,
            CosmeticSeparator::ExtendedElementHiding
        );
        assert_eq!(
            find_separator("$$div[tag-content=\"x\"]").unwrap().separator,
            CosmeticSeparator::AdgHtml
        );
    }

    #[test]
    fn separator_skips_modifier_block_regex() {
        // The regex value contains both `##` and `]`; neither terminates
        // the block early.
        let m = find_separator("[$domain=/ex##am\\]ple/]##.banner").unwrap();
        assert_eq!(m.separator, CosmeticSeparator::ElementHiding);
        assert_eq!(m.index, 23);
    }

    #[test]
    fn separator_none_in_network_rules() {
        assert!(find_separator("||example.com^$script").is_none());
        assert!(find_separator("/banner/$image").is_none());
        assert!(find_separator("@@||example.com^").is_none());
    }

    #[test]
    fn element_hiding_with_domains() {
        let rule = cosmetic("example.com,~sub.example.com##.banner");
        assert_eq!(rule.rule_type, CosmeticRuleType::ElementHiding);
        assert!(!rule.exception);
        assert_eq!(rule.syntax, AdblockSyntax::Common);
        assert_eq!(rule.domains.len(), 2);
        assert!(!rule.domains[0].exception);
        assert!(rule.domains[1].exception);
        assert_eq!(rule.domains[1].domain, "sub.example.com");
        assert_eq!(rule.generate(), "example.com,~sub.example.com##.banner");
    }

    #[test]
    fn element_hiding_exception() {
        let rule = cosmetic("example.com#@#.banner");
        assert!(rule.exception);
        assert_eq!(rule.generate(), "example.com#@#.banner");
    }

    #[test]
    fn generic_rule_has_empty_domains() {
        let rule = cosmetic("##.banner");
        assert!(rule.domains.is_empty());
        assert_eq!(rule.generate(), "##.banner");
    }

    #[test]
    fn adg_modifier_block() {
        let rule = cosmetic("[$app=com.test,path=/page]example.com##.ad");
        assert_eq!(rule.syntax, AdblockSyntax::Adg);
        assert_eq!(rule.modifiers.len(), 2);
        assert_eq!(rule.modifiers[0].name, "app");
        assert_eq!(rule.modifiers[0].value.as_deref(), Some("com.test"));
        assert_eq!(rule.generate(), "[$app=com.test,path=/page]example.com##.ad");
    }

    #[test]
    fn adg_modifier_block_unclosed_fails() {
        let err = parse_cosmetic("[$app=com.test example.com##.ad", pos()).unwrap_err();
        assert_eq!(err.message, "Missing closing bracket of modifier list");
    }

    #[test]
    fn empty_domain_fails() {
        let err = parse_cosmetic("example.com,,other.com##.ad", pos()).unwrap_err();
        assert_eq!(err.message, "Empty domain specified");
    }

    #[test]
    fn empty_body_fails() {
        let err = parse_cosmetic("example.com##", pos()).unwrap_err();
        assert_eq!(err.message, "Empty rule body");
    }

    #[test]
    fn adg_css_injection() {
        let rule = cosmetic("example.com#$#body { padding-top: 0 !important; }");
        assert_eq!(rule.rule_type, CosmeticRuleType::Css);
        assert_eq!(rule.syntax, AdblockSyntax::Adg);
        assert_eq!(
            rule.generate(),
            "example.com#$#body { padding-top: 0 !important; }"
        );
    }

    #[test]
    fn adg_extended_css_injection() {
        let rule = cosmetic("example.com#$?#div:has(> .ad) { display: none !important; }");
        assert_eq!(rule.rule_type, CosmeticRuleType::Css);
        assert_eq!(rule.separator, CosmeticSeparator::AdgExtendedCss);
    }

    #[test]
    fn abp_snippet_without_braces() {
        let rule = cosmetic("example.com#$#abort-on-property-read adsShowing");
        assert_eq!(rule.rule_type, CosmeticRuleType::Scriptlet);
        assert_eq!(rule.syntax, AdblockSyntax::Abp);
        let CosmeticRuleBody::Scriptlet(body) = &rule.body else {
            panic!("expected scriptlet body");
        };
        assert_eq!(body.dialect, ScriptletDialect::Abp);
    }

    #[test]
    fn adg_scriptlet() {
        let rule = cosmetic("example.com#%#//scriptlet('set-constant', 'x', 'false')");
        assert_eq!(rule.rule_type, CosmeticRuleType::Scriptlet);
        assert_eq!(rule.syntax, AdblockSyntax::Adg);
        assert_eq!(
            rule.generate(),
            "example.com#%#//scriptlet('set-constant', 'x', 'false')"
        );
    }

    #[test]
    fn adg_js_injection() {
        let rule = cosmetic("example.com#%#window.adsEnabled = false;");
        assert_eq!(rule.rule_type, CosmeticRuleType::Js);
        assert_eq!(rule.syntax, AdblockSyntax::Adg);
        assert_eq!(rule.generate(), "example.com#%#window.adsEnabled = false;");
    }

    #[test]
    fn ubo_scriptlet() {
        let rule = cosmetic("example.com##+js(aopr, adsShowing)");
        assert_eq!(rule.rule_type, CosmeticRuleType::Scriptlet);
        assert_eq!(rule.syntax, AdblockSyntax::Ubo);
        assert_eq!(rule.generate(), "example.com##+js(aopr, adsShowing)");
    }

    #[test]
    fn ubo_html_filtering() {
        let rule = cosmetic("example.com##^script:has-text(adblock)");
        assert_eq!(rule.rule_type, CosmeticRuleType::Html);
        assert_eq!(rule.syntax, AdblockSyntax::Ubo);
        assert_eq!(rule.generate(), "example.com##^script:has-text(adblock)");
    }

    #[test]
    fn ubo_css_injection_via_style() {
        let rule = cosmetic("example.com##.ad:style(opacity: 0.1)");
        assert_eq!(rule.rule_type, CosmeticRuleType::Css);
        assert_eq!(rule.syntax, AdblockSyntax::Ubo);
    }

    #[test]
    fn ubo_matches_path_sets_syntax() {
        let rule = cosmetic("example.com##:matches-path(/page).ad");
        assert_eq!(rule.rule_type, CosmeticRuleType::ElementHiding);
        assert_eq!(rule.syntax, AdblockSyntax::Ubo);
    }

    #[test]
    fn adg_html_filtering() {
        let rule = cosmetic("example.com$$div[tag-content=\"ads\"]");
        assert_eq!(rule.rule_type, CosmeticRuleType::Html);
        assert_eq!(rule.syntax, AdblockSyntax::Adg);
        assert_eq!(rule.generate(), "example.com$$div[tag-content=\"ads\"]");

        let exception = cosmetic("example.com$@$div[tag-content=\"ads\"]");
        assert!(exception.exception);
    }

    #[test]
    fn responseheader_routes_to_network() {
        let rule = parse_cosmetic("example.org##^responseheader(refresh)", pos())
            .unwrap()
            .unwrap();
        let AnyRule::Network(NetworkRule::RemoveHeader(rh)) = rule else {
            panic!("expected remove-header network rule");
        };
        assert_eq!(rh.syntax, AdblockSyntax::Ubo);
        assert_eq!(rh.pattern, "example.org");
        assert_eq!(rh.header, "refresh");
        assert!(!rh.exception);
    }

    #[test]
    fn non_cosmetic_lines_pass_through() {
        assert!(parse_cosmetic("||example.com^$script", pos()).unwrap().is_none());
        assert!(parse_cosmetic("plain-pattern", pos()).unwrap().is_none());
    }
}
