//! Scriptlet body grammars: AdGuard `//scriptlet(…)`, uBlock Origin
//! `+js(…)` and Adblock Plus `name arg; name2 arg` snippets.

use crate::ast::{ScriptletBody, ScriptletCall, ScriptletDialect, ScriptletParam, ScriptletParamType};
use crate::parse::{scan, ParseError};

/// Infer the quoting tag of a parameter from its delimiters and strip
/// them.
fn classify_param(raw: &str) -> ScriptletParam {
    if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
        return ScriptletParam {
            param_type: ScriptletParamType::SingleQuoted,
            value: raw[1..raw.len() - 1].to_string(),
        };
    }
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return ScriptletParam {
            param_type: ScriptletParamType::DoubleQuoted,
            value: raw[1..raw.len() - 1].to_string(),
        };
    }
    if scan::is_regex_pattern(raw) {
        return ScriptletParam {
            param_type: ScriptletParamType::Regex,
            value: raw[1..raw.len() - 1].to_string(),
        };
    }
    ScriptletParam {
        param_type: ScriptletParamType::Unquoted,
        value: raw.to_string(),
    }
}

/// Parse a parenthesized call body: arguments split on commas outside
/// quoted and regex spans, each trimmed and classified.
fn parse_call(inner: &str) -> Result<ScriptletCall, ParseError> {
    if inner.trim().is_empty() {
        return Err(ParseError::new("No scriptlet specified"));
    }
    let mut args: Vec<ScriptletParam> = scan::split_outside_strings_and_regex(inner, b',')
        .into_iter()
        .map(|(_, arg)| classify_param(arg.trim()))
        .collect();
    let name = args.remove(0);
    Ok(ScriptletCall { name, params: args })
}

/// Parse an AdGuard scriptlet body: `//scriptlet('name', arg0, …)`.
pub fn parse_adg_scriptlet_body(body: &str) -> Result<ScriptletBody, ParseError> {
    let Some(tail) = body.strip_prefix("//scriptlet") else {
        return Err(ParseError::new("Not an AdGuard scriptlet call"));
    };
    let Some(open_stripped) = tail.strip_prefix('(') else {
        return Err(ParseError::new(
            "Invalid AdGuard scriptlet call, no opening parenthesis",
        ));
    };
    let Some(inner) = open_stripped.strip_suffix(')') else {
        return Err(ParseError::new(
            "Invalid AdGuard scriptlet call, no closing parenthesis",
        ));
    };
    Ok(ScriptletBody {
        dialect: ScriptletDialect::Adg,
        calls: vec![parse_call(inner)?],
    })
}

/// Parse a uBlock Origin scriptlet body: `+js(name, arg0, …)`.
pub fn parse_ubo_scriptlet_body(body: &str) -> Result<ScriptletBody, ParseError> {
    let Some(tail) = body.strip_prefix("+js") else {
        return Err(ParseError::new("Not a uBlock scriptlet call"));
    };
    let Some(open_stripped) = tail.strip_prefix('(') else {
        return Err(ParseError::new(
            "Invalid uBlock scriptlet call, no opening parenthesis",
        ));
    };
    let Some(inner) = open_stripped.strip_suffix(')') else {
        return Err(ParseError::new(
            "Invalid uBlock scriptlet call, no closing parenthesis",
        ));
    };
    Ok(ScriptletBody {
        dialect: ScriptletDialect::Ubo,
        calls: vec![parse_call(inner)?],
    })
}

/// Parse an Adblock Plus snippet body: `name arg0 arg1; name2 …`. The
/// trailing `;` is optional; clauses are split on unescaped `;` outside
/// quotes and regex spans, tokens on unescaped whitespace.
pub fn parse_abp_snippet_body(body: &str) -> Result<ScriptletBody, ParseError> {
    let mut calls = Vec::new();
    for (_, clause) in scan::split_outside_strings_and_regex(body, b';') {
        if clause.trim().is_empty() {
            continue;
        }
        let mut tokens: Vec<ScriptletParam> = scan::split_whitespace_outside_strings_and_regex(clause)
            .into_iter()
            .map(|(_, token)| classify_param(token))
            .collect();
        let name = tokens.remove(0);
        calls.push(ScriptletCall {
            name,
            params: tokens,
        });
    }
    if calls.is_empty() {
        return Err(ParseError::new("No scriptlet specified"));
    }
    Ok(ScriptletBody {
        dialect: ScriptletDialect::Abp,
        calls,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adg_quoted_params() {
        let body = parse_adg_scriptlet_body("//scriptlet('set-constant', 'x', 'false')").unwrap();
        assert_eq!(body.dialect, ScriptletDialect::Adg);
        let call = &body.calls[0];
        assert_eq!(call.name.param_type, ScriptletParamType::SingleQuoted);
        assert_eq!(call.name.value, "set-constant");
        assert_eq!(call.params.len(), 2);
        assert_eq!(call.params[1].value, "false");
        assert_eq!(
            body.generate(),
            "//scriptlet('set-constant', 'x', 'false')"
        );
    }

    #[test]
    fn adg_regex_param_with_comma() {
        let body = parse_adg_scriptlet_body("//scriptlet('prevent-xhr', /a,b/)").unwrap();
        let call = &body.calls[0];
        assert_eq!(call.params.len(), 1);
        assert_eq!(call.params[0].param_type, ScriptletParamType::Regex);
        assert_eq!(call.params[0].value, "a,b");
    }

    #[test]
    fn adg_missing_parens_fail() {
        assert_eq!(
            parse_adg_scriptlet_body("//scriptlet'x'").unwrap_err().message,
            "Invalid AdGuard scriptlet call, no opening parenthesis"
        );
        assert_eq!(
            parse_adg_scriptlet_body("//scriptlet('x'").unwrap_err().message,
            "Invalid AdGuard scriptlet call, no closing parenthesis"
        );
    }

    #[test]
    fn adg_empty_call_fails() {
        assert_eq!(
            parse_adg_scriptlet_body("//scriptlet()").unwrap_err().message,
            "No scriptlet specified"
        );
    }

    #[test]
    fn ubo_unquoted_params() {
        let body = parse_ubo_scriptlet_body("+js(aopr, adsShowing)").unwrap();
        assert_eq!(body.dialect, ScriptletDialect::Ubo);
        let call = &body.calls[0];
        assert_eq!(call.name.param_type, ScriptletParamType::Unquoted);
        assert_eq!(call.name.value, "aopr");
        assert_eq!(call.params[0].value, "adsShowing");
        assert_eq!(body.generate(), "+js(aopr, adsShowing)");
    }

    #[test]
    fn ubo_missing_parens_fail() {
        assert_eq!(
            parse_ubo_scriptlet_body("+js aopr").unwrap_err().message,
            "Invalid uBlock scriptlet call, no opening parenthesis"
        );
    }

    #[test]
    fn abp_single_call() {
        let body = parse_abp_snippet_body("log hello").unwrap();
        assert_eq!(body.dialect, ScriptletDialect::Abp);
        assert_eq!(body.calls.len(), 1);
        assert_eq!(body.calls[0].name.value, "log");
        assert_eq!(body.calls[0].params[0].value, "hello");
    }

    #[test]
    fn abp_chained_calls_and_trailing_semicolon() {
        let body = parse_abp_snippet_body("log hello; hide-if-contains ad div;").unwrap();
        assert_eq!(body.calls.len(), 2);
        assert_eq!(body.calls[1].name.value, "hide-if-contains");
        assert_eq!(body.calls[1].params.len(), 2);
        // Trailing `;` is dropped on generation.
        assert_eq!(body.generate(), "log hello; hide-if-contains ad div");
    }

    #[test]
    fn abp_quoted_argument_keeps_spaces() {
        let body = parse_abp_snippet_body("hide-if-contains 'ad banner' div").unwrap();
        let call = &body.calls[0];
        assert_eq!(call.params.len(), 2);
        assert_eq!(call.params[0].param_type, ScriptletParamType::SingleQuoted);
        assert_eq!(call.params[0].value, "ad banner");
    }

    #[test]
    fn abp_semicolon_inside_quotes_does_not_split() {
        let body = parse_abp_snippet_body("log 'a;b'").unwrap();
        assert_eq!(body.calls.len(), 1);
        assert_eq!(body.calls[0].params[0].value, "a;b");
    }

    #[test]
    fn abp_empty_body_fails() {
        assert_eq!(
            parse_abp_snippet_body("  ").unwrap_err().message,
            "No scriptlet specified"
        );
        assert_eq!(
            parse_abp_snippet_body(";").unwrap_err().message,
            "No scriptlet specified"
        );
    }

    #[test]
    fn classification_of_each_delimiter() {
        assert_eq!(classify_param("plain").param_type, ScriptletParamType::Unquoted);
        assert_eq!(classify_param("'s'").param_type, ScriptletParamType::SingleQuoted);
        assert_eq!(classify_param("\"d\"").param_type, ScriptletParamType::DoubleQuoted);
        assert_eq!(classify_param("/r/").param_type, ScriptletParamType::Regex);
        // A lone quote is not a quoted parameter.
        assert_eq!(classify_param("'").param_type, ScriptletParamType::Unquoted);
    }
}
