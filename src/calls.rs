//! Field-key call syntax.
//!
//! Data keys carry the arguments they were fetched with, in one of two
//! encodings:
//! - modern: `friends(orderby:importance,first:10)`
//! - legacy: `friends.orderby(importance).first(10)` (deprecated, warns)
//!
//! Both normalize to a bare field name plus ordered calls.
pub mod args;
pub mod legacy;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::InferError;
use crate::ir::CallArg;

pub use args::parse_arguments;

static MODERN_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9A-Za-z_]+)(?:\((.+?)\))?$").expect("modern key pattern")
});

static LEGACY_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9A-Za-z_]+(?:\.[0-9A-Za-z_]+\(.*?\))+$").expect("legacy key pattern")
});

// ------------------------------ Classify ---------------------------------- //

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyForm<'a> {
    /// `name`
    Bare(&'a str),
    /// `name(args)`; `args` is the raw text between the parentheses.
    Modern { name: &'a str, args: &'a str },
    /// `name.call(a).call(b)`; `chain` is everything after the first dot.
    Legacy { name: &'a str, chain: &'a str },
    Malformed,
}

pub fn classify_key(key: &str) -> KeyForm<'_> {
    if LEGACY_KEY.is_match(key) {
        // the pattern guarantees a dot
        if let Some((name, chain)) = key.split_once('.') {
            return KeyForm::Legacy { name, chain };
        }
    }
    match MODERN_KEY.captures(key) {
        None => KeyForm::Malformed,
        Some(caps) => {
            let name = caps.get(1).map_or("", |m| m.as_str());
            match caps.get(2) {
                None => KeyForm::Bare(name),
                Some(args) => KeyForm::Modern { name, args: args.as_str() },
            }
        }
    }
}

// ------------------------------- Decode ----------------------------------- //

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedKey {
    pub name: String,
    pub calls: Option<Vec<CallArg>>,
}

/// Split a raw data key into its field name and calls.
pub fn parse_field_key(key: &str) -> Result<ParsedKey, InferError> {
    match classify_key(key) {
        KeyForm::Bare(name) => Ok(ParsedKey { name: name.to_string(), calls: None }),
        KeyForm::Legacy { name, chain } => {
            tracing::warn!(
                key,
                "encountered a deprecated field call string; use GraphQL argument syntax"
            );
            let calls = legacy::parse_call_chain(key, chain)?;
            Ok(ParsedKey { name: name.to_string(), calls: Some(calls) })
        }
        KeyForm::Modern { name, args } => {
            let args = parse_arguments(args).map_err(|reason| InferError::MalformedArguments {
                key: key.to_string(),
                reason,
            })?;
            let calls = args
                .into_iter()
                .map(|(name, value)| CallArg { name, value })
                .collect();
            Ok(ParsedKey { name: name.to_string(), calls: Some(calls) })
        }
        KeyForm::Malformed => Err(InferError::MalformedKey { key: key.to_string() }),
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::CallValue;
    use tracing_test::traced_test;

    fn s(v: &str) -> CallValue { CallValue::String(v.into()) }

    #[test]
    fn classifies_each_dialect() {
        assert_eq!(classify_key("friends"), KeyForm::Bare("friends"));
        assert_eq!(
            classify_key("friends(first:10)"),
            KeyForm::Modern { name: "friends", args: "first:10" }
        );
        assert_eq!(
            classify_key("friends.first(10)"),
            KeyForm::Legacy { name: "friends", chain: "first(10)" }
        );
        assert_eq!(classify_key("friends.badsegment"), KeyForm::Malformed);
        assert_eq!(classify_key("friends()"), KeyForm::Malformed);
        assert_eq!(classify_key(""), KeyForm::Malformed);
    }

    #[test]
    fn bare_key_has_no_calls() {
        let parsed = parse_field_key("friends").unwrap();
        assert_eq!(parsed, ParsedKey { name: "friends".into(), calls: None });
    }

    #[traced_test]
    #[test]
    fn legacy_key_decodes_and_warns() {
        let parsed = parse_field_key("friends.orderby(importance).first(10)").unwrap();
        assert_eq!(parsed.name, "friends");
        assert_eq!(
            parsed.calls.unwrap(),
            vec![CallArg::new("orderby", s("importance")), CallArg::new("first", s("10"))]
        );
        assert!(logs_contain("deprecated field call string"));
    }

    #[traced_test]
    #[test]
    fn modern_key_does_not_warn() {
        let parsed = parse_field_key("friends(orderby:importance,first:10)").unwrap();
        assert_eq!(
            parsed.calls.unwrap(),
            vec![
                CallArg::new("orderby", s("importance")),
                CallArg::new("first", CallValue::Number(10.into())),
            ]
        );
        assert!(!logs_contain("deprecated field call string"));
    }

    #[test]
    fn legacy_multi_value_call_is_a_list() {
        let parsed = parse_field_key("photos.range(1,2)").unwrap();
        assert_eq!(parsed.calls.unwrap()[0].value, CallValue::List(vec![s("1"), s("2")]));
    }

    #[test]
    fn malformed_keys_are_fatal() {
        assert_eq!(
            parse_field_key("friends.badsegment").unwrap_err(),
            InferError::MalformedKey { key: "friends.badsegment".into() }
        );
        assert_eq!(
            parse_field_key("friends-list").unwrap_err(),
            InferError::MalformedKey { key: "friends-list".into() }
        );
    }

    #[test]
    fn malformed_arguments_carry_key_and_reason() {
        let err = parse_field_key("friends(orderby=importance)").unwrap_err();
        match &err {
            InferError::MalformedArguments { key, reason } => {
                assert_eq!(key, "friends(orderby=importance)");
                assert!(reason.to_string().contains("`=`"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        let message = err.to_string();
        assert!(message.contains("friends(orderby=importance)"));
        assert!(message.contains("Parse failure reason was"));
    }

    #[test]
    fn legacy_key_with_dotted_argument_is_malformed() {
        assert_eq!(
            parse_field_key("friends.first(1.5)").unwrap_err(),
            InferError::MalformedKey { key: "friends.first(1.5)".into() }
        );
    }

    #[test]
    fn whitespace_only_arguments_are_empty_calls() {
        let parsed = parse_field_key("friends( )").unwrap();
        assert_eq!(parsed.calls, Some(vec![]));
    }
}
