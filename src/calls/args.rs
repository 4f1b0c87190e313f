//! Argument-list grammar for modern keys, e.g. `orderby:importance,first:10`.
//!
//! ```text
//! args   := (pair (',' pair)*)?
//! pair   := (ident | string) ':' value
//! value  := scalar | '[' (scalar (',' scalar)*)? ']'
//! scalar := string | number | 'true' | 'false' | ident
//! ```
//!
//! Bare identifiers in value position decode as strings. `null`, objects and
//! nested lists are rejected.
use indexmap::IndexMap;
use serde_json::Number;

use crate::error::ArgumentError;
use crate::ir::CallValue;

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Ident(String),
    Str(String),
    Num(Number),
    Colon,
    Comma,
    LBracket,
    RBracket,
    /// Anything outside the grammar; kept so the parser can name it.
    Other(char),
}

#[derive(Debug, Clone)]
struct Spanned {
    tok: Tok,
    offset: usize,
}

impl Tok {
    fn describe(&self) -> String {
        match self {
            Tok::Ident(s) => s.clone(),
            Tok::Str(s) => serde_json::Value::from(s.as_str()).to_string(),
            Tok::Num(n) => n.to_string(),
            Tok::Colon => ":".into(),
            Tok::Comma => ",".into(),
            Tok::LBracket => "[".into(),
            Tok::RBracket => "]".into(),
            Tok::Other(c) => c.to_string(),
        }
    }
}

// ------------------------------ Tokenizer --------------------------------- //

fn is_ident_start(c: char) -> bool { c.is_ascii_alphabetic() || c == '_' }
fn is_ident_char(c: char) -> bool { c.is_ascii_alphanumeric() || c == '_' }
fn is_number_char(c: char) -> bool { c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E') }

fn tokenize(src: &str) -> Result<Vec<Spanned>, ArgumentError> {
    let mut out = Vec::new();
    let mut chars = src.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        let tok = match c {
            ':' => { chars.next(); Tok::Colon }
            ',' => { chars.next(); Tok::Comma }
            '[' => { chars.next(); Tok::LBracket }
            ']' => { chars.next(); Tok::RBracket }
            '"' => {
                chars.next();
                let mut escaped = false;
                let mut end = None;
                for (i, ch) in chars.by_ref() {
                    if escaped { escaped = false; continue; }
                    match ch {
                        '\\' => escaped = true,
                        '"' => { end = Some(i); break; }
                        _ => {}
                    }
                }
                let end = end.ok_or(ArgumentError::UnterminatedString { offset })?;
                let literal = &src[offset..=end];
                let s = serde_json::from_str::<String>(literal).map_err(|e| {
                    ArgumentError::InvalidLiteral {
                        literal: literal.to_string(),
                        offset,
                        reason: e.to_string(),
                    }
                })?;
                Tok::Str(s)
            }
            c if c.is_ascii_digit() || c == '-' => {
                let mut end = offset;
                while let Some(&(i, ch)) = chars.peek() {
                    if !is_number_char(ch) { break; }
                    end = i + ch.len_utf8();
                    chars.next();
                }
                let literal = &src[offset..end];
                let n = serde_json::from_str::<Number>(literal).map_err(|e| {
                    ArgumentError::InvalidLiteral {
                        literal: literal.to_string(),
                        offset,
                        reason: e.to_string(),
                    }
                })?;
                Tok::Num(n)
            }
            c if is_ident_start(c) => {
                let mut end = offset;
                while let Some(&(i, ch)) = chars.peek() {
                    if !is_ident_char(ch) { break; }
                    end = i + ch.len_utf8();
                    chars.next();
                }
                Tok::Ident(src[offset..end].to_string())
            }
            other => { chars.next(); Tok::Other(other) }
        };
        out.push(Spanned { tok, offset });
    }
    Ok(out)
}

// -------------------------------- Parser ---------------------------------- //

struct Parser {
    toks: Vec<Spanned>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Spanned> { self.toks.get(self.pos) }

    fn next(&mut self, expected: &'static str) -> Result<Spanned, ArgumentError> {
        let tok = self.toks.get(self.pos).cloned().ok_or(ArgumentError::UnexpectedEnd { expected })?;
        self.pos += 1;
        Ok(tok)
    }

    fn unexpected(found: &Spanned, expected: &'static str) -> ArgumentError {
        if is_null_or_object(&found.tok) {
            ArgumentError::Unsupported { found: found.tok.describe(), offset: found.offset }
        } else {
            ArgumentError::Unexpected { found: found.tok.describe(), offset: found.offset, expected }
        }
    }

    fn expect(&mut self, want: Tok, expected: &'static str) -> Result<(), ArgumentError> {
        let found = self.next(expected)?;
        if found.tok == want { Ok(()) } else { Err(Self::unexpected(&found, expected)) }
    }

    fn parse_args(&mut self) -> Result<IndexMap<String, CallValue>, ArgumentError> {
        let mut out = IndexMap::new();
        if self.peek().is_none() {
            return Ok(out);
        }
        loop {
            let name_tok = self.next("an argument name")?;
            let name = match &name_tok.tok {
                Tok::Ident(name) | Tok::Str(name) => name.clone(),
                _ => return Err(Self::unexpected(&name_tok, "an argument name")),
            };
            self.expect(Tok::Colon, "`:` after the argument name")?;
            let value = self.parse_value()?;
            // repeated names keep their first position and last value
            out.insert(name, value);

            match self.peek() {
                None => return Ok(out),
                Some(_) => self.expect(Tok::Comma, "`,` between arguments")?,
            }
        }
    }

    fn parse_value(&mut self) -> Result<CallValue, ArgumentError> {
        let next = self.next("a value")?;
        if next.tok != Tok::LBracket {
            return Self::scalar(&next);
        }
        let mut items = Vec::new();
        if matches!(self.peek(), Some(Spanned { tok: Tok::RBracket, .. })) {
            self.pos += 1;
            return Ok(CallValue::List(items));
        }
        loop {
            let item = self.next("a list item")?;
            items.push(Self::scalar(&item)?);
            let sep = self.next("`,` or `]`")?;
            match sep.tok {
                Tok::Comma => continue,
                Tok::RBracket => return Ok(CallValue::List(items)),
                _ => return Err(Self::unexpected(&sep, "`,` or `]`")),
            }
        }
    }

    fn scalar(tok: &Spanned) -> Result<CallValue, ArgumentError> {
        match &tok.tok {
            Tok::Str(s) => Ok(CallValue::String(s.clone())),
            Tok::Num(n) => Ok(CallValue::Number(n.clone())),
            Tok::Ident(s) if s == "true" => Ok(CallValue::Bool(true)),
            Tok::Ident(s) if s == "false" => Ok(CallValue::Bool(false)),
            Tok::Ident(s) if s != "null" => Ok(CallValue::String(s.clone())),
            // nested lists
            Tok::LBracket => {
                Err(ArgumentError::Unsupported { found: "[".into(), offset: tok.offset })
            }
            _ => Err(Self::unexpected(tok, "a boolean, number or string")),
        }
    }
}

fn is_null_or_object(tok: &Tok) -> bool {
    matches!(tok, Tok::Other('{')) || matches!(tok, Tok::Ident(s) if s == "null")
}

// ------------------------------- Front API -------------------------------- //

/// Decode a raw argument list into ordered `name -> value` pairs.
pub fn parse_arguments(raw: &str) -> Result<IndexMap<String, CallValue>, ArgumentError> {
    let toks = tokenize(raw)?;
    Parser { toks, pos: 0 }.parse_args()
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> CallValue { CallValue::String(v.into()) }

    #[test]
    fn decodes_mixed_scalars_in_order() {
        let args = parse_arguments(r#"orderby:importance,first:10,after:"abc",live:true"#).unwrap();
        let names: Vec<&str> = args.keys().map(String::as_str).collect();
        assert_eq!(names, ["orderby", "first", "after", "live"]);
        assert_eq!(args["orderby"], s("importance"));
        assert_eq!(args["first"], CallValue::Number(10.into()));
        assert_eq!(args["after"], s("abc"));
        assert_eq!(args["live"], CallValue::Bool(true));
    }

    #[test]
    fn decodes_floats_negatives_and_whitespace() {
        let args = parse_arguments(" lat : -37.5 , scale: 1e3 ").unwrap();
        assert_eq!(args["lat"], CallValue::Number(serde_json::Number::from_f64(-37.5).unwrap()));
        assert_eq!(args["scale"], CallValue::Number(serde_json::from_str("1e3").unwrap()));
    }

    #[test]
    fn single_element_list_stays_a_list() {
        let args = parse_arguments(r#"ids:["a"],empty:[],nums:[1, 2]"#).unwrap();
        assert_eq!(args["ids"], CallValue::List(vec![s("a")]));
        assert_eq!(args["empty"], CallValue::List(vec![]));
        assert_eq!(
            args["nums"],
            CallValue::List(vec![CallValue::Number(1.into()), CallValue::Number(2.into())])
        );
    }

    #[test]
    fn string_escapes_are_decoded() {
        let args = parse_arguments(r#"q:"a \"b\", c\n""#).unwrap();
        assert_eq!(args["q"], s("a \"b\", c\n"));
    }

    #[test]
    fn repeated_name_keeps_first_position_last_value() {
        let args = parse_arguments("a:1,b:2,a:3").unwrap();
        let names: Vec<&str> = args.keys().map(String::as_str).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(args["a"], CallValue::Number(3.into()));
    }

    #[test]
    fn empty_input_has_no_arguments() {
        assert!(parse_arguments("  ").unwrap().is_empty());
    }

    #[test]
    fn missing_colon_is_rejected() {
        let err = parse_arguments("orderby=importance").unwrap_err();
        assert!(matches!(err, ArgumentError::Unexpected { ref found, offset: 7, .. } if found == "="));
    }

    #[test]
    fn missing_comma_is_rejected() {
        let err = parse_arguments("first:10 after:2").unwrap_err();
        assert!(matches!(err, ArgumentError::Unexpected { ref found, .. } if found == "after"));
    }

    #[test]
    fn unsupported_values_are_rejected() {
        assert!(matches!(parse_arguments("a:null"), Err(ArgumentError::Unsupported { .. })));
        assert!(matches!(parse_arguments("a:{b:1}"), Err(ArgumentError::Unsupported { .. })));
        assert!(matches!(parse_arguments("a:[[1]]"), Err(ArgumentError::Unsupported { .. })));
    }

    #[test]
    fn unbalanced_punctuation_is_rejected() {
        assert!(matches!(parse_arguments("a:[1,2"), Err(ArgumentError::UnexpectedEnd { .. })));
        assert!(matches!(parse_arguments(r#"a:"open"#), Err(ArgumentError::UnterminatedString { offset: 2 })));
        assert!(matches!(parse_arguments("a:"), Err(ArgumentError::UnexpectedEnd { .. })));
        assert!(matches!(parse_arguments("a:1,"), Err(ArgumentError::UnexpectedEnd { .. })));
    }

    #[test]
    fn malformed_numbers_carry_the_literal() {
        let err = parse_arguments("a:1.2.3").unwrap_err();
        assert!(matches!(err, ArgumentError::InvalidLiteral { ref literal, .. } if literal == "1.2.3"));
    }
}
