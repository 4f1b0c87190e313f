//! Dot-chained call encoding predating GraphQL argument syntax:
//! `friends.orderby(importance).first(10)`.
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::InferError;
use crate::ir::{CallArg, CallValue};

static SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9A-Za-z_]+)\((.*?)\)$").expect("legacy segment pattern")
});

/// Decode every segment of `chain`; `key` is the full original key for errors.
pub fn parse_call_chain(key: &str, chain: &str) -> Result<Vec<CallArg>, InferError> {
    // every dot starts a segment, including dots inside an argument list
    chain
        .split('.')
        .map(|segment| {
            let caps = SEGMENT
                .captures(segment)
                .ok_or_else(|| InferError::MalformedKey { key: key.to_string() })?;
            // plain split, no quoting or nesting
            let value = CallValue::from_parts(caps[2].split(','));
            Ok(CallArg::new(&caps[1], value))
        })
        .collect()
}

// ------------------------------- Tests ------------------------------------ //
