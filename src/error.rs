use thiserror::Error;

/// Failure to decode a modern argument list, e.g. `orderby:importance,first:10`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: &'static str },
    #[error("unexpected `{found}` at offset {offset}, expected {expected}")]
    Unexpected { found: String, offset: usize, expected: &'static str },
    #[error("unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },
    #[error("invalid literal `{literal}` at offset {offset}: {reason}")]
    InvalidLiteral { literal: String, offset: usize, reason: String },
    #[error("unsupported value `{found}` at offset {offset}; only booleans, strings, numbers and arrays of those are supported")]
    Unsupported { found: String, offset: usize },
}

/// Fatal inference failures. Either one aborts the whole inference call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferError {
    #[error("malformed data key, `{key}`")]
    MalformedKey { key: String },
    #[error(
        "malformed or unsupported data key, `{key}`. Only booleans, strings, and numbers \
         are currently supported, and commas are required. Parse failure reason was `{reason}`"
    )]
    MalformedArguments {
        key: String,
        #[source]
        reason: ArgumentError,
    },
}

impl InferError {
    pub fn key(&self) -> &str {
        match self {
            InferError::MalformedKey { key } | InferError::MalformedArguments { key, .. } => key,
        }
    }
}
