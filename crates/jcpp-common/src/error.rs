//! Fatal translation errors.
//!
//! Every variant describes malformed input: the current method body cannot
//! be translated and the batch driver moves on to the next file. Input that
//! is merely incomplete is never an error, frames report it by asking for
//! more text.

use crate::span::Span;
use thiserror::Error;

pub type TranslateResult<T> = Result<T, TranslateError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("unbalanced `{bracket}` at offset {offset} in `{text}`")]
    UnbalancedBracket {
        bracket: char,
        offset: usize,
        text: String,
    },

    #[error("operator `{operator}` produced span {found} outside of requested range {requested}")]
    SpanEscape {
        operator: &'static str,
        requested: Span,
        found: Span,
    },

    #[error("`{keyword}` is missing its {clause}")]
    MissingClause {
        keyword: &'static str,
        clause: &'static str,
    },

    #[error("unexpected `{token}` {context}")]
    UnexpectedToken {
        token: String,
        context: &'static str,
    },

    #[error("input ended inside an unfinished construct: `{leftover}`")]
    UnterminatedInput { leftover: String },

    #[error("malformed declaration `{text}`")]
    MalformedDeclaration { text: String },

    #[error("resolver made no progress on `{text}`")]
    ResolveStalled { text: String },
}

impl TranslateError {
    /// Short machine-friendly name used in logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            TranslateError::UnbalancedBracket { .. } => "unbalanced-bracket",
            TranslateError::SpanEscape { .. } => "span-escape",
            TranslateError::MissingClause { .. } => "missing-clause",
            TranslateError::UnexpectedToken { .. } => "unexpected-token",
            TranslateError::UnterminatedInput { .. } => "unterminated-input",
            TranslateError::MalformedDeclaration { .. } => "malformed-declaration",
            TranslateError::ResolveStalled { .. } => "resolve-stalled",
        }
    }

    /// All translation errors abort the current file.
    pub const fn is_fatal(&self) -> bool {
        true
    }
}
