//! Ravel Error Handling
//!
//! Every failure the crate reports is one of the types in this module. They
//! derive `thiserror::Error` for messages and `miette::Diagnostic` for codes,
//! help text and source labels. Wrap any of them in a `miette::Report` and call
//! `with_source_code` to render the offending input.
//!
//! Inside the combinator engine a failure is a [`Failure`]: either an ordinary
//! `Backtrack` that lets an enclosing choice try its next alternative, or a
//! `Cut` that forbids backtracking past the point where it was raised. The
//! parser driver strips that distinction when it surfaces an [`Error`].

use std::fmt;

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::token::{Position, Token};

// ============================================================================
// PARSE ERRORS
// ============================================================================

/// A local failure at some point of the token sequence.
///
/// `position` is `None` when the failure happened at the end of input.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{message}{}", located(.position))]
#[diagnostic(code(ravel::parse))]
pub struct ParseError {
    pub message: String,
    pub position: Option<Position>,
    #[label("here")]
    pub span: Option<SourceSpan>,
}

fn located(position: &Option<Position>) -> String {
    match position {
        Some(position) => format!(" at {position}"),
        None => String::new(),
    }
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: None,
            span: None,
        }
    }

    /// An error located at `token`, or at the end of input when there is none.
    pub fn at<K>(message: impl Into<String>, token: Option<&Token<K>>) -> Self {
        Self {
            message: message.into(),
            position: token.map(|t| t.pos.start),
            span: token.map(Token::span),
        }
    }

    /// Describes the token at `index` as unexpected.
    pub fn unexpected<K>(tokens: &[Token<K>], index: usize) -> Self {
        match tokens.get(index) {
            Some(token) => Self::at(format!("unexpected token '{}'", token.value), Some(token)),
            None => Self::at::<K>("unexpected end of input", None),
        }
    }

    pub fn is_end_of_input(&self) -> bool {
        self.position.is_none()
    }

    /// Whether this error sits strictly further into the input than `other`.
    /// The end of input is further than any token.
    pub fn is_further_than(&self, other: &ParseError) -> bool {
        match (self.position, other.position) {
            (None, Some(_)) => true,
            (Some(mine), Some(theirs)) => mine > theirs,
            _ => false,
        }
    }
}

// ============================================================================
// ENGINE FAILURES
// ============================================================================

/// Outcome of a failed `consume`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum Failure {
    /// Recoverable: the enclosing choice may try another alternative.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Backtrack(ParseError),
    /// Terminal: the grammar has committed to this interpretation.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Cut(ParseError),
}

impl Failure {
    pub fn backtrack(error: ParseError) -> Self {
        Self::Backtrack(error)
    }

    pub fn cut(error: ParseError) -> Self {
        Self::Cut(error)
    }

    pub fn is_cut(&self) -> bool {
        matches!(self, Self::Cut(_))
    }

    pub fn error(&self) -> &ParseError {
        match self {
            Self::Backtrack(error) | Self::Cut(error) => error,
        }
    }

    pub fn into_error(self) -> ParseError {
        match self {
            Self::Backtrack(error) | Self::Cut(error) => error,
        }
    }

    /// Promote to a cut, keeping the underlying error.
    pub fn into_cut(self) -> Self {
        Self::Cut(self.into_error())
    }

    /// Demote to an ordinary failure, keeping the underlying error.
    pub fn into_backtrack(self) -> Self {
        Self::Backtrack(self.into_error())
    }
}

impl From<ParseError> for Failure {
    fn from(error: ParseError) -> Self {
        Self::Backtrack(error)
    }
}

// ============================================================================
// TRANSFORM REJECTION
// ============================================================================

/// Returned by a transform callback to reject a structurally valid match.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct Reject(String);

impl Reject {
    pub fn new(message: impl fmt::Display) -> Self {
        Self(message.to_string())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Reject {
    fn from(message: &str) -> Self {
        Self(message.to_owned())
    }
}

impl From<String> for Reject {
    fn from(message: String) -> Self {
        Self(message)
    }
}

// ============================================================================
// LEXING
// ============================================================================

/// Text that no token pattern matches.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("unexpected token '{text}' at {position}")]
#[diagnostic(code(ravel::lex), help("no token pattern matches this text"))]
pub struct LexError {
    pub text: String,
    pub position: Position,
    #[label("unrecognized")]
    pub span: SourceSpan,
}

// ============================================================================
// TOP-LEVEL ERROR
// ============================================================================

/// Errors surfaced to the caller of the lexer builder and the parser driver.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("invalid pattern for token {kind}")]
    #[diagnostic(code(ravel::pattern))]
    Pattern {
        kind: String,
        #[source]
        source: regex::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error("unexpected token '{found}' at {position}")]
    #[diagnostic(
        code(ravel::trailing_input),
        help("the grammar matched only a prefix of the input")
    )]
    TrailingInput {
        found: String,
        position: Position,
        #[label("unconsumed input starts here")]
        span: SourceSpan,
    },
}

impl From<Failure> for Error {
    fn from(failure: Failure) -> Self {
        Self::Parse(failure.into_error())
    }
}
