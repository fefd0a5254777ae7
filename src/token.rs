//! Tokens and source positions
//!
//! A token is produced once by the lexer and never mutated afterwards. The
//! token sequence of a parse is shared read-only by every rule evaluation.

use std::fmt;

use miette::SourceSpan;
use serde::{Deserialize, Serialize};

// ============================================================================
// TOKEN KIND
// ============================================================================

/// The type tag of a token.
///
/// Grammar authors usually declare a fieldless enum and derive the required
/// traits; any type meeting the bounds qualifies.
///
/// ```rust
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// enum Calc {
///     Number,
///     Plus,
///     Space,
/// }
///
/// fn assert_kind<K: ravel::TokenKind>() {}
/// assert_kind::<Calc>();
/// ```
pub trait TokenKind: Copy + Eq + fmt::Debug + Send + Sync + 'static {}

impl<K> TokenKind for K where K: Copy + Eq + fmt::Debug + Send + Sync + 'static {}

// ============================================================================
// POSITIONS
// ============================================================================

/// A line/column location. Both fields are zero-based; `Display` renders them
/// one-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, col {}", self.line + 1, self.col + 1)
    }
}

/// Start and end of a token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub start: Position,
    pub end: Position,
}

// ============================================================================
// TOKEN
// ============================================================================

/// A classified lexeme with its source position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token<K> {
    pub kind: K,
    pub value: String,
    pub pos: Location,
    /// Byte offset of the lexeme in the source text.
    pub offset: usize,
}

impl<K> Token<K> {
    pub fn new(kind: K, value: impl Into<String>, pos: Location, offset: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            pos,
            offset,
        }
    }

    /// Byte span of the lexeme, for diagnostic labels.
    pub fn span(&self) -> SourceSpan {
        (self.offset, self.value.len()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_displays_one_based() {
        assert_eq!(Position::new(0, 6).to_string(), "line 1, col 7");
    }

    #[test]
    fn span_covers_value_bytes() {
        let token = Token::new('w', "extra", Location::default(), 6);
        assert_eq!(token.span(), SourceSpan::from((6, 5)));
    }

    #[test]
    fn positions_order_by_line_then_col() {
        assert!(Position::new(1, 0) > Position::new(0, 40));
        assert!(Position::new(2, 3) < Position::new(2, 4));
    }
}
