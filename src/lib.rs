//! Ravel: tokenizers, backtracking parser combinators and a tree fold.
//!
//! The pipeline is `source -> Lexer -> tokens -> root Rule -> AST -> fold`.
//!
//! ```rust
//! use ravel::{Lexer, Parser, Reject};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! enum Kind {
//!     Number,
//!     Comma,
//!     Space,
//! }
//!
//! let lexer = Lexer::builder()
//!     .token(Kind::Number, r"\d+")
//!     .token(Kind::Comma, ",")
//!     .skip(Kind::Space, r"\s+")
//!     .build()?;
//!
//! let parser = Parser::new(lexer, |g| {
//!     let number = g.from_tokens([Kind::Number], |run| run[0].value.parse::<u32>().map_err(Reject::new));
//!     g.list(number, Kind::Comma)
//! });
//!
//! assert_eq!(parser.parse("1, 2, 3")?, vec![1, 2, 3]);
//! # Ok::<(), ravel::Error>(())
//! ```

pub use crate::combinators::{Declared, Grammar, Rule, Sequence};
pub use crate::config::{ErrorPolicy, ParseOptions};
pub use crate::cursor::Cursor;
pub use crate::errors::{Error, Failure, LexError, ParseError, Reject};
pub use crate::fold::{fold, Folded, PathSegment, Reduction, Transformer, Tree};
pub use crate::lexer::{Lexer, LexerBuilder, TokenDef};
pub use crate::parser::Parser;
pub use crate::token::{Location, Position, Token, TokenKind};

pub mod combinators;
pub mod config;
pub mod cursor;
pub mod errors;
pub mod fold;
pub mod lexer;
pub mod parser;
pub mod token;
