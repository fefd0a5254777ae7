//! Lexer builder
//!
//! Compiles an ordered list of `kind -> pattern` definitions into a tokenizer.
//! All patterns are joined into one alternation, each wrapped in its own named
//! group, so at any input position the first-declared pattern that matches
//! wins and the group that participated tells which kind it was.

use regex::{Captures, Regex};

use crate::errors::{Error, LexError};
use crate::token::{Location, Position, Token, TokenKind};

const GROUP_PREFIX: &str = "ravel_kind_";

// ============================================================================
// DEFINITIONS
// ============================================================================

/// A token pattern and whether matching text is dropped from the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDef {
    pub pattern: String,
    pub skip: bool,
}

impl TokenDef {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            skip: false,
        }
    }

    /// A pattern whose matches advance line/column but produce no token.
    pub fn skipped(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            skip: true,
        }
    }
}

impl From<&str> for TokenDef {
    fn from(pattern: &str) -> Self {
        Self::new(pattern)
    }
}

impl From<String> for TokenDef {
    fn from(pattern: String) -> Self {
        Self::new(pattern)
    }
}

/// Collects definitions in declaration order.
#[derive(Debug, Clone)]
pub struct LexerBuilder<K> {
    defs: Vec<(K, TokenDef)>,
}

impl<K: TokenKind> Default for LexerBuilder<K> {
    fn default() -> Self {
        Self { defs: Vec::new() }
    }
}

impl<K: TokenKind> LexerBuilder<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(mut self, kind: K, def: impl Into<TokenDef>) -> Self {
        self.defs.push((kind, def.into()));
        self
    }

    pub fn token(self, kind: K, pattern: impl Into<String>) -> Self {
        self.define(kind, TokenDef::new(pattern))
    }

    pub fn skip(self, kind: K, pattern: impl Into<String>) -> Self {
        self.define(kind, TokenDef::skipped(pattern))
    }

    pub fn build(self) -> Result<Lexer<K>, Error> {
        let mut alternatives = Vec::with_capacity(self.defs.len());
        let mut classes = Vec::with_capacity(self.defs.len());

        for (index, (kind, def)) in self.defs.into_iter().enumerate() {
            // Compiled alone so a bad pattern is reported against its kind.
            let pattern = Regex::new(&def.pattern).map_err(|source| Error::Pattern {
                kind: format!("{kind:?}"),
                source,
            })?;
            let group = format!("{GROUP_PREFIX}{index}");
            alternatives.push(format!("(?P<{group}>{})", def.pattern));
            classes.push(Class {
                kind,
                group,
                pattern,
                skip: def.skip,
            });
        }

        let splitter = Regex::new(&alternatives.join("|")).map_err(|source| Error::Pattern {
            kind: "<alternation>".to_owned(),
            source,
        })?;

        log::debug!("lexer built with {} token definitions", classes.len());
        Ok(Lexer { splitter, classes })
    }
}

// ============================================================================
// LEXER
// ============================================================================

#[derive(Debug, Clone)]
struct Class<K> {
    kind: K,
    group: String,
    pattern: Regex,
    skip: bool,
}

/// A compiled tokenizer. Holds no state between calls.
#[derive(Debug, Clone)]
pub struct Lexer<K> {
    splitter: Regex,
    classes: Vec<Class<K>>,
}

impl<K: TokenKind> Lexer<K> {
    pub fn builder() -> LexerBuilder<K> {
        LexerBuilder::new()
    }

    /// Builds a lexer from `(kind, definition)` pairs in declaration order.
    pub fn new<D>(defs: impl IntoIterator<Item = (K, D)>) -> Result<Self, Error>
    where
        D: Into<TokenDef>,
    {
        defs.into_iter()
            .fold(LexerBuilder::new(), |builder, (kind, def)| builder.define(kind, def))
            .build()
    }

    /// Splits `source` into tokens, dropping skipped kinds.
    pub fn tokenize(&self, source: &str) -> Result<Vec<Token<K>>, LexError> {
        let mut tokens = Vec::new();
        let mut offset = 0;
        let mut here = Position::default();

        while offset < source.len() {
            let Some((class, end)) = self.match_at(source, offset) else {
                return Err(self.unmatched(source, offset, here));
            };

            let value = &source[offset..end];
            let start = here;
            here = advance(here, value);
            log::trace!("lexed {:?} {value:?} at {start}", class.kind);

            if !class.skip {
                tokens.push(Token::new(class.kind, value, Location { start, end: here }, offset));
            }
            offset = end;
        }

        Ok(tokens)
    }

    /// The first declared class with a non-empty match starting at `offset`.
    fn match_at(&self, source: &str, offset: usize) -> Option<(&Class<K>, usize)> {
        let captures = self.splitter.captures_at(source, offset)?;
        let whole = captures.get(0)?;
        if whole.start() != offset {
            return None;
        }
        if !whole.is_empty() {
            let class = self.classify(&captures)?;
            return Some((class, whole.end()));
        }

        // An earlier class matched the empty string and shadowed the rest.
        self.classes.iter().find_map(|class| {
            let found = class.pattern.find_at(source, offset)?;
            (found.start() == offset && !found.is_empty()).then_some((class, found.end()))
        })
    }

    fn classify(&self, captures: &Captures<'_>) -> Option<&Class<K>> {
        self.classes
            .iter()
            .find(|class| captures.name(&class.group).is_some())
    }

    /// The offending chunk runs up to the next place a token could start.
    fn unmatched(&self, source: &str, offset: usize, position: Position) -> LexError {
        let mut stop = next_boundary(source, offset);
        while stop < source.len() && self.match_at(source, stop).is_none() {
            stop = next_boundary(source, stop);
        }

        let text = &source[offset..stop];
        LexError {
            text: text.to_owned(),
            position,
            span: (offset, text.len()).into(),
        }
    }
}

fn next_boundary(source: &str, offset: usize) -> usize {
    source[offset..]
        .chars()
        .next()
        .map_or(source.len(), |c| offset + c.len_utf8())
}

/// Position after consuming `text` from `here`.
fn advance(mut here: Position, text: &str) -> Position {
    match text.rfind('\n') {
        Some(last) => {
            here.line += text.matches('\n').count();
            here.col = text[last + 1..].chars().count();
        }
        None => here.col += text.chars().count(),
    }
    here
}
