use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::cursor::Cursor;
use crate::errors::{Failure, ParseError};
use crate::token::{Token, TokenKind};

type ConsumeFn<K, T> = dyn Fn(&[Token<K>], &mut Cursor) -> Result<T, Failure> + Send + Sync;

// ============================================================================
// RULE
// ============================================================================

/// A composable parsing unit.
///
/// A rule is an immutable, cheaply clonable handle; clones share the same
/// definition. `consume` either returns a value and leaves the cursor past the
/// tokens it used, or returns a [`Failure`] and leaves the cursor where it was.
pub struct Rule<K, T> {
    name: Option<Arc<str>>,
    body: Arc<ConsumeFn<K, T>>,
}

impl<K, T> Clone for Rule<K, T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            body: Arc::clone(&self.body),
        }
    }
}

impl<K, T> fmt::Debug for Rule<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name.as_deref().unwrap_or("<anonymous>"))
            .finish_non_exhaustive()
    }
}

impl<K: TokenKind, T: 'static> Rule<K, T> {
    /// Wraps a raw consume function. The function must leave `cursor`
    /// untouched when it fails.
    pub fn new<F>(consume: F) -> Self
    where
        F: Fn(&[Token<K>], &mut Cursor) -> Result<T, Failure> + Send + Sync + 'static,
    {
        Self {
            name: None,
            body: Arc::new(consume),
        }
    }

    pub fn consume(&self, tokens: &[Token<K>], cursor: &mut Cursor) -> Result<T, Failure> {
        let Some(name) = &self.name else {
            return (self.body)(tokens, cursor);
        };

        let entry = cursor.position();
        log::trace!("{name}: trying at token {entry}");
        match (self.body)(tokens, cursor) {
            Ok(value) => {
                log::trace!("{name}: matched tokens {entry}..{}", cursor.position());
                Ok(value)
            }
            Err(Failure::Backtrack(error)) if failed_on_entry(&error, tokens, entry) => {
                log::trace!("{name}: no match at token {entry}");
                Err(Failure::Backtrack(expected(name, tokens, entry)))
            }
            Err(failure) => {
                log::trace!("{name}: failed (cut: {}): {failure}", failure.is_cut());
                Err(failure)
            }
        }
    }

    /// Attaches a name. A named rule that fails without getting past its
    /// first token reports `expected <name>` instead of its inner error.
    pub fn named(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Converts the output of a successful match.
    pub fn map<U, F>(self, f: F) -> Rule<K, U>
    where
        U: 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        Rule::new(move |tokens, cursor| self.consume(tokens, cursor).map(&f))
    }
}

fn failed_on_entry<K>(error: &ParseError, tokens: &[Token<K>], entry: usize) -> bool {
    error.position == tokens.get(entry).map(|token| token.pos.start)
}

fn expected<K>(name: &str, tokens: &[Token<K>], entry: usize) -> ParseError {
    match tokens.get(entry) {
        Some(token) => ParseError::at(format!("expected {name}, found '{}'", token.value), Some(token)),
        None => ParseError::at::<K>(format!("expected {name}, found end of input"), None),
    }
}

// ============================================================================
// FORWARD DECLARATIONS
// ============================================================================

/// A rule that can be referenced before it is defined.
///
/// Hand out references with [`Declared::rule`], build the rules that use them,
/// then close the loop with [`Declared::define`]. Consuming a declaration that
/// was never defined fails with a cut.
pub struct Declared<K, T> {
    slot: Arc<OnceCell<Rule<K, T>>>,
    handle: Rule<K, T>,
}

impl<K: TokenKind, T: 'static> Default for Declared<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: TokenKind, T: 'static> Declared<K, T> {
    pub fn new() -> Self {
        let slot: Arc<OnceCell<Rule<K, T>>> = Arc::new(OnceCell::new());
        let target = Arc::clone(&slot);
        let handle = Rule::new(move |tokens, cursor| match target.get() {
            Some(rule) => rule.consume(tokens, cursor),
            None => Err(Failure::cut(ParseError::at(
                "rule used before it was defined",
                tokens.get(cursor.position()),
            ))),
        });
        Self { slot, handle }
    }

    /// A reference to the rule being declared.
    pub fn rule(&self) -> Rule<K, T> {
        self.handle.clone()
    }

    /// Supplies the definition and returns the finished rule.
    pub fn define(self, rule: Rule<K, T>) -> Rule<K, T> {
        // The slot is private to this declaration, which is consumed here.
        let _ = self.slot.set(rule);
        self.handle
    }
}

impl<K, T> fmt::Debug for Declared<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Declared")
            .field("defined", &self.slot.get().is_some())
            .finish()
    }
}
