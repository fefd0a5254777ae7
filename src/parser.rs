//! Parser driver
//!
//! Wires a [`Lexer`] and the root [`Rule`] of a grammar into a single
//! `parse(source)` call that insists on consuming every token.

use crate::combinators::{Grammar, Rule};
use crate::config::ParseOptions;
use crate::cursor::Cursor;
use crate::errors::Error;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

/// A lexer paired with a grammar root.
///
/// The grammar is built once in [`Parser::new`]; the parser is `Send + Sync`
/// and can run any number of parses, from any number of threads.
#[derive(Debug)]
pub struct Parser<K, T> {
    lexer: Lexer<K>,
    root: Rule<K, T>,
}

impl<K: Clone, T> Clone for Parser<K, T> {
    fn clone(&self) -> Self {
        Self {
            lexer: self.lexer.clone(),
            root: self.root.clone(),
        }
    }
}

impl<K: TokenKind, T: 'static> Parser<K, T> {
    pub fn new<G>(lexer: Lexer<K>, grammar: G) -> Self
    where
        G: FnOnce(&Grammar<K>) -> Rule<K, T>,
    {
        Self::with_options(lexer, ParseOptions::default(), grammar)
    }

    pub fn with_options<G>(lexer: Lexer<K>, options: ParseOptions, grammar: G) -> Self
    where
        G: FnOnce(&Grammar<K>) -> Rule<K, T>,
    {
        let root = grammar(&Grammar::with_options(options));
        Self { lexer, root }
    }

    pub fn lexer(&self) -> &Lexer<K> {
        &self.lexer
    }

    pub fn root(&self) -> &Rule<K, T> {
        &self.root
    }

    pub fn tokens(&self, source: &str) -> Result<Vec<Token<K>>, Error> {
        Ok(self.lexer.tokenize(source)?)
    }

    /// Tokenizes `source` and runs the root rule over all of it.
    pub fn parse(&self, source: &str) -> Result<T, Error> {
        let tokens = self.tokens(source)?;
        log::debug!("parsing {} tokens", tokens.len());

        let mut cursor = Cursor::default();
        let value = self.root.consume(&tokens, &mut cursor)?;

        if let Some(token) = tokens.get(cursor.position()) {
            log::debug!("root matched {} of {} tokens", cursor.position(), tokens.len());
            return Err(Error::TrailingInput {
                found: token.value.clone(),
                position: token.pos.start,
                span: token.span(),
            });
        }

        Ok(value)
    }
}
