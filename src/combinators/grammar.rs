use std::marker::PhantomData;

use crate::combinators::{Declared, Rule, Sequence};
use crate::config::{ErrorPolicy, ParseOptions};
use crate::errors::{Failure, ParseError, Reject};
use crate::token::{Token, TokenKind};

/// The combinator constructors handed to a grammar definition.
///
/// Constructors run once, when the grammar is built. The rules they return
/// hold no per-parse state and can be reused for any number of parses.
#[derive(Debug, Clone)]
pub struct Grammar<K> {
    options: ParseOptions,
    kind: PhantomData<fn() -> K>,
}

impl<K: TokenKind> Default for Grammar<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: TokenKind> Grammar<K> {
    pub fn new() -> Self {
        Self::with_options(ParseOptions::default())
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            options,
            kind: PhantomData,
        }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Matches exactly the token kinds in `kinds`, in order, and builds a value
    /// from the matched tokens.
    ///
    /// A [`Reject`] from `transform` fails the match at the first of those
    /// tokens without consuming any of them.
    pub fn from_tokens<T, F>(&self, kinds: impl IntoIterator<Item = K>, transform: F) -> Rule<K, T>
    where
        T: 'static,
        F: Fn(&[Token<K>]) -> Result<T, Reject> + Send + Sync + 'static,
    {
        let kinds: Vec<K> = kinds.into_iter().collect();
        Rule::new(move |tokens, cursor| {
            let start = cursor.position();
            let run = tokens
                .get(start..start + kinds.len())
                .filter(|run| run.iter().zip(&kinds).all(|(token, kind)| token.kind == *kind));
            let Some(run) = run else {
                return Err(Failure::backtrack(mismatch(tokens, start, kinds.len())));
            };

            let value = transform(run).map_err(|reject| ParseError::at(reject.message(), tokens.get(start)))?;
            cursor.advance(kinds.len());
            Ok(value)
        })
    }

    /// Matches a single token of `kind` and returns it.
    pub fn token(&self, kind: K) -> Rule<K, Token<K>> {
        self.from_tokens([kind], |run| Ok(run[0].clone()))
    }

    /// Sequence with a transform.
    ///
    /// `get_sub_rules` receives a reference to the rule being built, so the
    /// sequence may refer to itself. The outer cursor only moves when every
    /// sub-rule matched and `transform` accepted their values; a rejection is
    /// reported at the token following the last matched sub-rule.
    pub fn rule<S, T, G, F>(&self, get_sub_rules: G, transform: F) -> Rule<K, T>
    where
        S: Sequence<K>,
        T: 'static,
        G: FnOnce(&Rule<K, T>) -> S,
        F: Fn(S::Output) -> Result<T, Reject> + Send + Sync + 'static,
    {
        let declared = Declared::new();
        let sub_rules = get_sub_rules(&declared.rule());
        declared.define(Rule::new(move |tokens, cursor| {
            let mut local = cursor.fork();
            let values = sub_rules.consume_all(tokens, &mut local)?;
            let value = transform(values)
                .map_err(|reject| ParseError::at(reject.message(), tokens.get(local.position())))?;
            cursor.commit(local);
            Ok(value)
        }))
    }

    /// Ordered choice. The first alternative that matches wins; a cut from
    /// any alternative ends the search immediately.
    pub fn or<T, G>(&self, get_sub_rules: G) -> Rule<K, T>
    where
        T: 'static,
        G: FnOnce(&Rule<K, T>) -> Vec<Rule<K, T>>,
    {
        let policy = self.options.error_policy;
        let declared = Declared::new();
        let alternatives = get_sub_rules(&declared.rule());
        declared.define(Rule::new(move |tokens, cursor| {
            let mut furthest: Option<ParseError> = None;

            for (index, alternative) in alternatives.iter().enumerate() {
                let mut local = cursor.fork();
                match alternative.consume(tokens, &mut local) {
                    Ok(value) => {
                        cursor.commit(local);
                        return Ok(value);
                    }
                    Err(failure @ Failure::Cut(_)) => {
                        log::trace!("alternative {index} committed and failed: {failure}");
                        return Err(failure);
                    }
                    Err(Failure::Backtrack(error)) => {
                        log::trace!("alternative {index} failed, backtracking: {error}");
                        if furthest.as_ref().map_or(true, |best| error.is_further_than(best)) {
                            furthest = Some(error);
                        }
                    }
                }
            }

            let error = match (policy, furthest) {
                (ErrorPolicy::Furthest, Some(error)) => error,
                _ => ParseError::unexpected(tokens, cursor.position()),
            };
            Err(Failure::backtrack(error))
        }))
    }

    /// Matches `sub_rule` or nothing. Every failure, including a cut, is
    /// absorbed as `None`.
    pub fn optional<T: 'static>(&self, sub_rule: Rule<K, T>) -> Rule<K, Option<T>> {
        Rule::new(move |tokens, cursor| {
            let mut local = cursor.fork();
            match sub_rule.consume(tokens, &mut local) {
                Ok(value) => {
                    cursor.commit(local);
                    Ok(Some(value))
                }
                Err(failure) => {
                    if failure.is_cut() {
                        log::trace!("optional absorbed a cut: {failure}");
                    }
                    Ok(None)
                }
            }
        })
    }

    /// Tests `sub_rule` without consuming anything. A cut comes back as an
    /// ordinary failure.
    pub fn lookahead<T: 'static>(&self, sub_rule: Rule<K, T>) -> Rule<K, T> {
        Rule::new(move |tokens, cursor| {
            sub_rule
                .consume(tokens, &mut cursor.fork())
                .map_err(Failure::into_backtrack)
        })
    }

    /// One or more `item`s separated by `delimiter` tokens.
    ///
    /// Once an item has matched, a failing item after a delimiter is promoted
    /// to a cut. Wrap in [`Grammar::optional`] to accept an empty list.
    pub fn list<T: 'static>(&self, item: Rule<K, T>, delimiter: K) -> Rule<K, Vec<T>> {
        Rule::new(move |tokens, cursor| {
            let mut local = cursor.fork();
            let mut values = Vec::new();

            loop {
                match item.consume(tokens, &mut local) {
                    Ok(value) => values.push(value),
                    Err(failure) if values.is_empty() => return Err(failure),
                    Err(failure) => {
                        log::trace!("list item {} failed after {delimiter:?}: {failure}", values.len());
                        return Err(failure.into_cut());
                    }
                }
                match tokens.get(local.position()) {
                    Some(token) if token.kind == delimiter => local.advance(1),
                    _ => break,
                }
            }

            cursor.commit(local);
            Ok(values)
        })
    }

    /// Commits to `sub_rule`: any failure it reports becomes a cut.
    pub fn cut<T: 'static>(&self, sub_rule: Rule<K, T>) -> Rule<K, T> {
        Rule::new(move |tokens, cursor| sub_rule.consume(tokens, cursor).map_err(Failure::into_cut))
    }

    /// A forward reference for mutually recursive rules.
    pub fn declare<T: 'static>(&self) -> Declared<K, T> {
        Declared::new()
    }
}

fn mismatch<K>(tokens: &[Token<K>], start: usize, len: usize) -> ParseError {
    let Some(first) = tokens.get(start) else {
        return ParseError::at::<K>("unexpected end of input", None);
    };
    let end = (start + len).min(tokens.len());
    let text: String = tokens[start..end].iter().map(|token| token.value.as_str()).collect();
    ParseError::at(format!("unable to parse '{text}'"), Some(first))
}
