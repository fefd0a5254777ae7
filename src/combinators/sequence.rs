use crate::combinators::Rule;
use crate::cursor::Cursor;
use crate::errors::Failure;
use crate::token::{Token, TokenKind};

/// An ordered group of sub-rules evaluated one after another.
///
/// Implemented for vectors and arrays of same-typed rules, which yield a
/// `Vec`, and for tuples of up to eight rules with differing outputs, which
/// yield a tuple. Evaluation stops at the first failing sub-rule and returns
/// its failure unchanged.
pub trait Sequence<K>: Send + Sync + 'static {
    type Output;

    fn consume_all(&self, tokens: &[Token<K>], cursor: &mut Cursor) -> Result<Self::Output, Failure>;
}

impl<K: TokenKind, T: 'static> Sequence<K> for Vec<Rule<K, T>> {
    type Output = Vec<T>;

    fn consume_all(&self, tokens: &[Token<K>], cursor: &mut Cursor) -> Result<Vec<T>, Failure> {
        self.iter().map(|rule| rule.consume(tokens, cursor)).collect()
    }
}

impl<K: TokenKind, T: 'static, const N: usize> Sequence<K> for [Rule<K, T>; N] {
    type Output = Vec<T>;

    fn consume_all(&self, tokens: &[Token<K>], cursor: &mut Cursor) -> Result<Vec<T>, Failure> {
        self.iter().map(|rule| rule.consume(tokens, cursor)).collect()
    }
}

macro_rules! impl_sequence_for_tuple {
    ($($rule:ident: $out:ident),+) => {
        impl<K: TokenKind, $($out: 'static),+> Sequence<K> for ($(Rule<K, $out>,)+) {
            type Output = ($($out,)+);

            fn consume_all(&self, tokens: &[Token<K>], cursor: &mut Cursor) -> Result<Self::Output, Failure> {
                let ($($rule,)+) = self;
                Ok(($($rule.consume(tokens, cursor)?,)+))
            }
        }
    };
}

impl_sequence_for_tuple!(a: A);
impl_sequence_for_tuple!(a: A, b: B);
impl_sequence_for_tuple!(a: A, b: B, c: C);
impl_sequence_for_tuple!(a: A, b: B, c: C, d: D);
impl_sequence_for_tuple!(a: A, b: B, c: C, d: D, e: E);
impl_sequence_for_tuple!(a: A, b: B, c: C, d: D, e: E, f: F);
impl_sequence_for_tuple!(a: A, b: B, c: C, d: D, e: E, f: F, g: G);
impl_sequence_for_tuple!(a: A, b: B, c: C, d: D, e: E, f: F, g: G, h: H);
