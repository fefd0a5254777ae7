//! Combinator engine
//!
//! A grammar is a graph of [`Rule`]s built once through the constructors on
//! [`Grammar`]. Every rule is a pure function of the token sequence and the
//! cursor it is handed: it either advances the cursor and returns a value, or
//! leaves the cursor alone and returns a [`Failure`](crate::Failure).
//!
//! Failures come in two kinds. An ordinary failure lets an enclosing `or` try
//! its next alternative and lets `optional` report absence. A cut means the
//! grammar has committed to the current interpretation: `or` and `rule` pass
//! it straight up, `list` raises one when an item after a delimiter fails,
//! `optional` absorbs it, and `lookahead` turns it back into an ordinary
//! failure.

mod grammar;
mod rule;
mod sequence;

pub use grammar::Grammar;
pub use rule::{Declared, Rule};
pub use sequence::Sequence;
