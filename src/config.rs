//! Parser configuration
//!
//! Options are captured by the [`Grammar`](crate::Grammar) handle when a
//! grammar is built, so they apply to every parse run with that grammar.
//! They deserialize from any serde format, which lets a host application keep
//! them in its own configuration file.

use serde::{Deserialize, Serialize};

/// Which error an ordered choice reports when every alternative fails
/// without a cut.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Describe the unmatched token at the position where the choice started.
    #[default]
    Entry,
    /// Report the alternative failure that got furthest into the input.
    Furthest,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ParseOptions {
    pub error_policy: ErrorPolicy,
}

impl ParseOptions {
    pub fn with_error_policy(mut self, error_policy: ErrorPolicy) -> Self {
        self.error_policy = error_policy;
        self
    }
}
