//! Error taxonomy shared by rule loading and record classification.

use thiserror::Error;

/// A rule definition could not be turned into a [`crate::Rule`].
///
/// Positions are 1-based, counted in rule-source order.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("rule {position}: unknown bucket '{name}' (expected essential, lifestyle or ignore)")]
    UnknownBucket { position: usize, name: String },

    #[error("rule {position}: invalid pattern '{pattern}'")]
    InvalidPattern {
        position: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// An input record could not be turned into a transaction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("malformed amount '{0}'")]
    MalformedAmount(String),
}
