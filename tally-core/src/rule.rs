//! Buckets and the immutable pattern rules that assign them.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Top-level classification of a transaction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Essential,
    Lifestyle,
    Ignore,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::Essential, Bucket::Lifestyle, Bucket::Ignore];

    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Essential => "essential",
            Bucket::Lifestyle => "lifestyle",
            Bucket::Ignore => "ignore",
        }
    }

    /// Ignored transactions never reach the output.
    pub fn is_ignored(&self) -> bool {
        matches!(self, Bucket::Ignore)
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Bucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "essential" => Ok(Bucket::Essential),
            "lifestyle" => Ok(Bucket::Lifestyle),
            "ignore" => Ok(Bucket::Ignore),
            other => Err(format!("Unknown bucket: '{other}'")),
        }
    }
}

/// Compiled matcher that only accepts matches starting at the first character.
#[derive(Debug, Clone)]
struct Pattern {
    source: String,
    anchored: Regex,
}

impl Pattern {
    fn compile(source: &str) -> Result<Self, regex::Error> {
        // Validate the pattern on its own first, so something like `a)|(b`
        // can't turn into a valid expression once wrapped.
        Regex::new(source)?;
        let anchored = Regex::new(&format!("^(?:{source})"))?;
        Ok(Self {
            source: source.to_string(),
            anchored,
        })
    }
}

/// A pattern plus the classification it assigns.
///
/// The fallback rule carries no pattern and is only ever handed out by
/// [`crate::RuleSet`] after every explicit rule failed to match.
#[derive(Debug, Clone)]
pub struct Rule {
    bucket: Bucket,
    pattern: Option<Pattern>,
    category: String,
    detail: String,
}

impl Rule {
    pub fn new(
        bucket: Bucket,
        pattern: &str,
        category: impl Into<String>,
        detail: impl Into<String>,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            bucket,
            pattern: Some(Pattern::compile(pattern)?),
            category: category.into(),
            detail: detail.into(),
        })
    }

    /// `LIFESTYLE` with empty category and detail.
    pub fn fallback() -> Self {
        Self {
            bucket: Bucket::Lifestyle,
            pattern: None,
            category: String::new(),
            detail: String::new(),
        }
    }

    pub fn bucket(&self) -> Bucket {
        self.bucket
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Pattern as written in the rule source; `None` for the fallback.
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_ref().map(|p| p.source.as_str())
    }

    pub fn is_fallback(&self) -> bool {
        self.pattern.is_none()
    }

    /// Prefix-anchored match against a transaction description.
    pub fn matches(&self, description: &str) -> bool {
        self.pattern
            .as_ref()
            .is_some_and(|p| p.anchored.is_match(description))
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.bucket == other.bucket
            && self.category == other.category
            && self.detail == other.detail
            && self.pattern() == other.pattern()
    }
}

impl Eq for Rule {}
