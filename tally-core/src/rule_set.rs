//! Ordered rule set: first match wins, fallback last.
//!
//! Position in the rule source is the only tie-breaker. A broad pattern placed
//! early shadows every narrower one after it, so rule authors put specific
//! patterns first.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ConfigurationError;
use crate::rule::{Bucket, Rule};

/// One unvalidated row of a rule source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDef {
    #[serde(rename = "top", alias = "bucket")]
    pub bucket: String,
    #[serde(rename = "rule", alias = "pattern")]
    pub pattern: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub detail: String,
}

impl RuleDef {
    pub fn new(bucket: &str, pattern: &str, category: &str, detail: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            pattern: pattern.to_string(),
            category: category.to_string(),
            detail: detail.to_string(),
        }
    }
}

/// Which rule classified a description.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Explanation<'a> {
    /// 0-based position of the winning explicit rule; `None` means fallback.
    pub position: Option<usize>,
    pub rule: &'a Rule,
}

#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
    fallback: Rule,
}

impl RuleSet {
    /// Build from rule definitions, keeping their order.
    ///
    /// All-or-nothing: the first invalid definition aborts the build.
    pub fn build<'a>(
        defs: impl IntoIterator<Item = &'a RuleDef>,
    ) -> Result<Self, ConfigurationError> {
        let rules = defs
            .into_iter()
            .enumerate()
            .map(|(idx, def)| compile(idx + 1, def))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            rules,
            fallback: Rule::fallback(),
        })
    }

    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            fallback: Rule::fallback(),
        }
    }

    /// First explicit rule matching `description`, else the fallback.
    pub fn classify(&self, description: &str) -> &Rule {
        self.explain(description).rule
    }

    pub fn explain(&self, description: &str) -> Explanation<'_> {
        match self
            .rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.matches(description))
        {
            Some((idx, rule)) => Explanation {
                position: Some(idx),
                rule,
            },
            None => Explanation {
                position: None,
                rule: &self.fallback,
            },
        }
    }

    /// Explicit rules in priority order. The fallback is not included.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn fallback(&self) -> &Rule {
        &self.fallback
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Number of explicit rules per bucket; every bucket is present.
    pub fn bucket_counts(&self) -> BTreeMap<Bucket, usize> {
        let mut counts: BTreeMap<Bucket, usize> = Bucket::ALL.iter().map(|b| (*b, 0)).collect();
        for rule in &self.rules {
            *counts.entry(rule.bucket()).or_insert(0) += 1;
        }
        counts
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::empty()
    }
}

fn compile(position: usize, def: &RuleDef) -> Result<Rule, ConfigurationError> {
    let bucket: Bucket = def
        .bucket
        .parse()
        .map_err(|_| ConfigurationError::UnknownBucket {
            position,
            name: def.bucket.clone(),
        })?;

    Rule::new(bucket, &def.pattern, def.category.as_str(), def.detail.as_str()).map_err(|source| {
        ConfigurationError::InvalidPattern {
            position,
            pattern: def.pattern.clone(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(defs: &[RuleDef]) -> RuleSet {
        RuleSet::build(defs).unwrap()
    }

    #[test]
    fn test_costco_is_essential_food() {
        let rules = build(&[RuleDef::new("ESSENTIAL", "^.*COSTCO.*$", "Food", "Grocery Store")]);
        let rule = rules.classify("COSTCO WHSE #1234");
        assert_eq!(rule.bucket(), Bucket::Essential);
        assert_eq!(rule.category(), "Food");
        assert_eq!(rule.detail(), "Grocery Store");
    }

    #[test]
    fn test_earlier_rule_wins_over_more_specific_later_rule() {
        let rules = build(&[
            RuleDef::new("lifestyle", "AMAZON", "Shopping", "General"),
            RuleDef::new("essential", "AMAZON FRESH", "Food", "Grocery Store"),
        ]);
        let explained = rules.explain("AMAZON FRESH 123");
        assert_eq!(explained.position, Some(0));
        assert_eq!(explained.rule.category(), "Shopping");
    }

    #[test]
    fn test_specific_first_then_broad() {
        let rules = build(&[
            RuleDef::new("essential", "AMAZON FRESH", "Food", "Grocery Store"),
            RuleDef::new("lifestyle", "AMAZON", "Shopping", "General"),
        ]);
        assert_eq!(rules.classify("AMAZON FRESH 123").category(), "Food");
        assert_eq!(rules.classify("AMAZON MKTPL").category(), "Shopping");
    }

    #[test]
    fn test_no_match_falls_back_to_lifestyle() {
        let rules = build(&[RuleDef::new("essential", "^RENT", "Housing", "Rent")]);
        let explained = rules.explain("SUBWAY 00123");
        assert_eq!(explained.position, None);
        assert!(explained.rule.is_fallback());
        assert_eq!(explained.rule.bucket(), Bucket::Lifestyle);
        assert_eq!(explained.rule.category(), "");
        assert_eq!(explained.rule.detail(), "");
    }

    #[test]
    fn test_empty_set_always_falls_back() {
        let rules = RuleSet::empty();
        assert!(rules.is_empty());
        assert_eq!(rules.classify("COSTCO WHSE #1234"), &Rule::fallback());
        assert_eq!(rules.classify(""), &Rule::fallback());
    }

    #[test]
    fn test_fallback_is_not_an_explicit_rule() {
        let rules = build(&[RuleDef::new("ignore", "^INTEREST PAYMENT$", "", "")]);
        assert_eq!(rules.len(), 1);
        assert!(rules.rules().iter().all(|r| !r.is_fallback()));
    }

    #[test]
    fn test_classify_is_repeatable() {
        let rules = build(&[
            RuleDef::new("essential", "^SHELL", "Transport", "Fuel"),
            RuleDef::new("lifestyle", "^SUBWAY", "Food", "Eating Out"),
        ]);
        for desc in ["SHELL OIL 5744", "SUBWAY 00123", "UNKNOWN"] {
            let first = rules.classify(desc);
            let second = rules.classify(desc);
            assert!(std::ptr::eq(first, second));
        }
    }

    #[test]
    fn test_order_is_preserved_not_deduplicated() {
        let rules = build(&[
            RuleDef::new("lifestyle", "^B", "b", ""),
            RuleDef::new("essential", "^A", "a", ""),
            RuleDef::new("lifestyle", "^B", "b", ""),
        ]);
        let patterns: Vec<_> = rules.rules().iter().filter_map(|r| r.pattern()).collect();
        assert_eq!(patterns, vec!["^B", "^A", "^B"]);
    }

    #[test]
    fn test_unknown_bucket_aborts_build() {
        let err = RuleSet::build(&[
            RuleDef::new("essential", "^RENT", "Housing", ""),
            RuleDef::new("savings", "^VANGUARD", "Invest", ""),
        ])
        .unwrap_err();
        match err {
            ConfigurationError::UnknownBucket { position, name } => {
                assert_eq!(position, 2);
                assert_eq!(name, "savings");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_pattern_aborts_build() {
        let err = RuleSet::build(&[RuleDef::new("essential", "^(RENT", "Housing", "")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::InvalidPattern { position: 1, .. }
        ));
        assert!(err.to_string().contains("^(RENT"));
    }

    #[test]
    fn test_bucket_counts_include_empty_buckets() {
        let rules = build(&[
            RuleDef::new("essential", "^RENT", "Housing", ""),
            RuleDef::new("Essential", "^PG&E", "Utilities", ""),
        ]);
        let counts = rules.bucket_counts();
        assert_eq!(counts[&Bucket::Essential], 2);
        assert_eq!(counts[&Bucket::Lifestyle], 0);
        assert_eq!(counts[&Bucket::Ignore], 0);
    }

    #[test]
    fn test_rule_def_reads_source_field_names() {
        let def: RuleDef = serde_json::from_str(
            r#"{"top": "ignore", "rule": "^TRANSFER", "category": "", "detail": ""}"#,
        )
        .unwrap();
        assert_eq!(def, RuleDef::new("ignore", "^TRANSFER", "", ""));

        let partial: RuleDef = serde_json::from_str(r#"{"top": "lifestyle", "rule": "^X"}"#).unwrap();
        assert_eq!(partial.category, "");
        assert_eq!(partial.detail, "");
    }
}
