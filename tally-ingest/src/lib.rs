//! tally-ingest: statement CSV rows and rule definition files.

pub mod parsers;
pub mod types;

pub use parsers::rules_csv::parse_rules_csv;
pub use parsers::rules_toml::parse_rules_toml;
pub use parsers::statement_csv::{read_statement, read_statement_file};
pub use types::{Record, RuleFormat};

use anyhow::{Context, Result, anyhow};
use std::fs;
use std::path::Path;
use tally_core::{RuleDef, RuleSet};

/// Read rule definitions from a `.csv` or `.toml` file, in file order.
pub fn load_rule_defs(path: impl AsRef<Path>) -> Result<Vec<RuleDef>> {
    let path = path.as_ref();
    let format = RuleFormat::from_path(path).ok_or_else(|| {
        anyhow!(
            "unsupported rule file {} (expected .csv or .toml)",
            path.display()
        )
    })?;

    let defs = match format {
        RuleFormat::Csv => {
            let file = fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
            parse_rules_csv(file)
        }
        RuleFormat::Toml => {
            let s = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            parse_rules_toml(&s)
        }
    }
    .with_context(|| format!("parsing {}", path.display()))?;

    tracing::debug!(path = %path.display(), ?format, rules = defs.len(), "loaded rule definitions");
    Ok(defs)
}

/// Load and compile a rule file. Fails on the first invalid rule.
pub fn load_rule_set(path: impl AsRef<Path>) -> Result<RuleSet> {
    let path = path.as_ref();
    let defs = load_rule_defs(path)?;
    let rules = RuleSet::build(&defs).with_context(|| format!("building rules from {}", path.display()))?;
    tracing::info!(path = %path.display(), rules = rules.len(), "rule set ready");
    Ok(rules)
}
