//! Rule sheet in TOML form: an array of `[[rule]]` tables.

use anyhow::{Context, Result};
use serde::Deserialize;
use tally_core::RuleDef;

#[derive(Debug, Deserialize)]
struct RuleFile {
    #[serde(default, rename = "rule")]
    rules: Vec<RuleDef>,
}

pub fn parse_rules_toml(s: &str) -> Result<Vec<RuleDef>> {
    let file: RuleFile = toml::from_str(s).context("parse rule TOML")?;
    Ok(file.rules)
}
