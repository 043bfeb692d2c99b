//! Rule sheet in CSV form:
//!   top,rule,category,detail
//!   essential,^.*COSTCO.*$,Food,Grocery Store
//!   ignore,^INTEREST PAYMENT$,,

use anyhow::{Context, Result};
use std::io::Read;
use tally_core::RuleDef;

/// Parse rule rows in sheet order. Values are taken verbatim so patterns keep
/// any significant whitespace. A row may stop after its pattern; the missing
/// category and detail read as empty.
pub fn parse_rules_csv<R: Read>(data: R) -> Result<Vec<RuleDef>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(data);

    let mut defs = Vec::new();
    for (idx, result) in rdr.deserialize::<RuleDef>().enumerate() {
        let def = result.with_context(|| format!("rule {}", idx + 1))?;
        defs.push(def);
    }
    Ok(defs)
}
