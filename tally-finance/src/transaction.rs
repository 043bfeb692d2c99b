//! Statement record → classified transaction.

use serde::{Deserialize, Serialize};
use tally_core::{Bucket, RecordError, Rule, RuleSet};
use tally_ingest::Record;

/// Header names the statement export uses for the fields we read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub transaction_date: String,
    /// Used when the transaction date is absent or blank.
    pub posting_date: String,
    pub description: String,
    pub amount: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            transaction_date: "Transaction Date".to_string(),
            posting_date: "Posting Date".to_string(),
            description: "Description".to_string(),
            amount: "Amount".to_string(),
        }
    }
}

/// A statement row together with the rule that classified it.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction<'r> {
    /// Raw date text as it appeared in the statement
    pub date: String,
    pub description: String,
    /// Whole units, fraction truncated toward zero
    pub amount: i64,
    pub classification: &'r Rule,
}

impl Transaction<'_> {
    pub fn bucket(&self) -> Bucket {
        self.classification.bucket()
    }

    pub fn is_ignored(&self) -> bool {
        self.bucket().is_ignored()
    }
}

pub fn to_transaction<'r>(
    row: &Record,
    rules: &'r RuleSet,
    columns: &ColumnNames,
) -> Result<Transaction<'r>, RecordError> {
    let date = pick_date(row, columns)?;
    let description = row
        .get(&columns.description)
        .ok_or_else(|| RecordError::MissingField(columns.description.clone()))?;
    let amount = row
        .get(&columns.amount)
        .ok_or_else(|| RecordError::MissingField(columns.amount.clone()))?;
    let amount = parse_amount(amount)?;

    Ok(Transaction {
        date,
        description: description.clone(),
        amount,
        classification: rules.classify(description),
    })
}

/// Transaction date if it has a value, else posting date.
fn pick_date(row: &Record, columns: &ColumnNames) -> Result<String, RecordError> {
    let trans = row.get(&columns.transaction_date);
    if let Some(d) = trans.filter(|d| !d.trim().is_empty()) {
        return Ok(d.clone());
    }
    if let Some(p) = row.get(&columns.posting_date) {
        return Ok(p.clone());
    }
    trans.cloned().ok_or_else(|| {
        RecordError::MissingField(format!(
            "{} or {}",
            columns.transaction_date, columns.posting_date
        ))
    })
}

/// Parse a decimal amount and drop the fraction: `45.99 → 45`, `-45.99 → -45`.
///
/// Lossy on purpose; cents never reach the output.
pub fn parse_amount(s: &str) -> Result<i64, RecordError> {
    let malformed = || RecordError::MalformedAmount(s.to_string());
    let value: f64 = s.trim().parse().map_err(|_| malformed())?;
    if !value.is_finite() {
        return Err(malformed());
    }
    let whole = value.trunc();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range.
    if whole < i64::MIN as f64 || whole >= i64::MAX as f64 {
        return Err(malformed());
    }
    Ok(whole as i64)
}
