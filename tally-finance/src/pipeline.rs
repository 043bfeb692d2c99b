//! Record-by-record classification with ignore filtering.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tally_core::RuleSet;
use tally_ingest::Record;

use crate::transaction::{ColumnNames, Transaction, to_transaction};

/// What to do with a record that can't become a transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordPolicy {
    /// Abort the run on the first bad record.
    #[default]
    #[serde(rename = "fail")]
    FailFast,
    /// Log the record and carry on.
    #[serde(rename = "skip")]
    Skip,
}

/// Output of a classification run, in input order.
#[derive(Debug, Clone, Default)]
pub struct Classified<'r> {
    /// Non-ignored transactions only
    pub transactions: Vec<Transaction<'r>>,
    pub ignored: usize,
    pub skipped: usize,
}

impl Classified<'_> {
    pub fn total_records(&self) -> usize {
        self.transactions.len() + self.ignored + self.skipped
    }
}

pub fn classify_records<'r>(
    records: &[Record],
    rules: &'r RuleSet,
    columns: &ColumnNames,
    policy: RecordPolicy,
) -> Result<Classified<'r>> {
    let mut out = Classified::default();

    for (idx, record) in records.iter().enumerate() {
        let row = idx + 1;
        let txn = match to_transaction(record, rules, columns) {
            Ok(txn) => txn,
            Err(err) => match policy {
                RecordPolicy::FailFast => {
                    return Err(err).with_context(|| format!("data row {row}"));
                }
                RecordPolicy::Skip => {
                    tracing::warn!(row, error = %err, "skipping record");
                    out.skipped += 1;
                    continue;
                }
            },
        };

        if txn.is_ignored() {
            tracing::debug!(row, description = %txn.description, "ignored");
            out.ignored += 1;
            continue;
        }
        out.transactions.push(txn);
    }

    tracing::info!(
        kept = out.transactions.len(),
        ignored = out.ignored,
        skipped = out.skipped,
        "classified statement"
    );
    Ok(out)
}
