//! Output formats for classified transactions.

use serde::Serialize;
use std::io::{self, Write};
use tally_core::Bucket;

use crate::transaction::Transaction;

/// Flat view of a transaction for serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRow<'a> {
    pub date: &'a str,
    pub description: &'a str,
    pub amount: i64,
    pub bucket: Bucket,
    pub category: &'a str,
    pub detail: &'a str,
}

impl<'a> From<&'a Transaction<'_>> for OutputRow<'a> {
    fn from(txn: &'a Transaction<'_>) -> Self {
        Self {
            date: &txn.date,
            description: &txn.description,
            amount: txn.amount,
            bucket: txn.bucket(),
            category: txn.classification.category(),
            detail: txn.classification.detail(),
        }
    }
}

/// `date,description,amount,bucket,category,detail` with no quoting.
pub fn format_line(txn: &Transaction<'_>) -> String {
    format!(
        "{},{},{},{},{},{}",
        txn.date,
        txn.description,
        txn.amount,
        txn.bucket(),
        txn.classification.category(),
        txn.classification.detail()
    )
}

pub fn write_lines<W: Write>(out: &mut W, txns: &[Transaction<'_>]) -> io::Result<()> {
    for txn in txns {
        writeln!(out, "{}", format_line(txn))?;
    }
    Ok(())
}

pub fn to_json(txns: &[Transaction<'_>]) -> serde_json::Result<String> {
    let rows: Vec<OutputRow<'_>> = txns.iter().map(OutputRow::from).collect();
    serde_json::to_string_pretty(&rows)
}
