//! Totals per bucket and per category, optionally split by month.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;
use tally_core::Bucket;

use crate::transaction::Transaction;

/// Date layouts seen in common bank exports, tried in order.
/// Two-digit years go first: `%Y` would read "24" as year 24.
const DATE_FORMATS: &[&str] = &["%m/%d/%y", "%m/%d/%Y", "%Y-%m-%d", "%d/%m/%Y"];

pub const UNKNOWN_MONTH: &str = "unknown";

/// Running count and sum. The sum is kept in `i128` so any number of
/// `i64` amounts can be added without overflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Total {
    pub count: usize,
    pub amount: i128,
}

impl Total {
    fn add(&mut self, amount: i64) {
        self.count += 1;
        self.amount += i128::from(amount);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub buckets: BTreeMap<Bucket, Total>,
    /// Keyed by (bucket, category); uncategorized rows use "".
    pub categories: BTreeMap<(Bucket, String), Total>,
}

impl Summary {
    pub fn total(&self) -> Total {
        self.buckets.values().fold(Total::default(), |acc, t| Total {
            count: acc.count + t.count,
            amount: acc.amount + t.amount,
        })
    }
}

pub fn summarize(txns: &[Transaction<'_>]) -> Summary {
    let mut summary = Summary::default();
    for txn in txns {
        summary.buckets.entry(txn.bucket()).or_default().add(txn.amount);
        summary
            .categories
            .entry((txn.bucket(), txn.classification.category().to_string()))
            .or_default()
            .add(txn.amount);
    }
    summary
}

/// Summaries keyed by `YYYY-MM`; rows with unreadable dates go under
/// [`UNKNOWN_MONTH`].
pub fn summarize_by_month(txns: &[Transaction<'_>]) -> BTreeMap<String, Summary> {
    let mut groups: BTreeMap<String, Vec<Transaction<'_>>> = BTreeMap::new();
    for txn in txns {
        let key = month_key(&txn.date).unwrap_or_else(|| UNKNOWN_MONTH.to_string());
        groups.entry(key).or_default().push(txn.clone());
    }
    groups
        .into_iter()
        .map(|(month, items)| (month, summarize(&items)))
        .collect()
}

pub fn month_key(date: &str) -> Option<String> {
    let date = date.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date, fmt).ok())
        .map(|d| d.format("%Y-%m").to_string())
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (bucket, total) in &self.buckets {
            writeln!(f, "{:<10} {:>6} txns {:>12}", bucket, total.count, total.amount)?;
            let in_bucket = self.categories.iter().filter(|((b, _), _)| b == bucket);
            for ((_, category), cat_total) in in_bucket {
                let label = if category.is_empty() { "(none)" } else { category.as_str() };
                writeln!(f, "  {:<24} {:>4} txns {:>12}", label, cat_total.count, cat_total.amount)?;
            }
        }
        let total = self.total();
        write!(f, "{:<10} {:>6} txns {:>12}", "total", total.count, total.amount)
    }
}
