//! Bank statement CSV export → header-keyed records.
//!
//! Expected shape (column order and extra columns don't matter):
//!   Transaction Date,Posting Date,Description,Amount
//!   01/03/2025,01/04/2025,COSTCO WHSE #1234,45.99

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::types::Record;

/// Parse statement rows in file order.
///
/// Short rows are kept; the fields they lack are simply absent from the
/// record, so the classifier can report which one is missing.
pub fn read_statement<R: Read>(data: R, delimiter: u8) -> Result<Vec<Record>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(data);

    let headers: Vec<String> = rdr
        .headers()
        .context("reading header row")?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
            h.trim().to_string()
        })
        .collect();

    let mut out = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("reading data row {}", idx + 1))?;
        let row: Record = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect();
        out.push(row);
    }

    tracing::debug!(rows = out.len(), columns = headers.len(), "parsed statement");
    Ok(out)
}

pub fn read_statement_file(path: impl AsRef<Path>, delimiter: u8) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_statement(file, delimiter).with_context(|| format!("parsing {}", path.display()))
}
