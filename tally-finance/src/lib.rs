//! tally-finance: turns statement records into classified transactions and
//! renders them as lines, JSON or a bucket summary.

pub mod emitter;
pub mod pipeline;
pub mod summary;
pub mod transaction;

pub use emitter::{OutputRow, format_line, to_json, write_lines};
pub use pipeline::{Classified, RecordPolicy, classify_records};
pub use summary::{Summary, summarize, summarize_by_month};
pub use transaction::{ColumnNames, Transaction, parse_amount, to_transaction};
