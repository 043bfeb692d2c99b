//! tally-core: rule, bucket and rule-set types for the transaction categorizer

pub mod error;
pub mod rule;
pub mod rule_set;

pub use error::{ConfigurationError, RecordError};
pub use rule::{Bucket, Rule};
pub use rule_set::{Explanation, RuleDef, RuleSet};
