pub mod rules_csv;
pub mod rules_toml;
pub mod statement_csv;
