use std::collections::HashMap;
use std::path::Path;

/// One statement row, keyed by header name.
pub type Record = HashMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleFormat {
    Csv,
    Toml,
}

impl RuleFormat {
    /// Detect from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(RuleFormat::Csv),
            "toml" => Some(RuleFormat::Toml),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_format_from_extension() {
        assert_eq!(RuleFormat::from_path(Path::new("rules.csv")), Some(RuleFormat::Csv));
        assert_eq!(RuleFormat::from_path(Path::new("conf/Rules.TOML")), Some(RuleFormat::Toml));
        assert_eq!(RuleFormat::from_path(Path::new("rules.json")), None);
        assert_eq!(RuleFormat::from_path(Path::new("rules")), None);
    }
}
