use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tally_finance::{ColumnNames, RecordPolicy};

pub const DEFAULT_CONFIG_FILE: &str = "tally.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rule sheet (.csv or .toml). Relative paths are resolved against the
    /// directory holding the config file.
    pub rules: PathBuf,
    /// Single ASCII character separating statement columns
    pub delimiter: String,
    pub on_record_error: RecordPolicy,
    pub columns: ColumnNames,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules: PathBuf::from("rules.csv"),
            delimiter: ",".to_string(),
            on_record_error: RecordPolicy::FailFast,
            columns: ColumnNames::default(),
        }
    }
}

impl Config {
    pub fn delimiter_byte(&self) -> Result<u8> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => bail!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            ),
        }
    }
}

/// Load `explicit` if given, else `./tally.toml` when present, else defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let p = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !p.exists() {
                tracing::debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
                return Ok(Config::default());
            }
            p
        }
    };

    let s = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let mut cfg = parse_config(&s).with_context(|| format!("parse {}", path.display()))?;
    if cfg.rules.is_relative() {
        if let Some(dir) = path.parent() {
            cfg.rules = dir.join(&cfg.rules);
        }
    }
    tracing::debug!(config = %path.display(), rules = %cfg.rules.display(), "loaded config");
    Ok(cfg)
}

pub fn parse_config(s: &str) -> Result<Config> {
    let cfg: Config = toml::from_str(s)?;
    cfg.delimiter_byte()?;
    Ok(cfg)
}

/// Write the default config to `path`; an existing file is left alone.
pub fn init_config(path: &Path) -> Result<bool> {
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(false);
    }
    let s = toml::to_string_pretty(&Config::default()).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(true)
}
