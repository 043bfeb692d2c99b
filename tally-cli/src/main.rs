use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tally_core::RuleSet;
use tally_finance::{Classified, classify_records, summarize, summarize_by_month, to_json, write_lines};
use tally_ingest::{load_rule_set, read_statement_file};
use tracing_subscriber::EnvFilter;

mod config;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "tally", version, about = "Rule-based categorizer for bank statement exports")]
struct Cli {
    /// Config file (default: ./tally.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Rule sheet (.csv or .toml), overrides the configured one
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug); RUST_LOG wins if set
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify a statement CSV and print every non-ignored transaction
    Categorize {
        /// Statement export with date, description and amount columns
        raw_file: PathBuf,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Totals per bucket and category
    Summary {
        raw_file: PathBuf,

        /// One block per calendar month
        #[arg(long)]
        by_month: bool,
    },

    /// Show which rule wins for each description
    Explain {
        #[arg(required = true)]
        descriptions: Vec<String>,
    },

    /// Compile the rule sheet and report rule counts
    CheckRules,

    /// Write a default config file
    InitConfig {
        #[arg(long, default_value = config::DEFAULT_CONFIG_FILE)]
        path: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Config plus the compiled rule sheet, loaded once per run.
struct Session {
    cfg: Config,
    rules_path: PathBuf,
    rules: RuleSet,
}

impl Session {
    fn open(config: Option<&Path>, rules: Option<PathBuf>) -> Result<Self> {
        let cfg = config::load_config(config)?;
        let rules_path = rules.unwrap_or_else(|| cfg.rules.clone());
        let rules = load_rule_set(&rules_path)?;
        Ok(Self {
            cfg,
            rules_path,
            rules,
        })
    }

    fn classify(&self, raw_file: &Path) -> Result<Classified<'_>> {
        let records = read_statement_file(raw_file, self.cfg.delimiter_byte()?)?;
        classify_records(&records, &self.rules, &self.cfg.columns, self.cfg.on_record_error)
            .with_context(|| format!("classifying {}", raw_file.display()))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.config.as_deref();

    match cli.command {
        Command::Categorize { raw_file, format } => {
            let session = Session::open(config, cli.rules)?;
            let out = session.classify(&raw_file)?;
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            match format {
                Format::Text => write_lines(&mut lock, &out.transactions)?,
                Format::Json => writeln!(lock, "{}", to_json(&out.transactions)?)?,
            }
        }

        Command::Summary { raw_file, by_month } => {
            let session = Session::open(config, cli.rules)?;
            let out = session.classify(&raw_file)?;
            if by_month {
                for (month, summary) in summarize_by_month(&out.transactions) {
                    println!("## {month}\n{summary}\n");
                }
            } else {
                println!("{}", summarize(&out.transactions));
            }
            println!(
                "\nRecords: {} (ignored: {}, skipped: {})",
                out.total_records(),
                out.ignored,
                out.skipped
            );
        }

        Command::Explain { descriptions } => {
            let session = Session::open(config, cli.rules)?;
            for desc in &descriptions {
                println!("{}", explain_line(&session.rules, desc));
            }
        }

        Command::CheckRules => {
            let session = Session::open(config, cli.rules)?;
            let counts = session.rules.bucket_counts();
            let per_bucket: Vec<String> = counts.iter().map(|(b, n)| format!("{b}: {n}")).collect();
            println!(
                "{} rules OK in {} ({})",
                session.rules.len(),
                session.rules_path.display(),
                per_bucket.join(", ")
            );
        }

        Command::InitConfig { path } => {
            config::init_config(&path)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn explain_line(rules: &RuleSet, description: &str) -> String {
    let explained = rules.explain(description);
    let rule = explained.rule;
    let source = match (explained.position, rule.pattern()) {
        (Some(idx), Some(pattern)) => format!("rule {} /{}/", idx + 1, pattern),
        _ => "default".to_string(),
    };
    format!(
        "{description} -> {} [{}] {} / {}",
        rule.bucket(),
        source,
        rule.category(),
        rule.detail()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tally_core::RuleDef;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_categorize_with_globals() {
        let cli = Cli::try_parse_from([
            "tally", "categorize", "stmt.csv", "--format", "json", "--rules", "r.toml", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.rules, Some(PathBuf::from("r.toml")));
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Categorize { raw_file, format } => {
                assert_eq!(raw_file, PathBuf::from("stmt.csv"));
                assert_eq!(format, Format::Json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_explain_requires_a_description() {
        assert!(Cli::try_parse_from(["tally", "explain"]).is_err());
    }

    #[test]
    fn test_explain_line_names_rule_position() {
        let rules = RuleSet::build(&[
            RuleDef::new("ignore", "^INTEREST PAYMENT$", "", ""),
            RuleDef::new("essential", "^.*COSTCO.*$", "Food", "Grocery Store"),
        ])
        .unwrap();
        assert_eq!(
            explain_line(&rules, "COSTCO WHSE #1234"),
            "COSTCO WHSE #1234 -> essential [rule 2 /^.*COSTCO.*$/] Food / Grocery Store"
        );
        assert_eq!(
            explain_line(&rules, "BLUE BOTTLE"),
            "BLUE BOTTLE -> lifestyle [default]  / "
        );
    }
}
