use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::pipeline::{FillStage, ReindexMode};
use crate::records::Field;

/// Command-line interface definition.
///
/// Verbosity levels:
/// 0 - silent (only final output)
/// 1 - errors (default)
/// 2 - warnings + errors
/// 5 - trace/debug
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Clean spam mail CSV logs, derive mail-server domain statistics, and collect attraction listings"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (0,1,2,5)
    #[arg(long, global = true, default_value_t = 1)]
    pub verbose: u8,

    /// Disable colored terminal output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Print the JSON schema of the structured stats report and exit
    #[arg(long)]
    pub generate_schema: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Clean a mail log: sort, fill missing cells, deduplicate, re-export
    Clean(CleanArgs),
    /// Derive mail-server domain statistics from a mail log
    Stats(StatsArgs),
    /// Collect attraction listings into a CSV file
    Scrape(ScrapeArgs),
}

/// Cleaning switches shared by `clean` and `stats`. Unset flags fall
/// back to configuration defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct CleanFlags {
    /// Sort newest-first instead of oldest-first
    #[arg(long)]
    pub descending: bool,

    /// Replacement value for missing cells
    #[arg(long, value_name = "VALUE")]
    pub fill_default: Option<String>,

    /// Fill missing cells before or after deduplication
    #[arg(long, value_enum)]
    pub fill_stage: Option<FillStage>,

    /// Column that decides record uniqueness
    #[arg(long, value_enum)]
    pub dedup_key: Option<Field>,

    /// How the dense row index is produced
    #[arg(long, value_enum)]
    pub reindex: Option<ReindexMode>,
}

#[derive(Args, Debug, Clone)]
pub struct CleanArgs {
    /// Input CSV path (headerless; sender, send-time, recipient, body)
    pub input: PathBuf,

    /// Output CSV path
    #[arg(short, long)]
    pub output: PathBuf,

    #[command(flatten)]
    pub flags: CleanFlags,

    /// Suppress the row-index column in the output
    #[arg(long)]
    pub no_index: bool,

    /// Suppress the derived from_domain/to_domain columns
    #[arg(long)]
    pub no_domains: bool,

    /// Prefix the output with a UTF-8 BOM (spreadsheet compatibility)
    #[arg(long)]
    pub bom: bool,

    /// Also write the loaded table unmodified, before any cleaning
    #[arg(long, value_name = "FILE")]
    pub raw_out: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct StatsArgs {
    /// Input CSV path (headerless; sender, send-time, recipient, body)
    pub input: PathBuf,

    #[command(flatten)]
    pub flags: CleanFlags,

    /// Report domains whose count is at or below this value as rare
    #[arg(long)]
    pub threshold: Option<u32>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Args, Debug, Clone)]
pub struct ScrapeArgs {
    /// Output CSV path for the collected listings
    #[arg(short, long)]
    pub output: PathBuf,

    /// Listing base URL; the page number is appended
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Number of pages to fetch
    #[arg(long)]
    pub pages: Option<u32>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,
}

/// Stats report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

impl StatsArgs {
    /// Is the report machine-parsable (JSON/YAML) rather than styled text?
    pub fn is_structured(&self) -> bool {
        matches!(self.format, OutputFormat::Json | OutputFormat::Yaml)
    }
}

impl Cli {
    /// Parse CLI arguments from process args.
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Convenience: are we in very verbose/debug mode?
    pub fn is_trace(&self) -> bool {
        self.verbose >= 5
    }

    /// Are warning-level messages enabled?
    pub fn warn_enabled(&self) -> bool {
        self.verbose >= 2
    }

    /// Are error-level messages enabled?
    pub fn error_enabled(&self) -> bool {
        self.verbose >= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_helpers() {
        let mut cli = Cli::parse_from(["mailsift", "--verbose", "5", "--generate-schema"]);
        assert!(cli.is_trace());
        assert!(cli.warn_enabled());
        assert!(cli.error_enabled());

        cli.verbose = 0;
        assert!(!cli.error_enabled());
    }

    #[test]
    fn clean_args_parse() {
        let cli = Cli::parse_from([
            "mailsift",
            "clean",
            "in.csv",
            "-o",
            "out.csv",
            "--fill-stage",
            "after-dedup",
            "--dedup-key",
            "body",
            "--bom",
        ]);
        match cli.command {
            Some(Command::Clean(args)) => {
                assert_eq!(args.input, PathBuf::from("in.csv"));
                assert_eq!(args.flags.fill_stage, Some(FillStage::AfterDedup));
                assert_eq!(args.flags.dedup_key, Some(Field::Body));
                assert!(args.bom);
                assert!(!args.no_index);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn stats_format_defaults_to_text() {
        let cli = Cli::parse_from(["mailsift", "stats", "in.csv"]);
        match cli.command {
            Some(Command::Stats(args)) => {
                assert_eq!(args.format, OutputFormat::Text);
                assert!(!args.is_structured());
                assert_eq!(args.threshold, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
