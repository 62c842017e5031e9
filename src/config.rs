//! Configuration management for mailsift.
//!
//! Structured configuration loaded from defaults, then environment
//! variables, then command-line arguments (CLI wins). Centralizes the
//! cleaning defaults, scrape settings and export preferences so no
//! pipeline step reads ambient state.

use std::time::Duration;

use crate::cli::{Cli, CleanFlags, Command};
use crate::export::ExportOptions;
use crate::pipeline::{CleanOptions, FillStage, ReindexMode};
use crate::records::Field;

/// Main configuration structure for mailsift.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Cleaning pass defaults
    pub pipeline: PipelineConfig,

    /// Listing collector settings
    pub scrape: ScrapeConfig,

    /// CSV export preferences
    pub export: ExportConfig,
}

/// Cleaning defaults, overridable per run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Sort direction for the send-time column
    pub ascending: bool,

    /// Replacement for missing cells
    pub fill_default: String,

    /// Fill-versus-dedup ordering
    pub fill_stage: FillStage,

    /// Column that decides record uniqueness
    pub dedup_key: Field,

    /// Index densification behavior
    pub reindex: ReindexMode,

    /// Rare-domain threshold for the stats report
    pub threshold: u32,
}

/// Listing collector settings.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Base URL; the page number is appended
    pub base_url: String,

    /// Number of pages to fetch
    pub pages: u32,

    /// Per-request timeout
    pub timeout: Duration,
}

/// CSV export preferences.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Emit the row-index column
    pub include_index: bool,

    /// Append derived from_domain/to_domain columns
    pub include_domains: bool,

    /// Prefix output with a UTF-8 BOM
    pub bom: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            ascending: true,
            fill_default: "0".to_string(),
            fill_stage: FillStage::BeforeDedup,
            dedup_key: Field::Body,
            reindex: ReindexMode::Copy,
            threshold: 10,
        }
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://travel.qunar.com/p-cs299878-shanghai-jingdian-1-".to_string(),
            pages: 3,
            timeout: Duration::from_secs(10),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            include_index: true,
            include_domains: true,
            bom: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(value) = std::env::var("MAILSIFT_FILL_DEFAULT") {
            config.pipeline.fill_default = value;
        }

        if let Ok(value) = std::env::var("MAILSIFT_THRESHOLD")
            && let Ok(threshold) = value.parse::<u32>()
        {
            config.pipeline.threshold = threshold;
        }

        if let Ok(value) = std::env::var("MAILSIFT_SCRAPE_BASE_URL") {
            config.scrape.base_url = value;
        }

        if let Ok(value) = std::env::var("MAILSIFT_SCRAPE_PAGES")
            && let Ok(pages) = value.parse::<u32>()
        {
            config.scrape.pages = pages;
        }

        if let Ok(value) = std::env::var("MAILSIFT_SCRAPE_TIMEOUT_SECS")
            && let Ok(secs) = value.parse::<u64>()
        {
            config.scrape.timeout = Duration::from_secs(secs);
        }

        config
    }

    /// Merge with CLI arguments, giving CLI precedence
    pub fn merge_with_cli(&mut self, cli: &Cli) {
        match &cli.command {
            Some(Command::Clean(args)) => {
                self.merge_clean_flags(&args.flags);
                if args.no_index {
                    self.export.include_index = false;
                }
                if args.no_domains {
                    self.export.include_domains = false;
                }
                if args.bom {
                    self.export.bom = true;
                }
            }
            Some(Command::Stats(args)) => {
                self.merge_clean_flags(&args.flags);
                if let Some(threshold) = args.threshold {
                    self.pipeline.threshold = threshold;
                }
            }
            Some(Command::Scrape(args)) => {
                if let Some(ref base_url) = args.base_url {
                    self.scrape.base_url = base_url.clone();
                }
                if let Some(pages) = args.pages {
                    self.scrape.pages = pages;
                }
                if let Some(secs) = args.timeout_secs {
                    self.scrape.timeout = Duration::from_secs(secs);
                }
            }
            None => {}
        }
    }

    fn merge_clean_flags(&mut self, flags: &CleanFlags) {
        if flags.descending {
            self.pipeline.ascending = false;
        }
        if let Some(ref fill_default) = flags.fill_default {
            self.pipeline.fill_default = fill_default.clone();
        }
        if let Some(fill_stage) = flags.fill_stage {
            self.pipeline.fill_stage = fill_stage;
        }
        if let Some(dedup_key) = flags.dedup_key {
            self.pipeline.dedup_key = dedup_key;
        }
        if let Some(reindex) = flags.reindex {
            self.pipeline.reindex = reindex;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scrape.pages == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scrape.pages".to_string(),
                value: "0".to_string(),
                reason: "At least one page must be fetched".to_string(),
            });
        }

        if self.scrape.timeout.as_secs() == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scrape.timeout".to_string(),
                value: "0".to_string(),
                reason: "Timeout must be greater than 0".to_string(),
            });
        }

        if self.scrape.base_url.is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "scrape.base_url".to_string(),
            });
        }

        Ok(())
    }

    /// Options for one cleaning pass, from the pipeline section.
    pub fn clean_options(&self) -> CleanOptions {
        CleanOptions {
            ascending: self.pipeline.ascending,
            fill_default: self.pipeline.fill_default.clone(),
            fill_stage: self.pipeline.fill_stage,
            dedup_key: self.pipeline.dedup_key,
            reindex: self.pipeline.reindex,
        }
    }

    /// Options for one export, from the export section.
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            include_index: self.export.include_index,
            bom: self.export.bom,
        }
    }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
    /// Invalid configuration value
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// Missing required configuration
    MissingRequired { field: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue {
                field,
                value,
                reason,
            } => {
                write!(f, "Invalid value '{}' for '{}': {}", value, field, reason)
            }
            ConfigError::MissingRequired { field } => {
                write!(f, "Missing required configuration field: {}", field)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
