//! Mailsift Library
//!
//! A Rust library for cleaning spam mail CSV logs and deriving
//! mail-server statistics. This library provides functionality to:
//!
//! - Load headerless 4-column mail logs (sender, send-time, recipient, body)
//! - Sort, fill missing cells, deduplicate on message body, reindex
//! - Derive mail-server domains from address-like strings
//! - Aggregate domain frequencies and rare-domain counts
//! - Collect attraction listings as a separate CSV data producer
//!
//! # Example
//!
//! ```rust,no_run
//! use mailsift::pipeline::{clean, CleanOptions};
//! use mailsift::records::load_records;
//!
//! let loaded = load_records("a.csv")?;
//! let (table, summary) = clean(loaded.table, &CleanOptions::default());
//! println!("{} duplicates removed", summary.duplicates_removed);
//! # Ok::<(), mailsift::MailsiftError>(())
//! ```

// Re-export all modules for library use
pub mod cli;
pub mod config;
pub mod domains;
pub mod errors;
pub mod export;
pub mod pipeline;
pub mod records;
pub mod report;
pub mod scrape;
pub mod stats;
pub mod structured_output;

// Re-export commonly used types and functions for convenience
pub use domains::{DomainPair, UNKNOWN_DOMAIN, extract_domain};
pub use errors::{MailsiftError, Result};
pub use pipeline::{CleanOptions, CleanSummary, FillStage, ReindexMode, clean};
pub use records::{Field, MailRecord, RecordTable, load_records};
pub use stats::DomainTally;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
