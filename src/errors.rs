//! Unified error handling for mailsift.
//!
//! A `thiserror`-based model with:
//!   * Typed variants for the common failure domains (load, parse, fetch)
//!   * A categorization layer (`ErrorCategory`) for structured reporting
//!   * Helper constructors
//!   * `From` conversions for common lower-level errors
//!
//! Design goals:
//!   * Keep end-user messages clear & actionable
//!   * Avoid leaking internal implementation details
//!   * Enable structured output to classify errors deterministically
//!
//! Categories are intentionally coarse:
//!   - Input: User / data validation issues
//!   - Network: Transient or remote-service problems
//!   - Parse: Syntax / data-format decoding issues
//!   - Internal: Logic bugs or unexpected states

use std::io;

use thiserror::Error;

/// High-level classification for structured reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Network,
    Parse,
    Internal,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorCategory::Input => "input",
            ErrorCategory::Network => "network",
            ErrorCategory::Parse => "parse",
            ErrorCategory::Internal => "internal",
        };
        f.write_str(s)
    }
}

/// Primary application error type.
#[derive(Error, Debug)]
pub enum MailsiftError {
    // ------------------------ Input / Validation ----------------------------
    #[error("Unknown column name: {field}")]
    UnknownField { field: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    // ---------------------------- Parsing -----------------------------------
    #[error("Failed to read CSV data from {path}: {source}")]
    CsvRead {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to write CSV data to {path}: {source}")]
    CsvWrite {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to parse listing HTML from {url}: {reason}")]
    ListingParse { url: String, reason: String },

    // ----------------------------- Network ----------------------------------
    #[error("Fetch of {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // ----------------------------- I/O / FS ---------------------------------
    #[error("I/O error during {operation} on {path}: {source}")]
    Io {
        path: String,
        operation: String,
        #[source]
        source: io::Error,
    },

    // ---------------------------- Internal ----------------------------------
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl MailsiftError {
    /// Categorize the error for structured output.
    pub fn category(&self) -> ErrorCategory {
        use MailsiftError::*;
        match self {
            UnknownField { .. } | Configuration { .. } => ErrorCategory::Input,

            CsvRead { .. } | CsvWrite { .. } | ListingParse { .. } => ErrorCategory::Parse,

            Fetch { .. } => ErrorCategory::Network,

            Io { .. } | Internal { .. } => ErrorCategory::Internal,
        }
    }

    // ---------------------------- Constructors -----------------------------

    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self::UnknownField {
            field: field.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn csv_read(path: impl Into<String>, source: csv::Error) -> Self {
        Self::CsvRead {
            path: path.into(),
            source,
        }
    }

    pub fn csv_write(path: impl Into<String>, source: csv::Error) -> Self {
        Self::CsvWrite {
            path: path.into(),
            source,
        }
    }

    pub fn listing_parse(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ListingParse {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn fetch(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Fetch {
            url: url.into(),
            source,
        }
    }

    pub fn io(path: impl Into<String>, operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    pub fn internal_with(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

/// Public result alias.
pub type Result<T> = std::result::Result<T, MailsiftError>;

/// Map standard IO errors into `Io` variant (generic context).
impl From<io::Error> for MailsiftError {
    fn from(e: io::Error) -> Self {
        MailsiftError::Io {
            path: "<unknown>".into(),
            operation: "unspecified".into(),
            source: e,
        }
    }
}

/// Map bare csv errors lacking path context; callers should prefer
/// `csv_read` / `csv_write` where the path is known.
impl From<csv::Error> for MailsiftError {
    fn from(e: csv::Error) -> Self {
        MailsiftError::CsvRead {
            path: "<unknown>".into(),
            source: e,
        }
    }
}

/// Extension trait for enriching IO results with path + operation context.
pub trait IoResultExt<T> {
    fn with_path(self, path: impl Into<String>, operation: impl Into<String>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::result::Result<T, io::Error> {
    fn with_path(self, path: impl Into<String>, operation: impl Into<String>) -> Result<T> {
        self.map_err(|e| MailsiftError::io(path.into(), operation.into(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_mapping() {
        assert_eq!(
            MailsiftError::unknown_field("x").category(),
            ErrorCategory::Input
        );
        assert_eq!(
            MailsiftError::listing_parse("http://x", "no list").category(),
            ErrorCategory::Parse
        );
        assert_eq!(
            MailsiftError::internal("boom").category(),
            ErrorCategory::Internal
        );
    }

    #[test]
    fn display_snippets() {
        let e = MailsiftError::listing_parse("http://example.com/p-1", "item list not found");
        let s = e.to_string();
        assert!(s.contains("http://example.com/p-1"));
        assert!(s.contains("item list not found"));
        let i = MailsiftError::internal("boom");
        assert!(i.to_string().contains("Internal error"));
    }

    #[test]
    fn io_context() {
        let res: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let mapped = res.with_path("/tmp/file", "read");
        match mapped.err().unwrap() {
            MailsiftError::Io {
                path, operation, ..
            } => {
                assert_eq!(path, "/tmp/file");
                assert_eq!(operation, "read");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
