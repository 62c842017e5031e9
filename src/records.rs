//! Mail record model and CSV loader.
//!
//! Input files are headerless UTF-8 CSV with four positional columns:
//! sender, send-time, recipient, message body. Column names are imposed
//! by the loader, never read from the file. Every cell is optional; an
//! empty cell loads as `None`.
//!
//! Malformed rows are tolerated rather than rejected: short rows are
//! padded with missing cells and long rows have their extra fields
//! dropped, each case producing a warning for the caller to surface.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use clap::ValueEnum;
use serde::Serialize;

use crate::errors::{IoResultExt, MailsiftError, Result};

/// The four named columns of a mail record, in positional order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Field {
    Sender,
    SentAt,
    Recipient,
    Body,
}

impl Field {
    /// Column name as used in exported headers.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Sender => "sender",
            Field::SentAt => "sent_at",
            Field::Recipient => "recipient",
            Field::Body => "body",
        }
    }

    /// All columns in positional order.
    pub fn all() -> [Field; 4] {
        [Field::Sender, Field::SentAt, Field::Recipient, Field::Body]
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of sender/time/recipient/body data. Missing cells are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MailRecord {
    pub sender: Option<String>,
    pub sent_at: Option<String>,
    pub recipient: Option<String>,
    pub body: Option<String>,
}

impl MailRecord {
    /// Borrow a cell by column.
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Sender => self.sender.as_deref(),
            Field::SentAt => self.sent_at.as_deref(),
            Field::Recipient => self.recipient.as_deref(),
            Field::Body => self.body.as_deref(),
        }
    }

    /// Replace a cell by column.
    pub fn set(&mut self, field: Field, value: Option<String>) {
        match field {
            Field::Sender => self.sender = value,
            Field::SentAt => self.sent_at = value,
            Field::Recipient => self.recipient = value,
            Field::Body => self.body = value,
        }
    }
}

/// A record together with its table index. Indices start at the load
/// position and survive sorting and filtering until an explicit reindex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedRecord {
    pub index: usize,
    pub record: MailRecord,
}

/// Ordered in-memory table of mail records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordTable {
    pub rows: Vec<IndexedRecord>,
}

impl RecordTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Current index column, in row order.
    pub fn indices(&self) -> Vec<usize> {
        self.rows.iter().map(|r| r.index).collect()
    }

    /// Iterate over one column's cells, in row order.
    pub fn column(&self, field: Field) -> impl Iterator<Item = Option<&str>> {
        self.rows.iter().map(move |r| r.record.get(field))
    }
}

/// Result of a load: the table plus any malformed-row warnings.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub table: RecordTable,
    pub warnings: Vec<String>,
}

/// Load a headerless 4-column CSV file into a record table.
///
/// A missing or unreadable file is fatal. Rows with the wrong field
/// count are repaired (pad short, truncate long) with a warning each.
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<LoadOutcome> {
    let display = path.as_ref().display().to_string();
    let file = File::open(&path).with_path(&display, "open")?;
    read_table(file, &display)
}

/// Load records from any reader. `origin` is used in error messages only.
pub fn read_table<R: Read>(reader: R, origin: &str) -> Result<LoadOutcome> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    let mut warnings = Vec::new();

    for (line, result) in rdr.records().enumerate() {
        let raw = result.map_err(|e| MailsiftError::csv_read(origin, e))?;

        if raw.len() < 4 {
            warnings.push(format!(
                "row {line}: expected 4 fields, found {}; missing cells left empty",
                raw.len()
            ));
        } else if raw.len() > 4 {
            warnings.push(format!(
                "row {line}: expected 4 fields, found {}; extra fields dropped",
                raw.len()
            ));
        }

        let mut record = MailRecord::default();
        for (field, cell) in Field::all().into_iter().zip(raw.iter()) {
            let value = if cell.is_empty() {
                None
            } else {
                Some(cell.to_string())
            };
            record.set(field, value);
        }

        rows.push(IndexedRecord {
            index: line,
            record,
        });
    }

    Ok(LoadOutcome {
        table: RecordTable { rows },
        warnings,
    })
}
