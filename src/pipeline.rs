//! The linear cleaning pass: sort, fill, deduplicate, reindex.
//!
//! Every behavior switch lives on [`CleanOptions`] and is passed in
//! explicitly; there are no ambient settings. The two historical
//! orderings of fill-versus-dedup are both supported via [`FillStage`]
//! rather than silently picking one, and reindexing can either mutate
//! the table or leave the input untouched ([`ReindexMode`]).

use std::cmp::Ordering;
use std::collections::HashSet;

use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::records::{Field, RecordTable};

/// Where missing-value filling happens relative to deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FillStage {
    /// Fill first, then deduplicate (filled cells can participate in keys).
    #[default]
    BeforeDedup,
    /// Deduplicate first, then fill the survivors.
    AfterDedup,
}

/// How the dense 0..n-1 index is produced, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReindexMode {
    /// Return a reindexed copy; the cleaned table keeps original indices.
    #[default]
    Copy,
    /// Rewrite indices in place.
    InPlace,
    /// Keep the original load indices.
    Off,
}

/// Explicit configuration for one cleaning pass.
#[derive(Debug, Clone)]
pub struct CleanOptions {
    /// Sort direction for the send-time column.
    pub ascending: bool,
    /// Replacement for missing cells. All columns are strings, so the
    /// default is the string "0".
    pub fill_default: String,
    /// Fill-versus-dedup ordering.
    pub fill_stage: FillStage,
    /// Column whose value decides record uniqueness.
    pub dedup_key: Field,
    /// Index densification behavior.
    pub reindex: ReindexMode,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            ascending: true,
            fill_default: "0".to_string(),
            fill_stage: FillStage::default(),
            dedup_key: Field::Body,
            reindex: ReindexMode::default(),
        }
    }
}

/// Per-column fraction of missing cells, measured before filling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct ColumnMissing {
    pub sender: f64,
    pub sent_at: f64,
    pub recipient: f64,
    pub body: f64,
}

/// What one cleaning pass did.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct CleanSummary {
    pub rows_in: usize,
    pub rows_out: usize,
    pub duplicates_removed: usize,
    pub cells_filled: usize,
    pub missing: ColumnMissing,
}

/// Stable sort by the send-time column, compared as strings. No date
/// parsing happens; lexicographic order is only meaningful for
/// zero-padded fixed-width formats. Missing send-times sort last in
/// either direction.
pub fn sort_by_sent_at(table: &mut RecordTable, ascending: bool) {
    table.rows.sort_by(|a, b| {
        match (a.record.sent_at.as_deref(), b.record.sent_at.as_deref()) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => {
                if ascending {
                    x.cmp(y)
                } else {
                    y.cmp(x)
                }
            }
        }
    });
}

/// Replace every missing cell with `default`. Returns the number of
/// cells that were filled.
pub fn fill_missing(table: &mut RecordTable, default: &str) -> usize {
    let mut filled = 0;
    for row in &mut table.rows {
        for field in Field::all() {
            if row.record.get(field).is_none() {
                row.record.set(field, Some(default.to_string()));
                filled += 1;
            }
        }
    }
    filled
}

/// Keep the first record per distinct value of `key`, in current order.
/// All rows with a missing key form a single group. Returns the number
/// of rows removed.
pub fn deduplicate_by(table: &mut RecordTable, key: Field) -> usize {
    let before = table.rows.len();
    let mut seen: HashSet<Option<String>> = HashSet::new();
    table
        .rows
        .retain(|row| seen.insert(row.record.get(key).map(str::to_string)));
    before - table.rows.len()
}

/// Rewrite the index column as 0..n-1 in current row order.
pub fn reindex_in_place(table: &mut RecordTable) {
    for (i, row) in table.rows.iter_mut().enumerate() {
        row.index = i;
    }
}

/// Return a copy with a dense 0..n-1 index; the input is not mutated.
pub fn reindex(table: &RecordTable) -> RecordTable {
    let mut copy = table.clone();
    reindex_in_place(&mut copy);
    copy
}

/// Fraction of missing cells per column. Empty tables report zeros.
pub fn missing_ratio(table: &RecordTable) -> ColumnMissing {
    let n = table.len();
    if n == 0 {
        return ColumnMissing::default();
    }
    let ratio = |field: Field| {
        let missing = table.column(field).filter(Option::is_none).count();
        missing as f64 / n as f64
    };
    ColumnMissing {
        sender: ratio(Field::Sender),
        sent_at: ratio(Field::SentAt),
        recipient: ratio(Field::Recipient),
        body: ratio(Field::Body),
    }
}

/// Run the full linear pass: sort, fill (per stage), dedup, reindex.
pub fn clean(mut table: RecordTable, options: &CleanOptions) -> (RecordTable, CleanSummary) {
    let rows_in = table.len();
    let missing = missing_ratio(&table);

    sort_by_sent_at(&mut table, options.ascending);

    let mut cells_filled = 0;
    if options.fill_stage == FillStage::BeforeDedup {
        cells_filled = fill_missing(&mut table, &options.fill_default);
    }

    let duplicates_removed = deduplicate_by(&mut table, options.dedup_key);

    if options.fill_stage == FillStage::AfterDedup {
        cells_filled = fill_missing(&mut table, &options.fill_default);
    }

    let table = match options.reindex {
        ReindexMode::Copy => reindex(&table),
        ReindexMode::InPlace => {
            reindex_in_place(&mut table);
            table
        }
        ReindexMode::Off => table,
    };

    let summary = CleanSummary {
        rows_in,
        rows_out: table.len(),
        duplicates_removed,
        cells_filled,
        missing,
    };
    (table, summary)
}
