//! CSV export of record tables.
//!
//! Output carries a leading row-index column unless suppressed, and an
//! optional UTF-8 BOM for spreadsheet compatibility. Derived domain
//! columns are appended when the caller supplies annotations. Missing
//! cells export as empty fields.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domains::DomainPair;
use crate::errors::{IoResultExt, MailsiftError, Result};
use crate::records::{Field, RecordTable};

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Export-time switches.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Emit the row-index column.
    pub include_index: bool,
    /// Prefix the file with a UTF-8 BOM.
    pub bom: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_index: true,
            bom: false,
        }
    }
}

/// Write a table (plus optional derived domain columns) to `path`.
///
/// `domains`, when given, must be parallel to the table's rows.
pub fn write_table<P: AsRef<Path>>(
    path: P,
    table: &RecordTable,
    domains: Option<&[DomainPair]>,
    options: &ExportOptions,
) -> Result<()> {
    let display = path.as_ref().display().to_string();
    if let Some(pairs) = domains
        && pairs.len() != table.len()
    {
        return Err(MailsiftError::internal(format!(
            "domain annotations ({}) do not match table rows ({})",
            pairs.len(),
            table.len()
        )));
    }

    let mut file = File::create(&path).with_path(&display, "create")?;
    if options.bom {
        file.write_all(UTF8_BOM).with_path(&display, "write")?;
    }
    let mut wtr = csv::Writer::from_writer(file);

    let mut header: Vec<&str> = Vec::new();
    if options.include_index {
        header.push("index");
    }
    header.extend(Field::all().iter().map(|f| f.as_str()));
    if domains.is_some() {
        header.push("from_domain");
        header.push("to_domain");
    }
    wtr.write_record(&header)
        .map_err(|e| MailsiftError::csv_write(&display, e))?;

    for (pos, row) in table.rows.iter().enumerate() {
        let mut out: Vec<String> = Vec::with_capacity(header.len());
        if options.include_index {
            out.push(row.index.to_string());
        }
        for field in Field::all() {
            out.push(row.record.get(field).unwrap_or_default().to_string());
        }
        if let Some(pairs) = domains {
            out.push(pairs[pos].from_domain.clone());
            out.push(pairs[pos].to_domain.clone());
        }
        wtr.write_record(&out)
            .map_err(|e| MailsiftError::csv_write(&display, e))?;
    }

    wtr.flush().with_path(&display, "flush")?;
    Ok(())
}

/// Write the loaded table unmodified (index + four columns), the
/// straight re-export that precedes cleaning.
pub fn write_raw_copy<P: AsRef<Path>>(path: P, table: &RecordTable) -> Result<()> {
    write_table(path, table, None, &ExportOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::annotate;
    use crate::records::read_table;
    use tempfile::NamedTempFile;

    fn sample() -> RecordTable {
        read_table(
            "a@x.example.com,2020-01,b@y.example.org,hello\n\
             c@z.example.net,2020-02,,bye\n"
                .as_bytes(),
            "<test>",
        )
        .unwrap()
        .table
    }

    #[test]
    fn writes_index_and_header() {
        let file = NamedTempFile::new().unwrap();
        write_table(file.path(), &sample(), None, &ExportOptions::default()).unwrap();
        let text = std::fs::read_to_string(file.path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "index,sender,sent_at,recipient,body");
        assert!(lines[1].starts_with("0,a@x.example.com,2020-01"));
        assert!(lines[2].starts_with("1,c@z.example.net"));
    }

    #[test]
    fn index_column_can_be_suppressed() {
        let file = NamedTempFile::new().unwrap();
        let options = ExportOptions {
            include_index: false,
            ..ExportOptions::default()
        };
        write_table(file.path(), &sample(), None, &options).unwrap();
        let text = std::fs::read_to_string(file.path()).unwrap();
        assert!(text.starts_with("sender,sent_at,recipient,body"));
    }

    #[test]
    fn bom_prefixes_the_file() {
        let file = NamedTempFile::new().unwrap();
        let options = ExportOptions {
            bom: true,
            ..ExportOptions::default()
        };
        write_table(file.path(), &sample(), None, &options).unwrap();
        let bytes = std::fs::read(file.path()).unwrap();
        assert_eq!(&bytes[..3], UTF8_BOM);
    }

    #[test]
    fn derived_columns_are_appended() {
        let table = sample();
        let pairs = annotate(&table);
        let file = NamedTempFile::new().unwrap();
        write_table(file.path(), &table, Some(&pairs), &ExportOptions::default()).unwrap();
        let text = std::fs::read_to_string(file.path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].ends_with("from_domain,to_domain"));
        assert!(lines[1].ends_with("x.example.com,y.example.org"));
        assert!(lines[2].ends_with("z.example.net,unknown"));
    }

    #[test]
    fn missing_cells_export_empty() {
        let file = NamedTempFile::new().unwrap();
        write_table(file.path(), &sample(), None, &ExportOptions::default()).unwrap();
        let text = std::fs::read_to_string(file.path()).unwrap();
        assert!(text.lines().nth(2).unwrap().contains(",,"));
    }

    #[test]
    fn mismatched_annotations_are_rejected() {
        let table = sample();
        let file = NamedTempFile::new().unwrap();
        let err = write_table(file.path(), &table, Some(&[]), &ExportOptions::default())
            .unwrap_err();
        assert!(matches!(err, MailsiftError::Internal { .. }));
    }
}
