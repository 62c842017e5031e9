//! Mail-server domain derivation from address-like strings.
//!
//! The extraction is a literal first-match pattern scan, not address
//! validation: `@` followed by one or more alphanumerics, a dot, then
//! one or more alphanumeric-or-dot characters. Anything that fails the
//! scan, including a missing cell, maps to the sentinel [`UNKNOWN_DOMAIN`].

use once_cell::sync::Lazy;
use regex::Regex;

use crate::records::{Field, RecordTable};

/// Fallback when no domain can be derived.
pub const UNKNOWN_DOMAIN: &str = "unknown";

static DOMAIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@([A-Za-z0-9]+\.[A-Za-z0-9.]+)").unwrap());

/// Derive the mail-server domain from an address-like value.
///
/// Only the first match in the string is used; further `@` occurrences
/// are not disambiguated.
pub fn extract_domain(value: Option<&str>) -> String {
    value
        .and_then(|s| DOMAIN_RE.captures(s))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN_DOMAIN.to_string())
}

/// Derived domains for one record. Computed, never stored in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainPair {
    pub from_domain: String,
    pub to_domain: String,
}

/// Derive sender and recipient domains for every row, in row order.
pub fn annotate(table: &RecordTable) -> Vec<DomainPair> {
    table
        .rows
        .iter()
        .map(|row| DomainPair {
            from_domain: extract_domain(row.record.get(Field::Sender)),
            to_domain: extract_domain(row.record.get(Field::Recipient)),
        })
        .collect()
}
