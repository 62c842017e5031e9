//! Structured report for JSON and YAML serialization.
//!
//! Defines the machine-parsable shape of a stats run: what was read,
//! what the cleaning pass did, and the per-side domain aggregates.
//! The schema is published via `--generate-schema` so downstream
//! consumers can validate output deterministically.

use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::pipeline::CleanSummary;
use crate::stats::DomainTally;

/// JSON schema version for this output format
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Root structure for the stats report in structured formats
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct SiftReport {
    /// Tool version and metadata
    pub metadata: ReportMetadata,

    /// Input information that was analyzed
    pub input: InputInfo,

    /// What the cleaning pass did
    pub cleaning: CleanSummary,

    /// Distinct-value counts over the cleaned table
    pub distinct: DistinctCounts,

    /// Domains derived from the sender column
    pub sender_domains: DomainReport,

    /// Domains derived from the recipient column
    pub recipient_domains: DomainReport,

    /// Warnings encountered during processing
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<String>,
}

/// Tool metadata and versioning information
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct ReportMetadata {
    /// Tool name
    pub tool_name: String,

    /// Tool version
    pub version: String,

    /// Timestamp when the report was generated
    pub generated_at: chrono::DateTime<chrono::Utc>,

    /// JSON schema version for this output format
    pub schema_version: String,
}

impl Default for ReportMetadata {
    fn default() -> Self {
        Self {
            tool_name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: chrono::Utc::now(),
            schema_version: SCHEMA_VERSION.to_string(),
        }
    }
}

/// Information about what was analyzed
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct InputInfo {
    /// Input file path
    pub path: String,

    /// Rows loaded before cleaning
    pub rows_loaded: usize,
}

/// Distinct values per column after cleaning
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct DistinctCounts {
    pub senders: usize,
    pub recipients: usize,
    pub bodies: usize,
}

/// Aggregates over one derived-domain column
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct DomainReport {
    /// Number of distinct domains
    pub unique: usize,

    /// Rare-domain summary at the configured threshold
    pub rare: RareDomains,

    /// Frequency counts, descending then lexicographic
    pub counts: Vec<DomainCount>,
}

/// One domain with its occurrence count
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct DomainCount {
    pub domain: String,
    pub count: u32,
}

/// How many distinct domains sit at or below the threshold
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct RareDomains {
    pub threshold: u32,
    pub count: usize,
}

impl DomainReport {
    /// Build a report section from a tally at the given threshold.
    pub fn from_tally(tally: DomainTally, threshold: u32) -> Self {
        let unique = tally.unique_count();
        let rare = RareDomains {
            threshold,
            count: tally.count_at_or_below(threshold),
        };
        let counts = tally
            .into_sorted()
            .into_iter()
            .map(|(domain, count)| DomainCount { domain, count })
            .collect();
        Self {
            unique,
            rare,
            counts,
        }
    }
}

impl SiftReport {
    /// Serialize to a pretty JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serialize to a YAML string
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Generate the JSON schema for this output format
    pub fn generate_json_schema() -> Result<String> {
        let schema = schemars::schema_for!(SiftReport);
        Ok(serde_json::to_string_pretty(&schema)?)
    }
}
