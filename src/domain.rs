use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Language code every localized catalog field is resolved to.
pub const TARGET_LANGUAGE: &str = "fr";

/// Uncompressed size above which an archive is flagged as oversized.
pub const OVERSIZE_LIMIT_BYTES: u64 = 4 * (1 << 30);

/// Formats the inspector treats as directly tabular; anything else is
/// re-derived from the data member's file extension.
pub const TABULAR_FORMATS: [&str; 3] = ["csv", "xls", "xlsx"];

/// Header row offset for spreadsheets delivered outside an archive.
pub const XLSX_FIRST_DATA_ROW: u32 = 4;

/// Sheet name convention for spreadsheets delivered outside an archive.
pub const XLSX_SHEET_NAME: &str = "__MELODI__";

/// One normalized record of the output manifest, describing a single
/// downloadable dataset. Created by a normalization pass, enriched in place
/// by the asset fetcher and the archive inspector, then serialized as-is.
///
/// Keys that may be absent are skipped entirely rather than written as null,
/// so a manifest consumer can test key presence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    pub name: String,
    pub label: String,
    pub collection: String,
    pub link: String,
    pub format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,
    pub is_archive: bool,
    pub is_oversized_archive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_member: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_member: Option<String>,
    pub uses_rest_api: bool,
    pub published_at: Option<String>,
    pub modified_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_size_bytes: Option<u64>,
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_labels: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_data_row: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_name: Option<String>,
    pub is_melodi_source: bool,
}
