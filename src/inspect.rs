use std::collections::BTreeMap;
use std::io::{Cursor, Read};

use regex::Regex;
use sha2::{Digest, Sha256};
use tracing::warn;
use zip::ZipArchive;

use crate::domain::{
    Descriptor, OVERSIZE_LIMIT_BYTES, TABULAR_FORMATS, XLSX_FIRST_DATA_ROW, XLSX_SHEET_NAME,
};
use crate::error::ManifestError;

/// Column of the metadata member holding variable codes.
pub const VARIABLE_CODE_COLUMN: &str = "COD_VAR";

/// Column of the metadata member holding human-readable variable labels.
pub const VARIABLE_LABEL_COLUMN: &str = "LIB_VAR";

/// Hex SHA-256 over the full downloaded body.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Enriches an available descriptor from its downloaded bytes: archive
/// layout, oversize flag, format re-derivation and column labels for
/// archives; spreadsheet reading hints for flat xlsx files.
///
/// Inspection never fails the descriptor, let alone the run. Whatever could
/// not be derived stays absent, and the warn log states which failure mode
/// occurred so absent-metadata and unparsable-metadata remain
/// distinguishable without changing the manifest schema.
pub fn enrich(descriptor: &mut Descriptor, bytes: &[u8]) {
    if descriptor.is_archive {
        if let Err(err) = inspect_archive(descriptor, bytes) {
            warn!(name = %descriptor.name, error = %err, "archive inspection incomplete");
        }
    } else if descriptor.format == "xlsx" {
        descriptor.first_data_row = Some(XLSX_FIRST_DATA_ROW);
        descriptor.sheet_name = Some(XLSX_SHEET_NAME.to_string());
    }
}

fn inspect_archive(descriptor: &mut Descriptor, bytes: &[u8]) -> Result<(), ManifestError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|err| ManifestError::Archive(err.to_string()))?;

    let metadata_pattern = Regex::new("metadata").unwrap();
    let mut uncompressed_total = 0u64;
    let mut data_member = None;
    let mut metadata_member = None;
    for index in 0..archive.len() {
        let entry = archive
            .by_index(index)
            .map_err(|err| ManifestError::Archive(err.to_string()))?;
        uncompressed_total += entry.size();
        let member = entry.name().to_string();
        if metadata_pattern.is_match(&member) {
            metadata_member.get_or_insert(member);
        } else {
            data_member.get_or_insert(member);
        }
    }

    descriptor.is_oversized_archive = is_oversized(uncompressed_total);

    let Some(data_member) = data_member else {
        return Err(ManifestError::Archive(
            "no data member in archive".to_string(),
        ));
    };
    if !TABULAR_FORMATS.contains(&descriptor.format.as_str()) {
        descriptor.format = member_extension(&data_member);
    }
    descriptor.data_member = Some(data_member);
    descriptor.metadata_member = metadata_member.clone();

    if descriptor.format == "csv" {
        descriptor.delimiter = Some(";".to_string());
        let Some(metadata_member) = metadata_member else {
            warn!(name = %descriptor.name, "no metadata member in archive, column labels omitted");
            return Ok(());
        };
        match read_column_labels(&mut archive, &metadata_member) {
            Ok(labels) => descriptor.column_labels = Some(labels),
            Err(err) => {
                warn!(name = %descriptor.name, error = %err, "metadata member unusable, column labels omitted");
            }
        }
    }
    Ok(())
}

/// Builds the variable-code to label dictionary from the semicolon-delimited
/// metadata member. The first occurrence wins for each code.
fn read_column_labels(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    member: &str,
) -> Result<BTreeMap<String, String>, ManifestError> {
    let mut content = Vec::new();
    archive
        .by_name(member)
        .map_err(|err| ManifestError::Archive(err.to_string()))?
        .read_to_end(&mut content)
        .map_err(|err| ManifestError::Archive(err.to_string()))?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .from_reader(content.as_slice());
    let headers = reader
        .headers()
        .map_err(|err| ManifestError::MetadataParse(err.to_string()))?;
    let code_index = column_index(headers, VARIABLE_CODE_COLUMN)?;
    let label_index = column_index(headers, VARIABLE_LABEL_COLUMN)?;

    let mut labels = BTreeMap::new();
    for record in reader.records() {
        let record = record.map_err(|err| ManifestError::MetadataParse(err.to_string()))?;
        let code = record.get(code_index).unwrap_or_default();
        let label = record.get(label_index).unwrap_or_default();
        labels
            .entry(code.to_string())
            .or_insert_with(|| label.to_string());
    }
    Ok(labels)
}

fn column_index(headers: &csv::StringRecord, column: &str) -> Result<usize, ManifestError> {
    headers
        .iter()
        .position(|header| header == column)
        .ok_or_else(|| ManifestError::MetadataParse(format!("missing column {column}")))
}

pub fn is_oversized(uncompressed_total: u64) -> bool {
    uncompressed_total > OVERSIZE_LIMIT_BYTES
}

fn member_extension(member: &str) -> String {
    member
        .rsplit_once('.')
        .map(|(_, extension)| extension.to_lowercase())
        .unwrap_or_else(|| member.to_lowercase())
}
