use std::collections::HashSet;

use tracing::warn;

use crate::catalog::{CatalogEntry, bulk_file_url};
use crate::domain::{Descriptor, TARGET_LANGUAGE};
use crate::error::ManifestError;
use crate::locale::select_lang;

/// Shape A pass: one descriptor per collection-level catalog entry.
///
/// The source always publishes these as a single zip bundling a semicolon
/// CSV data file with its metadata file, reachable under a predictable
/// bulk-export link, so format, delimiter, archive flag and member names are
/// fixed at normalization time.
pub fn collection_descriptors(
    catalog: &[CatalogEntry],
) -> Result<Vec<Descriptor>, ManifestError> {
    let mut seen = HashSet::new();
    let mut descriptors = Vec::new();
    for entry in catalog {
        let name = entry.identifier.to_uppercase();
        if !seen.insert(name.clone()) {
            warn!(name, "duplicate identifier in catalog, keeping first entry");
            continue;
        }
        descriptors.push(Descriptor {
            name,
            label: select_lang(&entry.title, TARGET_LANGUAGE)?.to_string(),
            collection: collection_label(entry)?,
            link: bulk_file_url(&entry.identifier),
            format: "csv".to_string(),
            delimiter: Some(";".to_string()),
            is_archive: true,
            is_oversized_archive: false,
            data_member: Some(format!("{}_data.csv", entry.identifier)),
            metadata_member: Some(format!("{}_metadata.csv", entry.identifier)),
            uses_rest_api: false,
            published_at: entry.issued.clone(),
            modified_at: entry.modified.clone(),
            documentation_url: documentation_url(entry),
            reference_date: None,
            declared_size_bytes: None,
            available: false,
            size_bytes: None,
            content_hash: None,
            column_labels: None,
            first_data_row: None,
            sheet_name: None,
            is_melodi_source: true,
        });
    }
    Ok(descriptors)
}

/// Shape B pass: one descriptor per product sub-record, inheriting the
/// collection, documentation link and reference date from the parent entry
/// and taking link, format, declared size, dates and packaging from the
/// sub-record itself.
pub fn product_descriptors(catalog: &[CatalogEntry]) -> Result<Vec<Descriptor>, ManifestError> {
    let mut seen = HashSet::new();
    let mut descriptors = Vec::new();
    for entry in catalog {
        let Some(products) = &entry.product else {
            continue;
        };
        for product in products {
            let name = product.id.to_uppercase();
            if !seen.insert(name.clone()) {
                warn!(name, "duplicate product identifier, keeping first record");
                continue;
            }
            descriptors.push(Descriptor {
                name,
                label: product.title.clone(),
                collection: collection_label(entry)?,
                link: product.access_url.clone(),
                format: product.format.to_lowercase(),
                delimiter: None,
                is_archive: is_zip_package(product.package_format.as_deref()),
                is_oversized_archive: false,
                data_member: None,
                metadata_member: None,
                uses_rest_api: false,
                published_at: product.issued.clone(),
                modified_at: product.modified.clone(),
                documentation_url: documentation_url(entry),
                reference_date: reference_date(entry),
                declared_size_bytes: product.byte_size,
                available: false,
                size_bytes: None,
                content_hash: None,
                column_labels: None,
                first_data_row: None,
                sheet_name: None,
                is_melodi_source: true,
            });
        }
    }
    Ok(descriptors)
}

/// Most-specific theme comes last in the source's ordering.
fn collection_label(entry: &CatalogEntry) -> Result<String, ManifestError> {
    let theme = entry
        .theme
        .last()
        .ok_or_else(|| ManifestError::MissingTheme(entry.identifier.clone()))?;
    Ok(select_lang(&theme.label, TARGET_LANGUAGE)?.to_string())
}

/// Last relation wins; the key is dropped entirely when the entry carries
/// no relations.
fn documentation_url(entry: &CatalogEntry) -> Option<String> {
    entry
        .relations
        .as_ref()
        .and_then(|relations| relations.last())
        .cloned()
}

fn reference_date(entry: &CatalogEntry) -> Option<String> {
    entry
        .temporal
        .as_ref()
        .map(|temporal| match temporal.start_period.split_once('T') {
            Some((date, _)) => date.to_string(),
            None => temporal.start_period.clone(),
        })
}

fn is_zip_package(package_format: Option<&str>) -> bool {
    package_format.is_some_and(|format| format.contains("zip"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(value: serde_json::Value) -> CatalogEntry {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn zip_detection_is_a_substring_match() {
        assert!(is_zip_package(Some("application/zip")));
        assert!(is_zip_package(Some("zip")));
        assert!(!is_zip_package(Some("application/gzip+ZIP")));
        assert!(!is_zip_package(None));
    }

    #[test]
    fn last_theme_and_last_relation_win() {
        let entry = entry(serde_json::json!({
            "identifier": "ds1",
            "title": [{"lang": "fr", "content": "Revenus"}],
            "theme": [
                {"label": [{"lang": "fr", "content": "Général"}]},
                {"label": [{"lang": "fr", "content": "Économie"}]}
            ],
            "relations": ["https://doc.invalid/old", "https://doc.invalid/new"]
        }));
        assert_eq!(collection_label(&entry).unwrap(), "Économie");
        assert_eq!(
            documentation_url(&entry).as_deref(),
            Some("https://doc.invalid/new")
        );
    }

    #[test]
    fn reference_date_keeps_date_part_only() {
        let entry = entry(serde_json::json!({
            "identifier": "ds1",
            "title": [{"lang": "fr", "content": "Revenus"}],
            "temporal": {"startPeriod": "2023-01-01T00:00:00"}
        }));
        assert_eq!(reference_date(&entry).as_deref(), Some("2023-01-01"));
    }
}
