//! Manifest loader tests
//!
//! Covers header discovery, cell normalisation, row skipping and the
//! loader → engine → report path with an in-memory registry.

mod helpers;

use helpers::zebrafish_registry;
use mfv_taxon::reconcile::{validate_entries, validate_manifest};
use mfv_taxon::manifest::ManifestError;
use mfv_taxon::{load_manifest, ManifestEntry, ValidatorError};
use rust_xlsxwriter::Workbook;
use std::error::Error as _;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{Builder, TempDir};

const MANIFEST_CSV: &str = "\
Sample manifest,,,,
Version,1.0,,,
,,,,
SANGER PLATE ID,WELL,SUPPLIER SAMPLE NAME,TAXON ID,COMMON NAME
PLATE1,A1,study_sample1,7955,Danio rerio
PLATE1,A2,study_sample2,7955.0,  Danio\u{a0}rerio  
PLATE1,A3,,7955,Danio rerio
PLATE1,A4,study_sample4,,Danio rerio
PLATE1,A5,study_sample5,999999,Danio rerio
";

fn write_manifest(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_csv_manifest() {
    let file = write_manifest(".csv", MANIFEST_CSV);

    let entries = load_manifest(file.path()).unwrap();

    assert_eq!(
        entries,
        vec![
            ManifestEntry::new("study_sample1", Some("Danio rerio"), Some("7955")),
            ManifestEntry::new("study_sample2", Some("Danio rerio"), Some("7955")),
            ManifestEntry::new("study_sample4", Some("Danio rerio"), None),
            ManifestEntry::new("study_sample5", Some("Danio rerio"), Some("999999")),
        ]
    );
}

#[test]
fn test_load_tsv_manifest() {
    let file = write_manifest(
        ".tsv",
        "SANGER PLATE ID\tCOMMON NAME\tTAXON ID\tSUPPLIER SAMPLE NAME\n\
         PLATE1\tDanio rerio\t7955\tsample_a\n\
         PLATE1\t\t\tsample_b\n",
    );

    let entries = load_manifest(file.path()).unwrap();

    assert_eq!(
        entries,
        vec![
            ManifestEntry::new("sample_a", Some("Danio rerio"), Some("7955")),
            ManifestEntry::new("sample_b", None, None),
        ]
    );
}

#[test]
fn test_header_without_marker_uses_first_row() {
    let file = write_manifest(
        ".csv",
        "SUPPLIER SAMPLE NAME,TAXON ID,COMMON NAME\nsample_a,7955,Danio rerio\n",
    );

    let entries = load_manifest(file.path()).unwrap();

    assert_eq!(
        entries,
        vec![ManifestEntry::new("sample_a", Some("Danio rerio"), Some("7955"))]
    );
}

#[test]
fn test_missing_file_is_error() {
    let result = load_manifest(Path::new("/nonexistent/manifest.csv"));

    match result {
        Err(ManifestError::Io { path, source }) => {
            assert_eq!(path, PathBuf::from("/nonexistent/manifest.csv"));
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected Io error, got {:?}", other),
    }
}

#[test]
fn test_io_error_keeps_source() {
    let err = load_manifest(Path::new("/nonexistent/manifest.csv")).unwrap_err();
    assert!(err.source().is_some());
    assert!(err.to_string().contains("/nonexistent/manifest.csv"));
}

// ============================================================================
// Workbooks
// ============================================================================

/// Write a Sanger-style workbook: preamble rows, header, then data rows
/// with numeric taxon ids as Excel stores them
fn write_workbook(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("manifest.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    sheet.write_string(0, 0, "Sample manifest").unwrap();
    sheet.write_string(1, 0, "Version").unwrap();
    sheet.write_number(1, 1, 1.0).unwrap();

    let header = ["SANGER PLATE ID", "WELL", "SUPPLIER SAMPLE NAME", "TAXON ID", "COMMON NAME"];
    for (col, title) in header.iter().enumerate() {
        sheet.write_string(3, col as u16, *title).unwrap();
    }

    sheet.write_string(4, 0, "PLATE1").unwrap();
    sheet.write_string(4, 2, "study_sample1").unwrap();
    sheet.write_number(4, 3, 7955).unwrap();
    sheet.write_string(4, 4, "Danio rerio").unwrap();

    sheet.write_string(5, 0, "PLATE1").unwrap();
    sheet.write_string(5, 2, "study_sample2").unwrap();
    sheet.write_number(5, 3, 5597).unwrap();
    sheet.write_string(5, 4, "  Danio\u{a0}rerio ").unwrap();

    // No sample name: skipped
    sheet.write_string(6, 0, "PLATE1").unwrap();
    sheet.write_number(6, 3, 7955).unwrap();

    sheet.write_string(7, 0, "PLATE1").unwrap();
    sheet.write_number(7, 2, 1234).unwrap();
    sheet.write_string(7, 4, "Danio rerio").unwrap();

    workbook.save(&path).unwrap();
    path
}

#[test]
fn test_load_xlsx_manifest() {
    let dir = TempDir::new().unwrap();
    let path = write_workbook(&dir);

    let entries = load_manifest(&path).unwrap();

    assert_eq!(
        entries,
        vec![
            ManifestEntry::new("study_sample1", Some("Danio rerio"), Some("7955")),
            ManifestEntry::new("study_sample2", Some("Danio rerio"), Some("5597")),
            ManifestEntry::new("1234", Some("Danio rerio"), None),
        ]
    );
}

#[test]
fn test_missing_workbook_is_io_error() {
    let result = load_manifest(Path::new("/nonexistent/manifest.xlsx"));
    assert!(matches!(result, Err(ManifestError::Io { .. })));
}

#[tokio::test]
async fn test_xlsx_manifest_end_to_end() {
    let dir = TempDir::new().unwrap();
    let path = write_workbook(&dir);

    let report = validate_manifest(&path, zebrafish_registry()).await.unwrap();

    assert_eq!(
        report.errors(),
        &[
            "study_sample2: Taxon ID and common name don't match. The taxon ID for given name 'Danio rerio' is 7955. The official name for the given taxon ID 5597 is 'Other species'."
                .to_string(),
            "1234: Common name 'Danio rerio' cannot be checked without a taxon ID. No taxon ID specified."
                .to_string(),
        ]
    );
}

#[tokio::test]
async fn test_manifest_file_end_to_end() {
    let file = write_manifest(".csv", MANIFEST_CSV);
    let entries = load_manifest(file.path()).unwrap();

    let report = validate_entries(zebrafish_registry(), entries).await.unwrap();

    assert_eq!(
        report.errors(),
        &[
            "study_sample4: Common name 'Danio rerio' cannot be checked without a taxon ID. No taxon ID specified."
                .to_string(),
            "study_sample5: The taxon ID for given name 'Danio rerio' is 7955. The given taxon ID 999999 does not exist in the NCBI database."
                .to_string(),
        ]
    );
}

#[tokio::test]
async fn test_validate_manifest_from_path() {
    let file = write_manifest(".csv", MANIFEST_CSV);

    let report = validate_manifest(file.path(), zebrafish_registry()).await.unwrap();

    assert!(!report.passed());
    assert_eq!(report.errors().len(), 2);
}

#[tokio::test]
async fn test_validate_manifest_unreadable_file() {
    let result = validate_manifest(
        Path::new("/nonexistent/manifest.csv"),
        zebrafish_registry(),
    )
    .await;

    assert!(matches!(result, Err(ValidatorError::Manifest(_))));
}
