//! Manifest loader
//!
//! Reads a sample manifest either from an Excel workbook (first worksheet)
//! or from a delimited-text export. The header row is the first row whose
//! first cell is `SANGER PLATE ID`; data rows follow it.
//!
//! ## Formats (by file extension)
//! - `.xlsx`, `.xlsm`, `.xls`, `.xlsb`, `.ods`: workbook, numeric cells become integer text
//! - `.tsv`, `.txt`: tab-separated
//! - anything else: comma-separated
//!
//! ## Column contract (located by header text, order-independent)
//!
//! | Column                 | Becomes                     |
//! |------------------------|-----------------------------|
//! | `SUPPLIER SAMPLE NAME` | [`ManifestEntry::sample_id`]   |
//! | `COMMON NAME`          | [`ManifestEntry::common_name`] |
//! | `TAXON ID`             | [`ManifestEntry::taxon_id`]    |
//!
//! Rows without a sample name are skipped.

use super::ManifestEntry;
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// First cell of the header row
pub const HEADER_MARKER: &str = "SANGER PLATE ID";
pub const SAMPLE_ID_COLUMN: &str = "SUPPLIER SAMPLE NAME";
pub const TAXON_ID_COLUMN: &str = "TAXON ID";
pub const COMMON_NAME_COLUMN: &str = "COMMON NAME";

const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xls", "xlsb", "ods"];

/// Manifest loading errors
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to open manifest {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Workbook {} has no worksheet", .0.display())]
    NoWorksheet(PathBuf),

    #[error("Manifest header is missing column '{0}'")]
    MissingColumn(&'static str),
}

/// Physical layout of a manifest file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Workbook,
    Delimited(u8),
}

impl ManifestFormat {
    /// Pick the format from the file extension
    pub fn for_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some(e) if WORKBOOK_EXTENSIONS.contains(&e) => ManifestFormat::Workbook,
            Some("tsv") | Some("txt") => ManifestFormat::Delimited(b'\t'),
            _ => ManifestFormat::Delimited(b','),
        }
    }
}

/// Column positions resolved from the header row
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    sample_id: usize,
    common_name: usize,
    taxon_id: usize,
}

impl ColumnIndex {
    fn from_header(header: &[String]) -> Result<Self, ManifestError> {
        let find = |name: &'static str| {
            header
                .iter()
                .position(|cell| cell.trim() == name)
                .ok_or(ManifestError::MissingColumn(name))
        };

        Ok(Self {
            sample_id: find(SAMPLE_ID_COLUMN)?,
            common_name: find(COMMON_NAME_COLUMN)?,
            taxon_id: find(TAXON_ID_COLUMN)?,
        })
    }

    fn entry(&self, row: &[String]) -> Option<ManifestEntry> {
        let cell = |i: usize| row.get(i).and_then(|raw| normalize_cell(raw));

        Some(ManifestEntry {
            sample_id: cell(self.sample_id)?,
            common_name: cell(self.common_name),
            taxon_id: cell(self.taxon_id),
        })
    }
}

/// Load a manifest file in the format implied by its extension
pub fn load_manifest(path: &Path) -> Result<Vec<ManifestEntry>, ManifestError> {
    let format = ManifestFormat::for_path(path);

    let entries = match format {
        ManifestFormat::Workbook => load_workbook(path)?,
        ManifestFormat::Delimited(delimiter) => {
            let file = File::open(path).map_err(|source| ManifestError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            parse_manifest(file, delimiter)?
        }
    };

    info!(path = %path.display(), ?format, entries = entries.len(), "Loaded manifest");
    Ok(entries)
}

/// Read the first worksheet of a workbook
pub fn load_workbook(path: &Path) -> Result<Vec<ManifestEntry>, ManifestError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| match e {
        calamine::Error::Io(source) => ManifestError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => ManifestError::Workbook(other),
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ManifestError::NoWorksheet(path.to_path_buf()))??;

    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(workbook_cell_text).collect())
        .collect();

    entries_from_rows(rows)
}

/// Parse delimited manifest rows from any reader
pub fn parse_manifest<R: Read>(reader: R, delimiter: u8) -> Result<Vec<ManifestEntry>, ManifestError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(reader);

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in csv_reader.records() {
        rows.push(record?.iter().map(str::to_string).collect());
    }

    entries_from_rows(rows)
}

/// Locate the header row and turn the rows after it into entries
fn entries_from_rows(rows: Vec<Vec<String>>) -> Result<Vec<ManifestEntry>, ManifestError> {
    let header_row = rows
        .iter()
        .position(|row| row.first().map(|c| c.trim()) == Some(HEADER_MARKER))
        .unwrap_or(0);

    let Some(header) = rows.get(header_row) else {
        return Ok(Vec::new());
    };
    let columns = ColumnIndex::from_header(header)?;
    debug!(header_row, ?columns, "Resolved manifest columns");

    Ok(rows[header_row + 1..]
        .iter()
        .filter_map(|row| columns.entry(row))
        .collect())
}

/// Text of a workbook cell; integral numbers render without a fraction
pub fn workbook_cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.is_finite() && f.fract() == 0.0 => format!("{:.0}", f),
        other => other.to_string(),
    }
}

/// Trim a raw cell; blank → `None`, non-breaking spaces → spaces,
/// integral numbers rendered as floats (`7955.0`) → integers
pub fn normalize_cell(raw: &str) -> Option<String> {
    let value = raw.replace('\u{a0}', " ");
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Some((whole, fraction)) = value.split_once('.') {
        let is_integral = !whole.is_empty()
            && whole.bytes().all(|b| b.is_ascii_digit())
            && !fraction.is_empty()
            && fraction.bytes().all(|b| b == b'0');
        if is_integral {
            return Some(whole.to_string());
        }
    }

    Some(value.to_string())
}
