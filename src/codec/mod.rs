//! Codec boundary: decode uploaded bytes into [`crate::types::Table`]s and
//! encode the merged table back out for download.
//!
//! Loaders operate on in-memory byte slices through a private cursor, so the
//! caller's buffer stays untouched and re-readable. Decoding one sheet and
//! decoding a whole workbook are separate operations with separate return
//! types:
//!
//! - [`excel::decode_workbook`]
//! - [`excel::decode_sheet_by_name`]
//! - [`excel::decode_sheet_at`]
//! - [`csv::decode_table`]
//!
//! Encoders live in [`export`].

pub mod csv;
pub mod excel;
pub mod export;

use crate::error::{MergeError, MergeResult};

/// Supported source formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Comma-separated values; a single-sheet source.
    Csv,
    /// Spreadsheet/workbook formats.
    Excel,
}

impl SourceFormat {
    /// Parse a source format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }

    /// Infer the source format from an uploaded file's name.
    pub fn from_file_name(name: &str) -> MergeResult<Self> {
        let ext = std::path::Path::new(name)
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| MergeError::UnsupportedFormat {
                name: name.to_string(),
            })?;

        Self::from_extension(ext).ok_or_else(|| MergeError::UnsupportedFormat {
            name: name.to_string(),
        })
    }
}

/// Turn raw header cells into unique column names.
///
/// Header cells are trimmed; blank cells are named `column{N}` by 1-based
/// position; a duplicate of an earlier name gets a `_{N}` suffix. Every
/// schema produced by a loader therefore has unique column names, which the
/// merge layer relies on.
pub(crate) fn normalize_headers(raw: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for (idx, cell) in raw.iter().enumerate() {
        let trimmed = cell.trim();
        let base = if trimmed.is_empty() {
            format!("column{}", idx + 1)
        } else {
            trimmed.to_string()
        };

        let mut name = base.clone();
        let mut n = 2;
        while out.iter().any(|existing| existing == &name) {
            name = format!("{base}_{n}");
            n += 1;
        }
        out.push(name);
    }
    out
}
