use thiserror::Error;

/// Convenience result type for merge operations.
pub type MergeResult<T> = Result<T, MergeError>;

/// Error type returned across the crate.
///
/// Decode, selection, and encode failures are classified here rather than
/// surfaced as raw codec messages. Structural merge outcomes (an empty
/// intersection, an all-null union column) are valid results, not errors.
#[derive(Debug, Error)]
pub enum MergeError {
    /// Underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The input bytes are not a parseable spreadsheet workbook.
    #[error("failed to decode workbook: {0}")]
    Decode(#[from] calamine::Error),

    /// CSV decode or encode error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// XLSX encode error.
    #[error("xlsx encode error: {0}")]
    Encode(#[from] rust_xlsxwriter::XlsxError),

    /// A requested sheet name/index does not exist in the workbook.
    #[error("sheet '{requested}' not found (available sheets: {available:?})")]
    SheetNotFound {
        requested: String,
        available: Vec<String>,
    },

    /// The file name's extension does not map to a supported source format.
    #[error("unsupported source format for '{name}'")]
    UnsupportedFormat { name: String },
}
