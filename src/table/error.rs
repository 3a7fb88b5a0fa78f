use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or writing tabular files.
#[derive(Debug, Error)]
pub enum TableError {
    /// File extension is not one of csv / xlsx / xls.
    #[error("unsupported file extension: {} (expected .csv, .xlsx or .xls)", path.display())]
    UnsupportedExtension { path: PathBuf },

    #[error("failed to read CSV {}: {source}", path.display())]
    CsvRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to write CSV: {source}")]
    CsvWrite {
        #[source]
        source: csv::Error,
    },

    #[error("failed to read workbook {}: {reason}", path.display())]
    WorkbookRead { path: PathBuf, reason: String },

    #[error("failed to write workbook {}: {reason}", path.display())]
    WorkbookWrite { path: PathBuf, reason: String },

    #[error("workbook {} has no worksheets", path.display())]
    EmptyWorkbook { path: PathBuf },

    /// Appended result columns must line up one-to-one with existing rows.
    #[error("appended column row count {actual} does not match table row count {expected}")]
    RowCountMismatch { expected: usize, actual: usize },
}
