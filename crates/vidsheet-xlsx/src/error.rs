//! Error types for vidsheet-xlsx

use thiserror::Error;

/// Result type alias using [`XlsxError`]
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that can occur while writing an XLSX document
#[derive(Debug, Error)]
pub enum XlsxError {
    /// I/O failure on the underlying writer
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Zip container failure
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    /// Invalid sheet name
    #[error("invalid sheet name: {0}")]
    InvalidSheetName(String),

    /// Duplicate sheet name
    #[error("sheet name already exists: {0}")]
    DuplicateSheetName(String),

    /// A sheet writer is still open
    #[error("a sheet is still open; finish() it before adding another sheet or closing")]
    SheetOpen,

    /// Zoom outside the range the format accepts
    #[error("zoom scale {0} is outside 10..=400")]
    InvalidZoom(u16),

    /// Sheet layout calls after cell data has started streaming
    #[error("sheet layout is frozen once cell data has been written")]
    LayoutFrozen,

    /// Out-of-order write into an append-only sheet
    #[error("cells must be written in strictly increasing row-major order: got ({row}, {col}) after ({last_row}, {last_col})")]
    WriteOrder {
        row: u32,
        col: u32,
        last_row: u32,
        last_col: u32,
    },
}
